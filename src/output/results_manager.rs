use std::fs;
use std::path::Path;
use anyhow::Result;

/// Files a scan writes into the output directory.
pub const OUTPUT_FILES: [&str; 3] = ["posture_raw.jsonl", "posture_summary.csv", "posture_top.txt"];

/// Remove the previous run's outputs so the streamed JSONL does not append
/// onto stale records. Other files in the directory are left alone.
pub fn cleanup_results(results_dir: &Path) -> Result<usize> {
    if !results_dir.exists() {
        fs::create_dir_all(results_dir)?;
        tracing::info!(dir=%results_dir.display(), "created results directory");
        return Ok(0);
    }

    let mut removed = 0;
    for name in OUTPUT_FILES {
        let path = results_dir.join(name);
        if path.is_file() {
            fs::remove_file(&path)?;
            tracing::debug!(file=%path.display(), "removed previous result");
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_known_outputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("posture_raw.jsonl"), "{}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        assert_eq!(cleanup_results(dir.path()).unwrap(), 1);
        assert!(!dir.path().join("posture_raw.jsonl").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results");
        assert_eq!(cleanup_results(&nested).unwrap(), 0);
        assert!(nested.is_dir());
    }
}
