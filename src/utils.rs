use std::fs;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve a CLI target into URLs. A path to an existing file is read as
/// newline-delimited targets (`#` starts a comment line); anything else is a
/// single target. Bare hosts get an `https://` prefix.
pub fn read_targets(target: &str) -> anyhow::Result<Vec<String>> {
    let path = Path::new(target);
    let raw: Vec<String> = if path.is_file() {
        fs::read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    } else {
        vec![target.trim().to_string()]
    };

    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for t in raw {
        let normalized = normalize_target(&t);
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    if out.is_empty() {
        anyhow::bail!("no targets found in {}", target);
    }
    Ok(out)
}

pub fn normalize_target(target: &str) -> String {
    let lower = target.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_target("example.com"), "https://example.com");
        assert_eq!(normalize_target("HTTP://example.com"), "HTTP://example.com");
    }

    #[test]
    fn reads_file_and_dedups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# targets").unwrap();
        writeln!(file, "example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "http://plain.example").unwrap();
        writeln!(file, "https://example.com").unwrap();
        let targets = read_targets(file.path().to_str().unwrap()).unwrap();
        assert_eq!(targets, vec!["https://example.com", "http://plain.example"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_targets(file.path().to_str().unwrap()).is_err());
    }
}
