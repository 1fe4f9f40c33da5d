use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyze::SecurityAnalysisResult;

/// One fetched-and-analyzed target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub target: String,
    pub final_url: String,
    pub status: u16,
    pub response_ms: u64,
    pub body_truncated: bool,
    pub security_metrics: SecurityAnalysisResult,
}

/// The ten weakest targets, lowest score first.
pub fn write_top_txt(path: &Path, items: &[&ScanRecord]) -> anyhow::Result<()> {
    let mut sorted: Vec<&ScanRecord> = items.to_vec();
    sorted.sort_by_key(|r| (r.security_metrics.overall_score, r.target.clone()));

    let mut lines = Vec::new();
    for it in sorted.iter().take(10) {
        let kinds: Vec<&str> = it
            .security_metrics
            .vulnerabilities
            .iter()
            .map(|v| v.kind.code())
            .collect();
        lines.push(format!(
            "[{:>3}] {} {} - {}ms - findings: {}",
            it.security_metrics.overall_score,
            it.status,
            it.final_url,
            it.response_ms,
            if kinds.is_empty() { "none".to_string() } else { kinds.join(", ") }
        ));
    }
    std::fs::write(path, lines.join("\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{ResponseHeaders, SecurityAnalyzer};

    fn record(target: &str, body: &str) -> ScanRecord {
        let analysis = SecurityAnalyzer::default()
            .analyze(target, &ResponseHeaders::new(), body.as_bytes(), "test")
            .unwrap();
        ScanRecord {
            target: target.to_string(),
            final_url: target.to_string(),
            status: 200,
            response_ms: 12,
            body_truncated: false,
            security_metrics: analysis,
        }
    }

    #[test]
    fn top_txt_lowest_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.txt");
        let good = record("https://good.example", "");
        let bad = record("http://bad.example", r#"<script>var apiKey = "abc";</script>"#);
        write_top_txt(&path, &[&good, &bad]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().next().unwrap().contains("bad.example"));
    }
}
