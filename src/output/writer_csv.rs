use crate::output::writer_jsonl::ScanRecord;
use csv::Writer;
use std::fs::File;
use std::path::Path;

pub fn write_csv(path: &Path, items: &[&ScanRecord]) -> anyhow::Result<()> {
    let f = File::create(path)?;
    let mut w = Writer::from_writer(f);
    w.write_record([
        "overall_score", "status", "final_url", "target", "is_https", "mixed_content",
        "hsts", "csp", "x_frame_options", "x_content_type_options", "xss_protection",
        "referrer_policy", "permissions_policy", "expect_ct", "vulnerabilities", "response_ms",
    ])?;
    for it in items {
        let m = &it.security_metrics;
        let h = &m.security_headers_analysis;
        let kinds: Vec<&str> = m.vulnerabilities.iter().map(|v| v.kind.code()).collect();
        w.write_record(&[
            m.overall_score.to_string(),
            it.status.to_string(),
            it.final_url.clone(),
            it.target.clone(),
            m.https_config.is_https.to_string(),
            m.https_config.mixed_content.count.to_string(),
            h.hsts.score.to_string(),
            h.content_security_policy.score.to_string(),
            h.x_frame_options.score.to_string(),
            h.x_content_type_options.score.to_string(),
            h.xss_protection.score.to_string(),
            h.referrer_policy.score.to_string(),
            h.permissions_policy.score.to_string(),
            h.expect_ct.score.to_string(),
            kinds.join(";"),
            it.response_ms.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
