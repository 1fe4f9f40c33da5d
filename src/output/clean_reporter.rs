use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::analyze::{SecurityAnalysisResult, VulnerabilitySeverity};
use crate::output::writer_jsonl::ScanRecord;

const SEVERITY_ORDER: [VulnerabilitySeverity; 4] = [
    VulnerabilitySeverity::Critical,
    VulnerabilitySeverity::High,
    VulnerabilitySeverity::Medium,
    VulnerabilitySeverity::Low,
];

/// Per-target line of the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSummary {
    pub target: String,
    pub final_url: String,
    pub overall_score: u8,
    pub is_https: bool,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_duration_seconds: u64,
    pub targets: Vec<TargetSummary>,
    pub failures: Vec<FailedTarget>,
    pub severity_counts: BTreeMap<VulnerabilitySeverity, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedTarget {
    pub target: String,
    pub error: String,
}

impl ScanReport {
    pub fn new() -> Self {
        Self {
            scan_duration_seconds: 0,
            targets: Vec::new(),
            failures: Vec::new(),
            severity_counts: SEVERITY_ORDER.iter().map(|s| (*s, 0)).collect(),
        }
    }

    pub fn add_record(&mut self, record: &ScanRecord) {
        let m = &record.security_metrics;
        for v in &m.vulnerabilities {
            *self.severity_counts.entry(v.severity).or_insert(0) += 1;
        }
        self.targets.push(TargetSummary {
            target: record.target.clone(),
            final_url: record.final_url.clone(),
            overall_score: m.overall_score,
            is_https: m.https_config.is_https,
            findings: m
                .vulnerabilities
                .iter()
                .map(|v| format!("{} {}", v.severity.label(), v.title))
                .collect(),
            recommendations: m.recommendations.clone(),
        });
    }

    pub fn add_failure(&mut self, target: &str, error: &anyhow::Error) {
        self.failures.push(FailedTarget {
            target: target.to_string(),
            error: format!("{:#}", error),
        });
    }

    pub fn average_score(&self) -> Option<f64> {
        if self.targets.is_empty() {
            return None;
        }
        let total: u32 = self.targets.iter().map(|t| u32::from(t.overall_score)).sum();
        Some(f64::from(total) / self.targets.len() as f64)
    }

    /// Print clean CLI output - only essential information
    pub fn print_summary(&self, out_dir: &str) {
        println!("\n{}", "=".repeat(60));
        println!("              SCAN COMPLETE");
        println!("{}", "=".repeat(60));

        println!("\n[*] Summary:");
        println!("   Targets analyzed: {}", self.targets.len());
        if !self.failures.is_empty() {
            println!("   Targets failed: {}", self.failures.len());
        }
        println!("   Duration: {}s", self.scan_duration_seconds);
        if let Some(avg) = self.average_score() {
            println!("   Average score: {:.1}/100", avg);
        }

        println!("\n[*] Security Findings:");
        let mut any = false;
        for severity in SEVERITY_ORDER {
            let count = self.severity_counts.get(&severity).copied().unwrap_or(0);
            if count > 0 {
                any = true;
                println!(
                    "   {}{}{} {}",
                    severity.color_code(),
                    severity.label(),
                    VulnerabilitySeverity::reset_color(),
                    count
                );
            }
        }
        if !any {
            println!("   [OK] No vulnerabilities detected");
        }

        let mut weakest: Vec<&TargetSummary> = self.targets.iter().collect();
        weakest.sort_by_key(|t| t.overall_score);
        if !weakest.is_empty() {
            println!("\n[!] Lowest Scores:");
            for t in weakest.iter().take(5) {
                println!("   [{:>3}] {}", t.overall_score, t.final_url);
            }
        }

        println!("\n[=] Detailed results saved to: {}", out_dir);
        println!();
    }

    /// Save detailed report to file
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("txt");

        match extension {
            "json" => {
                let json = serde_json::to_string_pretty(self)?;
                fs::write(path, json)?;
            }
            _ => {
                fs::write(path, self.format_text_report())?;
            }
        }

        Ok(())
    }

    fn format_text_report(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════\n");
        report.push_str("                 SECURITY POSTURE REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Targets: {}\n", self.targets.len()));
        report.push_str(&format!("Duration: {}s\n\n", self.scan_duration_seconds));

        report.push_str("Security Findings:\n");
        for severity in SEVERITY_ORDER {
            report.push_str(&format!(
                "  {}: {}\n",
                severity.label(),
                self.severity_counts.get(&severity).copied().unwrap_or(0)
            ));
        }

        for t in &self.targets {
            report.push_str(&format!("\n{} (score {}/100)\n", t.final_url, t.overall_score));
            report.push_str(&"─".repeat(60));
            report.push('\n');
            if !t.is_https {
                report.push_str("   Transport: plain HTTP\n");
            }
            for f in &t.findings {
                report.push_str(&format!("   - {}\n", f));
            }
            if !t.recommendations.is_empty() {
                report.push_str("   Recommendations:\n");
                for r in &t.recommendations {
                    report.push_str(&format!("     * {}\n", r));
                }
            }
        }

        if !self.failures.is_empty() {
            report.push_str("\nFailed targets:\n");
            for f in &self.failures {
                report.push_str(&format!("   {} - {}\n", f.target, f.error));
            }
        }

        report.push_str("\n═══════════════════════════════════════════════════════════\n");
        report.push_str("                      END OF REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════\n");

        report
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Pretty JSON for a single analysis, as printed by `inspect`.
pub fn render_result(result: &SecurityAnalysisResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
