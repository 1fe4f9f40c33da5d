use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{AnalyzerError, Result};

/// One year in seconds; HSTS max-age below this is graded down.
pub const HSTS_LONG_LIVED_MAX_AGE: u64 = 31_536_000;

/// Tunables for the analyzer. Every field has a default, so a config file
/// only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Minimum HSTS max-age (seconds) that avoids a deduction.
    pub hsts_min_max_age: u64,
    /// Identifier fragments that mark an inline-script assignment as sensitive.
    pub sensitive_identifiers: Vec<String>,
    /// Weight of the transport component in the overall score (0.0 - 1.0).
    /// Headers get the remainder.
    pub https_weight: f64,
    /// Upper bound on body bytes the fetcher hands to the analyzer.
    pub max_body_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            hsts_min_max_age: HSTS_LONG_LIVED_MAX_AGE,
            sensitive_identifiers: [
                "key",
                "secret",
                "password",
                "passwd",
                "token",
                "credential",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            https_weight: 0.3,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl AnalyzerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.https_weight) {
            return Err(AnalyzerError::Config(format!(
                "https_weight must be within 0.0..=1.0, got {}",
                self.https_weight
            )));
        }
        if self.sensitive_identifiers.iter().all(|s| s.trim().is_empty()) {
            return Err(AnalyzerError::Config(
                "sensitive_identifiers must contain at least one non-empty entry".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fetch-side settings for batch scans.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub concurrency: u16,
    pub timeout_secs: u64,
    pub retries: u8,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 20,
            timeout_secs: 10,
            retries: 3,
            user_agent: crate::http_client::DEFAULT_USER_AGENT.to_string(),
        }
    }
}
