use crate::analyze::types::{HttpsConfig, SecurityHeadersAnalysis, SecurityVulnerability};

/// Transport component awarded to HTTPS pages; plain HTTP gets nothing.
const HTTPS_COMPONENT: f64 = 100.0;

/// Blends transport, header and vulnerability results into one 0-100 score.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    https_weight: f64,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl ScoreAggregator {
    /// `https_weight` is clamped into 0.0..=1.0; headers get the remainder.
    pub fn new(https_weight: f64) -> Self {
        Self {
            https_weight: https_weight.clamp(0.0, 1.0),
        }
    }

    pub fn overall_score(
        &self,
        https: &HttpsConfig,
        headers: &SecurityHeadersAnalysis,
        vulnerabilities: &[SecurityVulnerability],
    ) -> u8 {
        let transport = if https.is_https { HTTPS_COMPONENT } else { 0.0 };
        let blended = self.https_weight * transport + (1.0 - self.https_weight) * headers.mean_score();
        let penalty: u32 = vulnerabilities.iter().map(|v| v.severity.penalty()).sum();

        let score = blended.round() as i64 - i64::from(penalty);
        score.clamp(0, 100) as u8
    }
}
