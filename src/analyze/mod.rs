pub mod header_map;
pub mod markup;
pub mod mixed_content;
pub mod security_headers;
pub mod transport;
pub mod types;
pub mod vulnerability_scanner;

use std::time::Instant;
use url::Url;

use crate::config::AnalyzerConfig;
use crate::errors::{AnalyzerError, Result};
use crate::scoring::{recommendations, ScoreAggregator};

pub use header_map::ResponseHeaders;
pub use security_headers::SecurityHeaderAnalyzer;
pub use types::*;
pub use vulnerability_scanner::VulnerabilityScanner;

/// HTTP security posture analyzer.
///
/// Pure over its inputs: no I/O, no interior state. A single instance can be
/// shared across threads and called concurrently.
#[derive(Debug, Clone)]
pub struct SecurityAnalyzer {
    headers: SecurityHeaderAnalyzer,
    scanner: VulnerabilityScanner,
    aggregator: ScoreAggregator,
}

impl SecurityAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            headers: SecurityHeaderAnalyzer::new(config.hsts_min_max_age),
            scanner: VulnerabilityScanner::new(&config.sensitive_identifiers)?,
            aggregator: ScoreAggregator::new(config.https_weight),
        })
    }

    /// Analyze one fetched page.
    ///
    /// Fails only when `url` does not parse as an absolute URL. Missing
    /// headers, an empty body or broken markup all yield zero values in the
    /// result instead.
    pub fn analyze(
        &self,
        url: &str,
        headers: &ResponseHeaders,
        body: &[u8],
        user_agent: &str,
    ) -> Result<SecurityAnalysisResult> {
        let start = Instant::now();

        let parsed = Url::parse(url).map_err(|source| AnalyzerError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let body = String::from_utf8_lossy(body);

        let https_config = transport::classify(&parsed, &body);
        let security_headers = self.headers.analyze(headers);
        let vulnerabilities = self.scanner.scan(&body, headers, &https_config);

        let overall_score =
            self.aggregator
                .overall_score(&https_config, &security_headers, &vulnerabilities);
        let recommendations =
            recommendations::generate(&https_config, &security_headers, &vulnerabilities);

        let analysis_time_millis = start.elapsed().as_millis() as u64;

        tracing::debug!(
            url = %parsed,
            score = overall_score,
            vulnerabilities = vulnerabilities.len(),
            mixed_content = https_config.mixed_content.count,
            elapsed_ms = analysis_time_millis,
            "security analysis complete"
        );

        Ok(SecurityAnalysisResult {
            metadata: AnalysisMetadata {
                url: url.to_string(),
                user_agent: user_agent.to_string(),
                analysis_time_millis,
            },
            https_config,
            security_headers_analysis: security_headers,
            vulnerabilities,
            overall_score,
            recommendations,
        })
    }
}

impl Default for SecurityAnalyzer {
    fn default() -> Self {
        let config = AnalyzerConfig::default();
        Self {
            headers: SecurityHeaderAnalyzer::new(config.hsts_min_max_age),
            scanner: VulnerabilityScanner::new(&config.sensitive_identifiers)
                .expect("default sensitive identifiers compile"),
            aggregator: ScoreAggregator::new(config.https_weight),
        }
    }
}
