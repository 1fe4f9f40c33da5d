//! Error types for the posture analyzer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The page URL could not be parsed; no partial result is produced.
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A configured detection pattern failed to compile.
    #[error("invalid detection pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
