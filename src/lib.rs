pub mod analyze;
pub mod concurrent;
pub mod config;
pub mod errors;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod scoring;
pub mod utils;

pub use crate::analyze::{ResponseHeaders, SecurityAnalysisResult, SecurityAnalyzer};
pub use crate::config::AnalyzerConfig;
pub use crate::errors::AnalyzerError;
