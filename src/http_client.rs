use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client used to fetch pages for posture analysis
pub fn create_client(timeout_secs: u64, user_agent: &str) -> anyhow::Result<Client> {
    let client = ClientBuilder::new()
        // Connection pooling - batch scans often hit the same host
        .pool_max_idle_per_host(16)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .tcp_nodelay(true)

        // Timeouts
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))

        // Compression
        .gzip(true)
        .brotli(true)

        // TLS
        .use_rustls_tls()
        .tls_sni(true)
        .https_only(false) // plain HTTP pages are graded too

        // Redirects
        .redirect(reqwest::redirect::Policy::limited(5))

        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(create_client(10, DEFAULT_USER_AGENT).is_ok());
    }
}
