use url::Url;

use super::mixed_content;
use super::types::{CertificateInfo, HttpsConfig};

/// Classify the page transport from its URL scheme and fill in mixed content.
///
/// No handshake or redirect probe happens here: certificate validity and
/// the redirect flag both mirror the scheme.
pub fn classify(url: &Url, body: &str) -> HttpsConfig {
    // Url lowercases the scheme on parse; the comparison stays
    // case-insensitive for callers building Urls by other means.
    let is_https = url.scheme().eq_ignore_ascii_case("https");

    HttpsConfig {
        is_https,
        certificate_info: CertificateInfo { valid: is_https },
        https_redirect: is_https,
        mixed_content: mixed_content::detect(is_https, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_scheme_any_case() {
        let url = Url::parse("HTTPS://Example.com/").unwrap();
        let cfg = classify(&url, "");
        assert!(cfg.is_https);
        assert!(cfg.certificate_info.valid);
        assert!(cfg.https_redirect);
    }

    #[test]
    fn other_schemes_are_insecure() {
        for raw in ["http://example.com", "ftp://example.com/file", "ws://example.com/socket"] {
            let cfg = classify(&Url::parse(raw).unwrap(), r#"<img src="http://example.com/a.png">"#);
            assert!(!cfg.is_https, "{}", raw);
            assert!(!cfg.certificate_info.valid);
            assert!(!cfg.https_redirect);
            assert!(!cfg.mixed_content.has_mixed_content);
        }
    }
}
