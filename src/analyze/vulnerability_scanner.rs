use regex::Regex;

use super::header_map::ResponseHeaders;
use super::markup::{self, ScriptBlock};
use super::security_headers::{csp_has_directive, header_value};
use super::types::{
    HeaderFamily, HttpsConfig, SecurityVulnerability, VulnerabilitySeverity, VulnerabilityType,
};
use crate::errors::{AnalyzerError, Result};

/// Pattern checks over page markup and headers.
///
/// Checks run in a fixed order and each emits at most one finding, so the
/// output is stable for callers that read it positionally.
#[derive(Debug, Clone)]
pub struct VulnerabilityScanner {
    sensitive_assignment: Regex,
}

impl VulnerabilityScanner {
    /// Build a scanner flagging assignments to identifiers containing any of
    /// `sensitive_identifiers` (case-insensitive).
    pub fn new<S: AsRef<str>>(sensitive_identifiers: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = sensitive_identifiers
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Err(AnalyzerError::Config(
                "at least one sensitive identifier is required".to_string(),
            ));
        }

        // identifier fragment, optional closing quote of an object key, then
        // `=` or `:` and a non-empty string literal
        let pattern = format!(
            r#"(?i)([A-Za-z0-9_$]*(?:{})[A-Za-z0-9_$]*)["']?\s*[:=]\s*["'`][^"'`\r\n]+["'`]"#,
            alternatives.join("|")
        );

        Ok(Self {
            sensitive_assignment: Regex::new(&pattern)?,
        })
    }

    pub fn scan(
        &self,
        body: &str,
        headers: &ResponseHeaders,
        https: &HttpsConfig,
    ) -> Vec<SecurityVulnerability> {
        let inline: Vec<ScriptBlock<'_>> = markup::inline_scripts(body).collect();

        [
            check_inline_scripts(&inline),
            check_csrf(body),
            self.check_sensitive_exposure(&inline),
            check_mixed_content(https),
            check_clickjacking(headers),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn check_sensitive_exposure(&self, inline: &[ScriptBlock<'_>]) -> Option<SecurityVulnerability> {
        let identifier = inline.iter().find_map(|script| {
            self.sensitive_assignment
                .captures(script.content)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().to_string())
        })?;

        Some(SecurityVulnerability {
            kind: VulnerabilityType::InformationDisclosure,
            severity: VulnerabilitySeverity::Critical,
            title: "Sensitive Information Exposure".to_string(),
            description: format!(
                "Inline script assigns a literal value to sensitive identifier `{}`",
                identifier
            ),
        })
    }
}

fn check_inline_scripts(inline: &[ScriptBlock<'_>]) -> Option<SecurityVulnerability> {
    if inline.is_empty() {
        return None;
    }

    Some(SecurityVulnerability {
        kind: VulnerabilityType::XssRisk,
        severity: VulnerabilitySeverity::Medium,
        title: "Inline JavaScript Detected".to_string(),
        description: format!(
            "Page contains {} inline script block(s) executing outside any external source",
            inline.len()
        ),
    })
}

fn check_csrf(body: &str) -> Option<SecurityVulnerability> {
    let unprotected = markup::forms(body)
        .filter(|form| form.is_post())
        .filter(|form| {
            !form.hidden_input_names().iter().any(|name| {
                let name = name.to_ascii_lowercase();
                name.contains("csrf") || name.contains("token")
            })
        })
        .count();

    if unprotected == 0 {
        return None;
    }

    Some(SecurityVulnerability {
        kind: VulnerabilityType::CsrfRisk,
        severity: VulnerabilitySeverity::High,
        title: "Potential CSRF Vulnerability".to_string(),
        description: format!(
            "{} POST form(s) without a hidden anti-CSRF token field",
            unprotected
        ),
    })
}

fn check_mixed_content(https: &HttpsConfig) -> Option<SecurityVulnerability> {
    let mixed = &https.mixed_content;
    if !mixed.has_mixed_content {
        return None;
    }

    Some(SecurityVulnerability {
        kind: VulnerabilityType::MixedContent,
        severity: VulnerabilitySeverity::Medium,
        title: "Mixed Content Detected".to_string(),
        description: format!(
            "HTTPS page loads {} resource(s) over plain HTTP",
            mixed.count
        ),
    })
}

fn check_clickjacking(headers: &ResponseHeaders) -> Option<SecurityVulnerability> {
    if header_value(HeaderFamily::XFrameOptions, headers).is_some() {
        return None;
    }

    // frame-ancestors is ignored by browsers in a Report-Only policy
    let framing_restricted = headers
        .get("content-security-policy")
        .map(|csp| csp_has_directive(csp, "frame-ancestors"))
        .unwrap_or(false);
    if framing_restricted {
        return None;
    }

    Some(SecurityVulnerability {
        kind: VulnerabilityType::ClickjackingRisk,
        severity: VulnerabilitySeverity::Medium,
        title: "Clickjacking Protection Missing".to_string(),
        description: "Neither X-Frame-Options nor a CSP frame-ancestors directive restricts framing"
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::mixed_content;

    fn scanner() -> VulnerabilityScanner {
        VulnerabilityScanner::new(&["key", "secret", "password", "token"]).unwrap()
    }

    fn framed_headers() -> ResponseHeaders {
        [("X-Frame-Options", "DENY")].into_iter().collect()
    }

    fn kinds(found: &[SecurityVulnerability]) -> Vec<VulnerabilityType> {
        found.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn inline_script_only() {
        let found = scanner().scan("<script>alert('x')</script>", &framed_headers(), &HttpsConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, VulnerabilityType::XssRisk);
        assert_eq!(found[0].severity, VulnerabilitySeverity::Medium);
        assert_eq!(found[0].title, "Inline JavaScript Detected");
    }

    #[test]
    fn external_script_is_not_inline() {
        let found = scanner().scan(r#"<script src="/app.js"></script>"#, &framed_headers(), &HttpsConfig::default());
        assert!(found.is_empty());
    }

    #[test]
    fn csrf_once_for_many_forms() {
        let body = r#"<form method="post"></form><form method="POST"><input name="q"></form>"#;
        let found = scanner().scan(body, &framed_headers(), &HttpsConfig::default());
        assert_eq!(kinds(&found), vec![VulnerabilityType::CsrfRisk]);
        assert_eq!(found[0].severity, VulnerabilitySeverity::High);
    }

    #[test]
    fn csrf_token_suppresses_finding() {
        let body = r#"<form method="post"><input type="hidden" name="csrf_token" value="x"></form>"#;
        assert!(scanner().scan(body, &framed_headers(), &HttpsConfig::default()).is_empty());

        let body = r#"<form method="post"><input type="hidden" name="authenticity_TOKEN" value="x"></form>"#;
        assert!(scanner().scan(body, &framed_headers(), &HttpsConfig::default()).is_empty());
    }

    #[test]
    fn get_forms_ignored() {
        let body = r#"<form method="get" action="/search"><input name="q"></form><form action="/x"></form>"#;
        assert!(scanner().scan(body, &framed_headers(), &HttpsConfig::default()).is_empty());
    }

    #[test]
    fn sensitive_assignment_detected() {
        for body in [
            r#"<script>const apiKey = "sk_live_1234567890";</script>"#,
            r#"<script>var config = { client_secret: 'abcdef' };</script>"#,
            r#"<script>window.cfg = {"dbPassword": "hunter2"}</script>"#,
        ] {
            let found = scanner().scan(body, &framed_headers(), &HttpsConfig::default());
            assert_eq!(
                kinds(&found),
                vec![VulnerabilityType::XssRisk, VulnerabilityType::InformationDisclosure],
                "{}",
                body
            );
            assert_eq!(found[1].severity, VulnerabilitySeverity::Critical);
        }
    }

    #[test]
    fn comparisons_and_external_scripts_not_sensitive() {
        let body = r#"<script>if (token == "x") { go(); }</script><script src="/k.js">var key = "abc";</script>"#;
        let found = scanner().scan(body, &framed_headers(), &HttpsConfig::default());
        assert_eq!(kinds(&found), vec![VulnerabilityType::XssRisk]);
    }

    #[test]
    fn custom_identifier_list() {
        let scanner = VulnerabilityScanner::new(&["sessionid"]).unwrap();
        let found = scanner.scan(
            r#"<script>let SessionId = "abc123"; let apiKey = "zzz";</script>"#,
            &framed_headers(),
            &HttpsConfig::default(),
        );
        assert!(found[1].description.contains("SessionId"));
    }

    #[test]
    fn mixed_content_reported() {
        let https = HttpsConfig {
            is_https: true,
            mixed_content: mixed_content::detect(true, r#"<img src="http://example.com/x.jpg">"#),
            ..Default::default()
        };
        let found = scanner().scan("", &framed_headers(), &https);
        assert_eq!(kinds(&found), vec![VulnerabilityType::MixedContent]);
    }

    #[test]
    fn clickjacking_rules() {
        let none = ResponseHeaders::new();
        assert_eq!(
            kinds(&scanner().scan("", &none, &HttpsConfig::default())),
            vec![VulnerabilityType::ClickjackingRisk]
        );

        let csp: ResponseHeaders = [("Content-Security-Policy", "default-src 'self'; frame-ancestors 'none'")]
            .into_iter()
            .collect();
        assert!(scanner().scan("", &csp, &HttpsConfig::default()).is_empty());

        let csp_without: ResponseHeaders = [("Content-Security-Policy", "default-src 'self'")].into_iter().collect();
        assert_eq!(scanner().scan("", &csp_without, &HttpsConfig::default()).len(), 1);
    }

    #[test]
    fn report_only_frame_ancestors_does_not_protect() {
        let report_only: ResponseHeaders =
            [("Content-Security-Policy-Report-Only", "frame-ancestors 'none'")].into_iter().collect();
        assert_eq!(
            kinds(&scanner().scan("", &report_only, &HttpsConfig::default())),
            vec![VulnerabilityType::ClickjackingRisk]
        );

        let both: ResponseHeaders = [
            ("Content-Security-Policy-Report-Only", "default-src 'self'"),
            ("Content-Security-Policy", "frame-ancestors 'self'"),
        ]
        .into_iter()
        .collect();
        assert!(scanner().scan("", &both, &HttpsConfig::default()).is_empty());
    }

    #[test]
    fn multiple_inline_scripts_single_finding() {
        let body = r#"
            <script>a()</script>
            <script>b()</script>
            <script>var key = 'x';</script>
            <script>var secret = 'y';</script>
        "#;
        let found = scanner().scan(body, &framed_headers(), &HttpsConfig::default());
        assert_eq!(
            kinds(&found),
            vec![VulnerabilityType::XssRisk, VulnerabilityType::InformationDisclosure]
        );
        assert!(found[1].description.contains("key"));
    }

    #[test]
    fn fixed_order() {
        let body = r#"
            <script>var password = "letmein";</script>
            <form method="post"><input type="text" name="user"></form>
        "#;
        let https = HttpsConfig {
            is_https: true,
            mixed_content: mixed_content::detect(true, r#"<img src="http://a.example/x.png">"#),
            ..Default::default()
        };
        let found = scanner().scan(body, &ResponseHeaders::new(), &https);
        assert_eq!(
            kinds(&found),
            vec![
                VulnerabilityType::XssRisk,
                VulnerabilityType::CsrfRisk,
                VulnerabilityType::InformationDisclosure,
                VulnerabilityType::MixedContent,
                VulnerabilityType::ClickjackingRisk,
            ]
        );
    }

    #[test]
    fn empty_identifier_list_rejected() {
        assert!(matches!(
            VulnerabilityScanner::new(&["", "  "]),
            Err(AnalyzerError::Config(_))
        ));
    }
}
