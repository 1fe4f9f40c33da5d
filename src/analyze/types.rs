use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Full security assessment of a single fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAnalysisResult {
    pub metadata: AnalysisMetadata,
    pub https_config: HttpsConfig,
    pub security_headers_analysis: SecurityHeadersAnalysis,
    pub vulnerabilities: Vec<SecurityVulnerability>,
    pub overall_score: u8, // 0-100
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub url: String,
    pub user_agent: String,
    pub analysis_time_millis: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpsConfig {
    pub is_https: bool,
    pub certificate_info: CertificateInfo,
    pub https_redirect: bool,
    pub mixed_content: MixedContentAnalysis,
}

/// Scheme-derived only, no chain verification happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedContentAnalysis {
    pub has_mixed_content: bool,
    pub http_resources: BTreeSet<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAnalysis {
    pub present: bool,
    pub value: String,
    pub score: u8,
    pub issues: Vec<String>,
}

impl HeaderAnalysis {
    pub fn absent(display_name: &str) -> Self {
        Self {
            present: false,
            value: String::new(),
            score: 0,
            issues: vec![format!("{} header not present", display_name)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeadersAnalysis {
    pub hsts: HeaderAnalysis,
    pub content_security_policy: HeaderAnalysis,
    pub x_frame_options: HeaderAnalysis,
    pub x_content_type_options: HeaderAnalysis,
    pub xss_protection: HeaderAnalysis,
    pub referrer_policy: HeaderAnalysis,
    pub permissions_policy: HeaderAnalysis,
    pub expect_ct: HeaderAnalysis,
}

impl SecurityHeadersAnalysis {
    /// Per-family view in the canonical family order.
    pub fn entries(&self) -> [(HeaderFamily, &HeaderAnalysis); 8] {
        [
            (HeaderFamily::Hsts, &self.hsts),
            (HeaderFamily::ContentSecurityPolicy, &self.content_security_policy),
            (HeaderFamily::XFrameOptions, &self.x_frame_options),
            (HeaderFamily::XContentTypeOptions, &self.x_content_type_options),
            (HeaderFamily::XssProtection, &self.xss_protection),
            (HeaderFamily::ReferrerPolicy, &self.referrer_policy),
            (HeaderFamily::PermissionsPolicy, &self.permissions_policy),
            (HeaderFamily::ExpectCt, &self.expect_ct),
        ]
    }

    pub fn mean_score(&self) -> f64 {
        let entries = self.entries();
        let total: u32 = entries.iter().map(|(_, a)| u32::from(a.score)).sum();
        f64::from(total) / entries.len() as f64
    }
}

/// The closed set of security header families the analyzer grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFamily {
    Hsts,
    ContentSecurityPolicy,
    XFrameOptions,
    XContentTypeOptions,
    XssProtection,
    ReferrerPolicy,
    PermissionsPolicy,
    ExpectCt,
}

impl HeaderFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            HeaderFamily::Hsts => "HSTS",
            HeaderFamily::ContentSecurityPolicy => "Content-Security-Policy",
            HeaderFamily::XFrameOptions => "X-Frame-Options",
            HeaderFamily::XContentTypeOptions => "X-Content-Type-Options",
            HeaderFamily::XssProtection => "X-XSS-Protection",
            HeaderFamily::ReferrerPolicy => "Referrer-Policy",
            HeaderFamily::PermissionsPolicy => "Permissions-Policy",
            HeaderFamily::ExpectCt => "Expect-CT",
        }
    }

    /// Wire names, looked up in order. The first present one wins.
    pub fn header_names(&self) -> &'static [&'static str] {
        match self {
            HeaderFamily::Hsts => &["strict-transport-security"],
            HeaderFamily::ContentSecurityPolicy => &[
                "content-security-policy",
                "content-security-policy-report-only",
            ],
            HeaderFamily::XFrameOptions => &["x-frame-options"],
            HeaderFamily::XContentTypeOptions => &["x-content-type-options"],
            HeaderFamily::XssProtection => &["x-xss-protection"],
            HeaderFamily::ReferrerPolicy => &["referrer-policy"],
            HeaderFamily::PermissionsPolicy => &["permissions-policy"],
            HeaderFamily::ExpectCt => &["expect-ct"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityVulnerability {
    #[serde(rename = "type")]
    pub kind: VulnerabilityType,
    pub severity: VulnerabilitySeverity,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityType {
    XssRisk,
    CsrfRisk,
    InformationDisclosure,
    MixedContent,
    ClickjackingRisk,
}

impl VulnerabilityType {
    pub fn code(&self) -> &'static str {
        match self {
            VulnerabilityType::XssRisk => "xss_risk",
            VulnerabilityType::CsrfRisk => "csrf_risk",
            VulnerabilityType::InformationDisclosure => "information_disclosure",
            VulnerabilityType::MixedContent => "mixed_content",
            VulnerabilityType::ClickjackingRisk => "clickjacking_risk",
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            VulnerabilityType::XssRisk => {
                "Move inline JavaScript into external files and enforce a strict Content-Security-Policy"
            }
            VulnerabilityType::CsrfRisk => {
                "Add anti-CSRF tokens to every state-changing form"
            }
            VulnerabilityType::InformationDisclosure => {
                "Remove secrets, keys and passwords from client-side scripts"
            }
            VulnerabilityType::MixedContent => {
                "Load every sub-resource over HTTPS to eliminate mixed content"
            }
            VulnerabilityType::ClickjackingRisk => {
                "Set X-Frame-Options or a CSP frame-ancestors directive to prevent clickjacking"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilitySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VulnerabilitySeverity {
    /// Points subtracted from the overall score per finding.
    pub fn penalty(&self) -> u32 {
        match self {
            VulnerabilitySeverity::Critical => 40,
            VulnerabilitySeverity::High => 25,
            VulnerabilitySeverity::Medium => 10,
            VulnerabilitySeverity::Low => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VulnerabilitySeverity::Critical => "CRITICAL",
            VulnerabilitySeverity::High => "HIGH",
            VulnerabilitySeverity::Medium => "MEDIUM",
            VulnerabilitySeverity::Low => "LOW",
        }
    }

    pub fn color_code(&self) -> &'static str {
        match self {
            VulnerabilitySeverity::Critical => "\x1b[1;91m", // Bright Red
            VulnerabilitySeverity::High => "\x1b[1;33m",     // Bright Yellow
            VulnerabilitySeverity::Medium => "\x1b[1;93m",   // Yellow
            VulnerabilitySeverity::Low => "\x1b[1;94m",      // Blue
        }
    }

    pub fn reset_color() -> &'static str {
        "\x1b[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vulnerability_serializes_with_snake_case_tags() {
        let v = SecurityVulnerability {
            kind: VulnerabilityType::ClickjackingRisk,
            severity: VulnerabilitySeverity::Medium,
            title: "Clickjacking Protection Missing".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "clickjacking_risk");
        assert_eq!(json["severity"], "medium");
    }

    #[test]
    fn absent_header_has_issue() {
        let a = HeaderAnalysis::absent("Expect-CT");
        assert!(!a.present);
        assert_eq!(a.score, 0);
        assert_eq!(a.issues, vec!["Expect-CT header not present".to_string()]);
    }

    #[test]
    fn codes_match_serde_names() {
        for kind in [
            VulnerabilityType::XssRisk,
            VulnerabilityType::CsrfRisk,
            VulnerabilityType::InformationDisclosure,
            VulnerabilityType::MixedContent,
            VulnerabilityType::ClickjackingRisk,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.code());
        }
    }
}
