use std::collections::BTreeSet;

use crate::analyze::types::{
    HeaderAnalysis, HeaderFamily, HttpsConfig, SecurityHeadersAnalysis, SecurityVulnerability,
    VulnerabilityType,
};

/// One recommendation per deficient component: insecure transport, each
/// header below 100, each distinct vulnerability type. Order follows that
/// listing so output is deterministic.
pub fn generate(
    https: &HttpsConfig,
    headers: &SecurityHeadersAnalysis,
    vulnerabilities: &[SecurityVulnerability],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !https.is_https {
        recommendations.push(
            "Serve the site over HTTPS and redirect all plain HTTP traffic to it".to_string(),
        );
    }

    for (family, analysis) in headers.entries() {
        if analysis.score < 100 {
            recommendations.push(header_recommendation(family, analysis));
        }
    }

    let mut seen: BTreeSet<VulnerabilityType> = BTreeSet::new();
    for v in vulnerabilities {
        if seen.insert(v.kind) {
            recommendations.push(v.kind.remediation().to_string());
        }
    }

    recommendations
}

fn header_recommendation(family: HeaderFamily, analysis: &HeaderAnalysis) -> String {
    let name = family.display_name();
    if !analysis.present {
        return format!("Add the {} header: {}", name, missing_advice(family));
    }
    if !analysis.issues.is_empty() {
        return format!("Improve {}: {}", name, analysis.issues.join("; "));
    }
    match family {
        HeaderFamily::Hsts => {
            "Keep HSTS at max-age of one year or more with includeSubDomains and preload, and submit the domain to the preload list".to_string()
        }
        HeaderFamily::ContentSecurityPolicy => {
            "Tighten Content-Security-Policy with nonces or hashes and add frame-ancestors".to_string()
        }
        HeaderFamily::XssProtection => {
            "X-XSS-Protection is deprecated; rely on Content-Security-Policy for script restrictions".to_string()
        }
        HeaderFamily::ReferrerPolicy => {
            "Use a strict Referrer-Policy such as strict-origin-when-cross-origin or no-referrer".to_string()
        }
        _ => format!("Review the {} header configuration ({}/100)", name, analysis.score),
    }
}

fn missing_advice(family: HeaderFamily) -> &'static str {
    match family {
        HeaderFamily::Hsts => "max-age=31536000; includeSubDomains; preload",
        HeaderFamily::ContentSecurityPolicy => {
            "define default-src and script-src without 'unsafe-inline' or 'unsafe-eval'"
        }
        HeaderFamily::XFrameOptions => "DENY or SAMEORIGIN",
        HeaderFamily::XContentTypeOptions => "nosniff",
        HeaderFamily::XssProtection => "0, with a Content-Security-Policy doing the real work",
        HeaderFamily::ReferrerPolicy => "strict-origin-when-cross-origin",
        HeaderFamily::PermissionsPolicy => "disable unused browser features such as camera=(), microphone=()",
        HeaderFamily::ExpectCt => "max-age=86400, enforce",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::header_map::ResponseHeaders;
    use crate::analyze::security_headers::SecurityHeaderAnalyzer;
    use crate::analyze::types::VulnerabilitySeverity;

    fn vuln(kind: VulnerabilityType) -> SecurityVulnerability {
        SecurityVulnerability {
            kind,
            severity: VulnerabilitySeverity::Medium,
            title: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn insecure_transport_comes_first() {
        let headers = SecurityHeaderAnalyzer::default().analyze(&ResponseHeaders::new());
        let recs = generate(&HttpsConfig::default(), &headers, &[]);
        assert!(recs[0].contains("HTTPS"));
        // transport + eight absent headers
        assert_eq!(recs.len(), 9);
        assert!(recs[1].starts_with("Add the HSTS header"));
    }

    #[test]
    fn weak_header_lists_its_issues() {
        let headers: ResponseHeaders = [("Strict-Transport-Security", "max-age=60")].into_iter().collect();
        let analysis = SecurityHeaderAnalyzer::default().analyze(&headers);
        let recs = generate(&HttpsConfig { is_https: true, ..Default::default() }, &analysis, &[]);
        assert!(recs[0].starts_with("Improve HSTS: Missing includeSubDomains directive"));
    }

    #[test]
    fn one_entry_per_vulnerability_type() {
        let headers = SecurityHeaderAnalyzer::default().analyze(&ResponseHeaders::new());
        let vulns = [vuln(VulnerabilityType::XssRisk), vuln(VulnerabilityType::XssRisk), vuln(VulnerabilityType::CsrfRisk)];
        let https = HttpsConfig { is_https: true, ..Default::default() };
        let recs = generate(&https, &headers, &vulns);
        assert_eq!(recs.len(), 8 + 2);
        assert_eq!(recs[8], VulnerabilityType::XssRisk.remediation());
    }
}
