use super::header_map::ResponseHeaders;
use super::types::{HeaderAnalysis, HeaderFamily, SecurityHeadersAnalysis};
use crate::config::HSTS_LONG_LIVED_MAX_AGE;

const HSTS_BASE: u8 = 70;
const HSTS_NO_SUBDOMAINS: u8 = 15;
const HSTS_NO_PRELOAD: u8 = 10;
const HSTS_SHORT_MAX_AGE: u8 = 5;

const CSP_BASE: u8 = 60;
const CSP_UNSAFE_INLINE: u8 = 20;
const CSP_UNSAFE_EVAL: u8 = 15;
const CSP_NO_SCRIPT_SRC: u8 = 10;

/// Grades the eight tracked security header families.
#[derive(Debug, Clone)]
pub struct SecurityHeaderAnalyzer {
    hsts_min_max_age: u64,
}

impl Default for SecurityHeaderAnalyzer {
    fn default() -> Self {
        Self::new(HSTS_LONG_LIVED_MAX_AGE)
    }
}

impl SecurityHeaderAnalyzer {
    pub fn new(hsts_min_max_age: u64) -> Self {
        Self { hsts_min_max_age }
    }

    pub fn analyze(&self, headers: &ResponseHeaders) -> SecurityHeadersAnalysis {
        SecurityHeadersAnalysis {
            hsts: self.evaluate(HeaderFamily::Hsts, headers),
            content_security_policy: self.evaluate(HeaderFamily::ContentSecurityPolicy, headers),
            x_frame_options: self.evaluate(HeaderFamily::XFrameOptions, headers),
            x_content_type_options: self.evaluate(HeaderFamily::XContentTypeOptions, headers),
            xss_protection: self.evaluate(HeaderFamily::XssProtection, headers),
            referrer_policy: self.evaluate(HeaderFamily::ReferrerPolicy, headers),
            permissions_policy: self.evaluate(HeaderFamily::PermissionsPolicy, headers),
            expect_ct: self.evaluate(HeaderFamily::ExpectCt, headers),
        }
    }

    /// Grade a single family.
    pub fn evaluate(&self, family: HeaderFamily, headers: &ResponseHeaders) -> HeaderAnalysis {
        let Some(value) = header_value(family, headers) else {
            return HeaderAnalysis::absent(family.display_name());
        };

        match family {
            HeaderFamily::Hsts => self.grade_hsts(value),
            HeaderFamily::ContentSecurityPolicy => grade_csp(value),
            HeaderFamily::XFrameOptions => present_with(value, 100),
            HeaderFamily::XContentTypeOptions => present_with(value, 100),
            // Deprecated header; presence is all that is graded
            HeaderFamily::XssProtection => present_with(value, 80),
            HeaderFamily::ReferrerPolicy => present_with(value, 90),
            HeaderFamily::PermissionsPolicy => present_with(value, 100),
            HeaderFamily::ExpectCt => present_with(value, 100),
        }
    }

    fn grade_hsts(&self, value: &str) -> HeaderAnalysis {
        let mut score = HSTS_BASE;
        let mut issues = Vec::new();

        let directives: Vec<String> = value
            .split(';')
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        if !directives.iter().any(|d| d == "includesubdomains") {
            score = score.saturating_sub(HSTS_NO_SUBDOMAINS);
            issues.push("Missing includeSubDomains directive".to_string());
        }

        if !directives.iter().any(|d| d == "preload") {
            score = score.saturating_sub(HSTS_NO_PRELOAD);
            issues.push("Missing preload directive".to_string());
        }

        match parse_max_age(&directives) {
            Some(age) if age >= self.hsts_min_max_age => {}
            Some(age) => {
                score = score.saturating_sub(HSTS_SHORT_MAX_AGE);
                issues.push(format!(
                    "max-age of {} seconds is shorter than the recommended {} seconds",
                    age, self.hsts_min_max_age
                ));
            }
            None => {
                score = score.saturating_sub(HSTS_SHORT_MAX_AGE);
                issues.push("Missing or invalid max-age directive".to_string());
            }
        }

        HeaderAnalysis {
            present: true,
            value: value.to_string(),
            score,
            issues,
        }
    }
}

/// Raw value of the first present wire header for `family`.
pub fn header_value<'a>(family: HeaderFamily, headers: &'a ResponseHeaders) -> Option<&'a str> {
    family.header_names().iter().find_map(|name| headers.get(name))
}

fn present_with(value: &str, score: u8) -> HeaderAnalysis {
    HeaderAnalysis {
        present: true,
        value: value.to_string(),
        score,
        issues: Vec::new(),
    }
}

fn parse_max_age(directives: &[String]) -> Option<u64> {
    directives.iter().find_map(|d| {
        let (name, val) = d.split_once('=')?;
        if name.trim() != "max-age" {
            return None;
        }
        val.trim().trim_matches('"').parse().ok()
    })
}

fn grade_csp(value: &str) -> HeaderAnalysis {
    let mut score = CSP_BASE;
    let mut issues = Vec::new();

    let lowered = value.to_ascii_lowercase();

    if lowered.contains("'unsafe-inline'") {
        score = score.saturating_sub(CSP_UNSAFE_INLINE);
        issues.push("CSP allows 'unsafe-inline'".to_string());
    }

    if lowered.contains("'unsafe-eval'") {
        score = score.saturating_sub(CSP_UNSAFE_EVAL);
        issues.push("CSP allows 'unsafe-eval'".to_string());
    }

    if !csp_has_directive(value, "script-src") {
        score = score.saturating_sub(CSP_NO_SCRIPT_SRC);
        issues.push("No script-src directive defined".to_string());
    }

    HeaderAnalysis {
        present: true,
        value: value.to_string(),
        score,
        issues,
    }
}

/// Directive names of a CSP value, lowercased, in order of appearance.
pub fn csp_directive_names(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(';').filter_map(|directive| {
        directive
            .split_whitespace()
            .next()
            .map(|name| name.to_ascii_lowercase())
    })
}

pub fn csp_has_directive(value: &str, name: &str) -> bool {
    csp_directive_names(value).any(|d| d.eq_ignore_ascii_case(name))
}
