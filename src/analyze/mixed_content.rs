use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::types::MixedContentAnalysis;

/// Resource-carrying attributes pointing at an absolute plain-HTTP URL.
static HTTP_RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:src|href|action|data|poster|background|formaction)\s*=\s*["']?\s*(http://[^"'\s>]+)"#,
    )
    .unwrap()
});

/// Responsive-image candidate lists: `url [descriptor], url [descriptor], ...`
static SRCSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:imagesrcset|srcset)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Collect distinct `http://` resources referenced from an HTTPS page.
///
/// Plain HTTP pages are not scanned: an insecure page is not mixed, it is
/// insecure.
pub fn detect(is_https: bool, body: &str) -> MixedContentAnalysis {
    if !is_https {
        return MixedContentAnalysis::default();
    }

    let mut http_resources: BTreeSet<String> = HTTP_RESOURCE_RE
        .captures_iter(body)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect();
    http_resources.extend(srcset_candidates(body));

    let count = http_resources.len();
    MixedContentAnalysis {
        has_mixed_content: count > 0,
        http_resources,
        count,
    }
}

fn srcset_candidates(body: &str) -> impl Iterator<Item = String> + '_ {
    SRCSET_RE
        .captures_iter(body)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .flat_map(|list| list.as_str().split(','))
        .filter_map(|entry| entry.split_whitespace().next())
        .filter(|url| url.get(..7).is_some_and(|scheme| scheme.eq_ignore_ascii_case("http://")))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_insecure_image() {
        let a = detect(true, r#"<img src="http://example.com/x.jpg">"#);
        assert!(a.has_mixed_content);
        assert_eq!(a.count, 1);
        assert!(a.http_resources.contains("http://example.com/x.jpg"));
    }

    #[test]
    fn duplicates_collapse() {
        let body = r#"
            <img src="http://cdn.example.com/a.png">
            <img SRC='http://cdn.example.com/a.png'>
            <link rel="stylesheet" href="http://cdn.example.com/site.css">
            <script src=http://cdn.example.com/app.js></script>
        "#;
        let a = detect(true, body);
        assert_eq!(a.count, 3);
    }

    #[test]
    fn secure_and_relative_references_ignored() {
        let body = r#"<img src="https://example.com/x.jpg"><a href="/about">x</a><img src="//cdn.example.com/y.png">"#;
        let a = detect(true, body);
        assert!(!a.has_mixed_content);
        assert_eq!(a.count, 0);
    }

    #[test]
    fn every_srcset_candidate_checked() {
        let body = r#"<img srcset="http://example.com/a.png 1x, http://example.com/b.png 2x, https://example.com/c.png 3x">"#;
        let a = detect(true, body);
        assert_eq!(a.count, 2);
        assert!(a.http_resources.contains("http://example.com/b.png"));

        let preload = r#"<link rel="preload" as="image" imagesrcset='http://example.com/hero.jpg 800w'>"#;
        assert_eq!(detect(true, preload).count, 1);
    }

    #[test]
    fn plain_http_page_not_evaluated() {
        let a = detect(false, r#"<img src="http://example.com/x.jpg">"#);
        assert_eq!(a, MixedContentAnalysis::default());
    }
}
