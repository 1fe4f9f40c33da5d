//! Pattern helpers over raw, unparsed HTML.
//!
//! Nothing here builds a DOM: markup seen in the wild is frequently
//! malformed, so every helper degrades to "no match" instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());

// A form without a closing tag runs to the end of the document.
static FORM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<form\b([^>]*)>(.*?)(?:</form\s*>|\z)").unwrap());

static INPUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<input\b([^>]*)>").unwrap());

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

/// A `<script>` element as found in the raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    pub attrs: &'a str,
    pub content: &'a str,
}

impl<'a> ScriptBlock<'a> {
    pub fn has_src(&self) -> bool {
        attr_value(self.attrs, "src").is_some()
    }

    /// No `src` and some non-whitespace body.
    pub fn is_inline(&self) -> bool {
        !self.has_src() && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBlock<'a> {
    pub attrs: &'a str,
    pub content: &'a str,
}

impl<'a> FormBlock<'a> {
    pub fn method(&self) -> Option<String> {
        attr_value(self.attrs, "method").map(|m| m.trim().to_ascii_lowercase())
    }

    pub fn is_post(&self) -> bool {
        self.method().as_deref() == Some("post")
    }

    /// Names of `<input type="hidden">` fields inside the form.
    pub fn hidden_input_names(&self) -> Vec<String> {
        INPUT_RE
            .captures_iter(self.content)
            .filter_map(|cap| {
                let attrs = cap.get(1)?.as_str();
                let kind = attr_value(attrs, "type")?;
                if !kind.trim().eq_ignore_ascii_case("hidden") {
                    return None;
                }
                attr_value(attrs, "name")
            })
            .collect()
    }
}

pub fn scripts(body: &str) -> impl Iterator<Item = ScriptBlock<'_>> {
    SCRIPT_RE.captures_iter(body).filter_map(|cap| {
        Some(ScriptBlock {
            attrs: cap.get(1)?.as_str(),
            content: cap.get(2)?.as_str(),
        })
    })
}

pub fn inline_scripts(body: &str) -> impl Iterator<Item = ScriptBlock<'_>> {
    scripts(body).filter(|s| s.is_inline())
}

pub fn forms(body: &str) -> impl Iterator<Item = FormBlock<'_>> {
    FORM_RE.captures_iter(body).filter_map(|cap| {
        Some(FormBlock {
            attrs: cap.get(1)?.as_str(),
            content: cap.get(2).map(|m| m.as_str()).unwrap_or(""),
        })
    })
}

/// Value of attribute `name` within a tag's attribute text, unquoted.
/// Valueless attributes (`<script async>`) yield an empty string.
pub fn attr_value(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|cap| {
        let attr = cap.get(1)?.as_str();
        if !attr.eq_ignore_ascii_case(name) {
            return None;
        }
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_inline_and_external_scripts() {
        let body = r#"<script src="/app.js"></script><SCRIPT type="text/javascript">run()</SCRIPT><script>  </script>"#;
        let all: Vec<_> = scripts(body).collect();
        assert_eq!(all.len(), 3);
        assert!(all[0].has_src());
        let inline: Vec<_> = inline_scripts(body).collect();
        assert_eq!(inline.len(), 1);
        assert_eq!(inline[0].content, "run()");
    }

    #[test]
    fn data_src_is_not_src() {
        let body = r#"<script data-src="/lazy.js">boot()</script>"#;
        assert_eq!(inline_scripts(body).count(), 1);
    }

    #[test]
    fn attribute_quoting_styles() {
        assert_eq!(attr_value(r#" method="POST""#, "method").as_deref(), Some("POST"));
        assert_eq!(attr_value(" method='post'", "method").as_deref(), Some("post"));
        assert_eq!(attr_value(" method=post action=/x", "method").as_deref(), Some("post"));
        assert_eq!(attr_value(" async", "async").as_deref(), Some(""));
        assert_eq!(attr_value(r#" action="/login""#, "method"), None);
    }

    #[test]
    fn form_hidden_inputs() {
        let body = r#"<form method="POST" action="/save">
            <input type="hidden" name="csrf_token" value="abc">
            <input type="text" name="token_label">
            <input type=HIDDEN name=session_id>
        </form>"#;
        let form = forms(body).next().unwrap();
        assert!(form.is_post());
        assert_eq!(form.hidden_input_names(), vec!["csrf_token".to_string(), "session_id".to_string()]);
    }

    #[test]
    fn unclosed_form_runs_to_end() {
        let body = r#"<form method="post"><input type="hidden" name="authenticity_token">"#;
        let form = forms(body).next().unwrap();
        assert_eq!(form.hidden_input_names().len(), 1);
    }

    #[test]
    fn malformed_markup_yields_nothing() {
        assert_eq!(scripts("<script>never closed").count(), 0);
        assert_eq!(forms("<form").count(), 0);
    }
}
