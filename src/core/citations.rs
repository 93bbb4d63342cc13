//! Grounding citations returned alongside model answers.

use hashbrown::HashSet;

/// A web source the model used to ground its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

impl Citation {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }
}

/// URL schemes a rendered link may point at.
pub const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Whether `uri` is safe to put in an `href`.
///
/// Absolute URLs must use one of [`ALLOWED_SCHEMES`]; scheme-less (relative or
/// fragment) references pass. Whitespace and control characters are ignored
/// the way browsers ignore them, so `java\tscript:` is still caught.
pub fn is_safe_link(uri: &str) -> bool {
    let cleaned: String = uri
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let end = cleaned
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(cleaned.len());
    match cleaned[..end].split_once(':') {
        None => true,
        Some((scheme, _)) => ALLOWED_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed)),
    }
}

/// Keep the first citation for each URI, in first-seen order.
///
/// Blank URIs and URIs failing [`is_safe_link`] are dropped. Blank titles
/// become `placeholder`.
pub fn dedup_citations<I>(raw: I, placeholder: &str) -> Vec<Citation>
where
    I: IntoIterator<Item = Citation>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for c in raw {
        let uri = c.uri.trim();
        if uri.is_empty() || !is_safe_link(uri) || !seen.insert(uri.to_string()) {
            continue;
        }
        let title = c.title.trim();
        out.push(Citation {
            uri: uri.to_string(),
            title: if title.is_empty() {
                placeholder.to_string()
            } else {
                title.to_string()
            },
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_by_uri_keeps_first_seen_order() {
        let raw = vec![
            Citation::new("https://a.example", "A"),
            Citation::new("https://b.example", "B"),
            Citation::new("https://a.example", "A again"),
            Citation::new("https://c.example", "C"),
        ];
        let out = dedup_citations(raw, "来源");
        let uris: Vec<&str> = out.iter().map(|c| c.uri.as_str()).collect();
        assert_eq!(
            uris,
            ["https://a.example", "https://b.example", "https://c.example"]
        );
        assert_eq!(out[0].title, "A");
    }

    #[test]
    fn same_title_different_uri_is_kept() {
        let raw = vec![
            Citation::new("https://a.example", "Same"),
            Citation::new("https://b.example", "Same"),
        ];
        assert_eq!(dedup_citations(raw, "-").len(), 2);
    }

    #[test]
    fn blank_titles_get_placeholder_and_blank_uris_are_dropped() {
        let raw = vec![
            Citation::new("https://x.com", ""),
            Citation::new("   ", "orphan"),
            Citation::new("https://y.com", "  "),
        ];
        let out = dedup_citations(raw, "网页来源");
        assert_eq!(
            out,
            vec![
                Citation::new("https://x.com", "网页来源"),
                Citation::new("https://y.com", "网页来源"),
            ]
        );
    }

    #[test]
    fn link_schemes_are_allowlisted() {
        for ok in [
            "https://a.example/x?y#z",
            "HTTP://A.EXAMPLE",
            "mailto:someone@example.com",
            "/relative/path",
            "#anchor",
            "page?a=b:c",
        ] {
            assert!(is_safe_link(ok), "{ok}");
        }
        for bad in [
            "javascript:alert(document.cookie)",
            "JavaScript:alert(1)",
            " java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "vbscript:msgbox",
        ] {
            assert!(!is_safe_link(bad), "{bad}");
        }
    }

    #[test]
    fn script_citations_are_dropped() {
        let raw = vec![
            Citation::new("javascript:alert(1)", "evil"),
            Citation::new("https://ok.example", "ok"),
            Citation::new("data:text/html,hi", ""),
        ];
        assert_eq!(
            dedup_citations(raw, "-"),
            vec![Citation::new("https://ok.example", "ok")]
        );
    }

    #[test]
    fn dedup_is_idempotent() {
        let raw = vec![
            Citation::new("A", "a"),
            Citation::new("B", "b"),
            Citation::new("A", "a"),
            Citation::new("C", ""),
        ];
        let once = dedup_citations(raw, "?");
        let twice = dedup_citations(once.clone(), "?");
        assert_eq!(once, twice);
    }
}
