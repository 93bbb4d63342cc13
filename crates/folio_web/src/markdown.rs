//! Markdown rendering for assistant replies.
//!
//! Lives outside the wasm-only `web` module so the sanitizing rules are
//! unit-tested on the host.

use folio::citations::is_safe_link;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Renders an assistant reply from Markdown into HTML for `inner_html`.
///
/// Raw HTML is escaped. Links and images whose destination fails
/// [`is_safe_link`] are unwrapped: their text stays, the element goes.
pub fn render_reply(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Links do not nest, but an image may sit inside a link.
    let mut dropped_link = false;
    let mut dropped_image = false;

    let events = Parser::new_ext(md, options).filter_map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { ref dest_url, .. }) if !is_safe_link(dest_url) => {
            dropped_link = true;
            None
        }
        Event::End(TagEnd::Link) if dropped_link => {
            dropped_link = false;
            None
        }
        Event::Start(Tag::Image { ref dest_url, .. }) if !is_safe_link(dest_url) => {
            dropped_image = true;
            None
        }
        Event::End(TagEnd::Image) if dropped_image => {
            dropped_image = false;
            None
        }
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_links_keep_text_but_lose_href() {
        let out = render_reply("[点我](javascript:alert(document.cookie))");
        assert!(!out.contains("javascript:"), "{out}");
        assert!(!out.contains("<a"), "{out}");
        assert!(out.contains("点我"));
    }

    #[test]
    fn script_images_are_unwrapped() {
        let out = render_reply("![alt text](javascript:alert(1)) and ![x](data:image/svg+xml,hi)");
        assert!(!out.contains("<img"), "{out}");
        assert!(!out.contains("javascript:"));
        assert!(!out.contains("data:"));
        assert!(out.contains("alt text"));
    }

    #[test]
    fn web_links_survive() {
        let out = render_reply("see [docs](https://example.com/a) or [mail](mailto:a@b.c)");
        assert!(out.contains(r#"<a href="https://example.com/a">docs</a>"#), "{out}");
        assert!(out.contains(r#"href="mailto:a@b.c""#));
    }

    #[test]
    fn raw_html_is_escaped() {
        let out = render_reply("hi <script>alert(1)</script>\n\n<img src=x onerror=alert(1)>");
        assert!(!out.contains("<script"), "{out}");
        assert!(!out.contains("<img"), "{out}");
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn safe_link_inside_unsafe_link_text_is_not_broken() {
        let out = render_reply("[![logo](https://x.example/l.png)](javascript:void(0))");
        assert!(!out.contains("javascript:"), "{out}");
        assert!(out.contains(r#"<img src="https://x.example/l.png""#), "{out}");
    }
}
