use pulldown_cmark::{html, Event, Options, Parser};

/// Render announcement Markdown to HTML. Raw HTML in the source is shown as
/// text rather than injected into the page.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let out = render_markdown("**Bonus** week starts _Monday_");
        assert!(out.contains("<strong>Bonus</strong>"));
        assert!(out.contains("<em>Monday</em>"));
    }

    #[test]
    fn escapes_raw_html() {
        let out = render_markdown("hello <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn renders_lists() {
        let out = render_markdown("- one\n- two\n");
        assert!(out.contains("<li>one</li>"));
        assert!(out.contains("<li>two</li>"));
    }
}
