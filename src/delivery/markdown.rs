//! Markdown to HTML conversion for formatted message bodies

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML. Inline HTML in the source is passed through.
///
/// A message that is a single paragraph is returned without the wrapping `<p>`,
/// which is how chat clients expect short formatted bodies.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);

    let trimmed = out.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        if !inner.contains("<p>") {
            return inner.to_string();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_paragraph_unwrapped() {
        assert_eq!(to_html("Deploy **done**"), "Deploy <strong>done</strong>");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(to_html("hello"), "hello");
    }

    #[test]
    fn test_multiple_paragraphs_kept() {
        let html = to_html("first\n\nsecond");
        assert_eq!(html, "<p>first</p>\n<p>second</p>\n");
    }

    #[test]
    fn test_inline_html_passthrough() {
        assert_eq!(
            to_html("status: <font color=\"red\">down</font>"),
            "status: <font color=\"red\">down</font>"
        );
    }

    #[test]
    fn test_list() {
        let html = to_html("- a\n- b");
        assert!(html.starts_with("<ul>"));
        assert!(html.contains("<li>a</li>"));
    }
}
