//! Markdown rendering to plain text

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Render markdown to syntax-stripped plain text
///
/// Headings and paragraphs become newline-separated blocks; inline code and
/// code block contents are kept as plain text; link text is kept, URLs are
/// dropped.
pub fn markdown_to_text(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. })
            | Event::Start(Tag::Paragraph)
            | Event::Start(Tag::Item)
            | Event::Start(Tag::BlockQuote(_)) => {
                push_block_break(&mut out);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                push_block_break(&mut out);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) => {
                if in_code_block {
                    out.push_str(text.trim_end_matches('\n'));
                } else {
                    out.push_str(&text);
                }
            }
            Event::Code(code) => {
                out.push_str(&code);
            }
            Event::SoftBreak | Event::HardBreak => {
                out.push(' ');
            }
            _ => {}
        }
    }

    out.trim().to_string()
}

fn push_block_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_heading_syntax() {
        let text = markdown_to_text("# Title\n\nSome content here.");
        assert_eq!(text, "Title\nSome content here.");
    }

    #[test]
    fn test_strips_emphasis_and_links() {
        let text = markdown_to_text("Read the *friendly* [manual](https://example.com).");
        assert_eq!(text, "Read the friendly manual.");
    }

    #[test]
    fn test_inline_code_kept_as_text() {
        let text = markdown_to_text("Run `cargo build` first.");
        assert_eq!(text, "Run cargo build first.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_text(""), "");
    }
}
