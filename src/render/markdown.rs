//! Recursive HTML-to-markdown rendering
//!
//! Walks a [`DocumentNode`] tree depth-first and emits markdown that keeps the
//! semantic structure (headings, lists, links, images) while dropping all
//! presentational markup. This never fails: anything the tree builder could
//! not classify renders as plain text or a transparent container.

use crate::render::node::{DocumentNode, NodeKind};
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Renders a document tree to normalized markdown
///
/// Runs of two or more blank lines collapse to exactly one blank line, and the
/// result is trimmed of leading/trailing whitespace.
pub fn render(root: &DocumentNode) -> String {
    let raw = render_node(root);
    let collapsed = BLANK_LINE_RUNS.replace_all(&raw, "\n\n");
    collapsed.trim().to_string()
}

/// Convenience: parse HTML and render it in one step
pub fn render_html(html: &str) -> String {
    render(&DocumentNode::from_html(html))
}

fn render_node(node: &DocumentNode) -> String {
    match &node.kind {
        NodeKind::Text(text) => text.clone(),
        NodeKind::Anchor => render_anchor(node),
        NodeKind::Image => render_image(node),
        NodeKind::Heading(level) => {
            let content = render_children(node);
            format!(
                "\n\n{} {}\n\n",
                "#".repeat(usize::from(*level)),
                content.trim()
            )
        }
        NodeKind::Paragraph => format!("\n\n{}\n\n", render_children(node)),
        NodeKind::List { ordered } => render_list(node, *ordered),
        // A stray <li> outside a list renders transparently
        NodeKind::ListItem => render_children(node),
        NodeKind::LineBreak => "\n".to_string(),
        NodeKind::Container => render_children(node),
    }
}

fn render_children(node: &DocumentNode) -> String {
    node.children.iter().map(render_node).collect()
}

fn render_anchor(node: &DocumentNode) -> String {
    let href = node.attr("href");

    // An anchor wrapping a single image becomes a linked image
    let images = node.descendant_images();
    if images.len() == 1 {
        let image = render_image(images[0]);
        return match href {
            Some(href) if !href.is_empty() => format!("[{}]({})", image, href),
            _ => image,
        };
    }

    let content = render_children(node);
    match href {
        Some(href) if !href.is_empty() => format!("[{}]({})", content, href),
        _ => content,
    }
}

fn render_image(node: &DocumentNode) -> String {
    let alt = node.attr("alt").unwrap_or("");
    let src = node.attr("src").unwrap_or("");
    format!("![{}]({})", alt, src)
}

fn render_list(node: &DocumentNode, ordered: bool) -> String {
    let items: Vec<String> = node
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::ListItem)
        .enumerate()
        .map(|(index, item)| {
            let content = render_children(item);
            if ordered {
                format!("{}. {}", index + 1, content.trim())
            } else {
                format!("* {}", content.trim())
            }
        })
        .collect();

    format!("\n{}\n", items.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_verbatim() {
        assert_eq!(render_html("<body>just text</body>"), "just text");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render_html("<h1>Title</h1>"), "# Title");
        assert_eq!(render_html("<h3>  Sub  </h3>"), "### Sub");
        assert_eq!(render_html("<h6>Deep</h6>"), "###### Deep");
    }

    #[test]
    fn test_paragraphs_separated_by_one_blank_line() {
        let markdown = render_html("<p>first</p><p>second</p>");
        assert_eq!(markdown, "first\n\nsecond");
    }

    #[test]
    fn test_anchor_with_href() {
        let markdown = render_html(r#"<a href="https://example.com/page">this</a>"#);
        assert_eq!(markdown, "[this](https://example.com/page)");
    }

    #[test]
    fn test_anchor_without_href_unwrapped() {
        assert_eq!(render_html("<a>bare</a>"), "bare");
    }

    #[test]
    fn test_anchor_with_nested_markup() {
        let markdown = render_html(r#"<a href="https://x.example"><b>bold</b> text</a>"#);
        assert_eq!(markdown, "[bold text](https://x.example)");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            render_html(r#"<img src="pic.png" alt="A pic">"#),
            "![A pic](pic.png)"
        );
    }

    #[test]
    fn test_image_missing_attributes() {
        assert_eq!(render_html("<img>"), "![]()");
    }

    #[test]
    fn test_linked_image() {
        let markdown = render_html(
            r#"<a href="https://example.com"><img src="banner.png" alt="Banner"></a>"#,
        );
        assert_eq!(markdown, "[![Banner](banner.png)](https://example.com)");
    }

    #[test]
    fn test_linked_image_without_href() {
        let markdown = render_html(r#"<a><img src="banner.png" alt="Banner"></a>"#);
        assert_eq!(markdown, "![Banner](banner.png)");
    }

    #[test]
    fn test_linked_image_with_empty_href_unwrapped() {
        let markdown = render_html(r#"<a href=""><img src="banner.png" alt="Banner"></a>"#);
        assert_eq!(markdown, "![Banner](banner.png)");
    }

    #[test]
    fn test_anchor_with_two_images_renders_children() {
        let markdown =
            render_html(r#"<a href="https://x.example"><img src="a.png"><img src="b.png"></a>"#);
        assert_eq!(markdown, "[![](a.png)![](b.png)](https://x.example)");
    }

    #[test]
    fn test_unordered_list() {
        let markdown = render_html("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(markdown, "* one\n* two");
    }

    #[test]
    fn test_ordered_list_numbering() {
        let markdown = render_html("<ol><li>first</li><li>second</li><li>third</li></ol>");
        assert_eq!(markdown, "1. first\n2. second\n3. third");
    }

    #[test]
    fn test_list_item_with_link() {
        let markdown = render_html(r#"<ul><li><a href="https://a.example">go</a></li></ul>"#);
        assert_eq!(markdown, "* [go](https://a.example)");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(render_html("one<br>two"), "one\ntwo");
    }

    #[test]
    fn test_containers_transparent() {
        let markdown = render_html("<div><span>a</span><section>b</section></div>");
        assert_eq!(markdown, "ab");
    }

    #[test]
    fn test_no_triple_newlines_ever() {
        let markdown = render_html(
            "<h1>a</h1><p>b</p><h2>c</h2><p></p><p></p><ul><li>d</li></ul><p>e</p>",
        );
        assert!(!markdown.contains("\n\n\n"), "got: {:?}", markdown);
    }

    #[test]
    fn test_result_trimmed() {
        let markdown = render_html("<p>only</p>");
        assert_eq!(markdown, markdown.trim());
    }

    #[test]
    fn test_malformed_html_renders_as_text() {
        let markdown = render_html("<p>unclosed <b>and < stray brackets");
        assert!(markdown.contains("unclosed"));
        assert!(markdown.contains("and"));
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(render_html("   \n\t  "), "");
    }

    #[test]
    fn test_newsletter_shaped_document() {
        let html = r#"
            <html><body>
            <h1>Weekly Digest</h1>
            <p>Read <a href="https://example.com/article">the article</a> today.</p>
            <ul>
                <li><a href="https://example.com/one">Item one</a></li>
                <li>Plain item</li>
            </ul>
            </body></html>
        "#;
        let markdown = render_html(html);
        assert!(markdown.starts_with("# Weekly Digest"));
        assert!(markdown.contains("[the article](https://example.com/article)"));
        assert!(markdown.contains("* [Item one](https://example.com/one)"));
        assert!(markdown.contains("* Plain item"));
        assert!(!markdown.contains("\n\n\n"));
    }
}
