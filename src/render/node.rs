use scraper::{Html, Node, Selector};
use std::collections::HashMap;

/// The closed set of tag kinds the renderer understands
///
/// Anything outside this set becomes a transparent `Container` whose children
/// render with no added formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A text run, emitted verbatim
    Text(String),
    /// `<a>`
    Anchor,
    /// `<img>`
    Image,
    /// `<h1>`..`<h6>`, with the heading level (1-6)
    Heading(u8),
    /// `<p>`
    Paragraph,
    /// `<ul>` or `<ol>`
    List { ordered: bool },
    /// `<li>`
    ListItem,
    /// `<br>`
    LineBreak,
    /// Any other element
    Container,
}

/// A node in the parsed HTML tree
///
/// Owned tree: each node exclusively owns its children, which is sufficient
/// because parsed HTML contains no cycles. Produced by [`DocumentNode::from_html`],
/// consumed by [`crate::render::render`].
#[derive(Debug, Clone)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub attrs: HashMap<String, String>,
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Creates a text node. Text nodes never have attributes or children.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(content.into()),
            attrs: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Parses arbitrary HTML into a document tree
    ///
    /// Uses an error-tolerant HTML5 parser, so malformed or unclosed markup
    /// never fails: unparseable fragments degrade to plain text. Renders from
    /// `<body>` when present; script, style and head metadata subtrees are
    /// skipped entirely.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);

        let children = match Selector::parse("body")
            .ok()
            .and_then(|selector| document.select(&selector).next())
        {
            Some(body) => build_children(*body),
            None => build_children(document.tree.root()),
        };

        Self {
            kind: NodeKind::Container,
            attrs: HashMap::new(),
            children,
        }
    }

    /// Returns an attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Collects all image nodes in this subtree, depth-first
    pub fn descendant_images(&self) -> Vec<&DocumentNode> {
        let mut images = Vec::new();
        collect_images(self, &mut images);
        images
    }
}

fn collect_images<'a>(node: &'a DocumentNode, out: &mut Vec<&'a DocumentNode>) {
    for child in &node.children {
        if child.kind == NodeKind::Image {
            out.push(child);
        }
        collect_images(child, out);
    }
}

/// Elements whose entire subtree carries no readable content
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

fn build_children(node: ego_tree::NodeRef<Node>) -> Vec<DocumentNode> {
    node.children().filter_map(build_node).collect()
}

fn build_node(node: ego_tree::NodeRef<Node>) -> Option<DocumentNode> {
    match node.value() {
        Node::Text(text) => Some(DocumentNode::text(text.text.to_string())),
        Node::Element(element) => {
            let name = element.name();
            if SKIPPED_TAGS.contains(&name) {
                return None;
            }

            let attrs = element
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();

            Some(DocumentNode {
                kind: kind_for_tag(name),
                attrs,
                children: build_children(node),
            })
        }
        // Comments, doctypes, and processing instructions carry no content
        _ => None,
    }
}

fn kind_for_tag(name: &str) -> NodeKind {
    match name {
        "a" => NodeKind::Anchor,
        "img" => NodeKind::Image,
        "h1" => NodeKind::Heading(1),
        "h2" => NodeKind::Heading(2),
        "h3" => NodeKind::Heading(3),
        "h4" => NodeKind::Heading(4),
        "h5" => NodeKind::Heading(5),
        "h6" => NodeKind::Heading(6),
        "p" => NodeKind::Paragraph,
        "ul" => NodeKind::List { ordered: false },
        "ol" => NodeKind::List { ordered: true },
        "li" => NodeKind::ListItem,
        "br" => NodeKind::LineBreak,
        _ => NodeKind::Container,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_child(node: &DocumentNode) -> &DocumentNode {
        node.children.first().expect("expected a child node")
    }

    #[test]
    fn test_text_node_has_no_children() {
        let node = DocumentNode::text("hello");
        assert_eq!(node.kind, NodeKind::Text("hello".to_string()));
        assert!(node.children.is_empty());
        assert!(node.attrs.is_empty());
    }

    #[test]
    fn test_tag_mapping() {
        let tree = DocumentNode::from_html(
            "<body><a href='x'>l</a><img src='y'><h3>h</h3><p>p</p><ul><li>i</li></ul><ol></ol><br><div></div></body>",
        );
        let kinds: Vec<&NodeKind> = tree.children.iter().map(|c| &c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &NodeKind::Anchor,
                &NodeKind::Image,
                &NodeKind::Heading(3),
                &NodeKind::Paragraph,
                &NodeKind::List { ordered: false },
                &NodeKind::List { ordered: true },
                &NodeKind::LineBreak,
                &NodeKind::Container,
            ]
        );
    }

    #[test]
    fn test_attributes_preserved() {
        let tree = DocumentNode::from_html(r#"<body><a href="https://example.com">x</a></body>"#);
        let anchor = first_child(&tree);
        assert_eq!(anchor.attr("href"), Some("https://example.com"));
        assert_eq!(anchor.attr("missing"), None);
    }

    #[test]
    fn test_renders_from_body_only() {
        let tree = DocumentNode::from_html(
            "<html><head><title>ignored</title></head><body><p>kept</p></body></html>",
        );
        assert_eq!(tree.children.len(), 1);
        assert_eq!(first_child(&tree).kind, NodeKind::Paragraph);
    }

    #[test]
    fn test_script_and_style_skipped() {
        let tree = DocumentNode::from_html(
            "<body><script>var x = 1;</script><style>p{}</style><p>visible</p></body>",
        );
        assert_eq!(tree.children.len(), 1);
        assert_eq!(first_child(&tree).kind, NodeKind::Paragraph);
    }

    #[test]
    fn test_comments_skipped() {
        let tree = DocumentNode::from_html("<body><!-- note --><p>x</p></body>");
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let tree = DocumentNode::from_html("<p>unclosed <a href='x'>nested <b>deeper");
        assert!(!tree.children.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let tree = DocumentNode::from_html("");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_descendant_images() {
        let tree = DocumentNode::from_html(
            "<body><a><span><img src='a.png'></span></a><img src='b.png'></body>",
        );
        let anchor = first_child(&tree);
        assert_eq!(anchor.descendant_images().len(), 1);
        assert_eq!(tree.descendant_images().len(), 2);
    }
}
