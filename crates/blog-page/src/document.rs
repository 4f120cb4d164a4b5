//! Page document model
//!
//! A page as the decorators see it: head metadata, a header and footer block,
//! and `main` made of sections holding default content and blocks. Blocks are
//! authored as rows of cells; each cell holds nodes.

use crate::error::PageResult;
use blog_core::Language;
use blog_taxonomy::TopicLink;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whole page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Site path of the page
    pub path: String,
    /// Document language attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Head metadata and links
    #[serde(default)]
    pub head: Head,
    /// Classes on `<body>`
    #[serde(default)]
    pub body_classes: Vec<String>,
    /// Header block, loaded as the global navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Block>,
    /// Main content; absent on pages without `<main>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<Main>,
    /// Footer block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Block>,
}

impl Page {
    /// Create empty page at a path
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            main: Some(Main::default()),
            ..Self::default()
        }
    }

    /// Parse page JSON
    ///
    /// # Errors
    /// Returns `PageError::Json` if the document does not match the page shape
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns `PageError::Json` if serialization fails
    pub fn to_json(&self) -> PageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Language resolved from the page path
    #[inline]
    #[must_use]
    pub fn language(&self) -> Language {
        Language::from_path(&self.path)
    }

    /// Add a body class once
    pub fn add_body_class(&mut self, class: &str) {
        if !self.has_body_class(class) {
            self.body_classes.push(class.to_string());
        }
    }

    /// Check for a body class
    #[must_use]
    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.iter().any(|c| c == class)
    }

    /// Visit every anchor on the page, header and footer included
    pub fn for_each_anchor_mut<F: FnMut(&mut Anchor)>(&mut self, mut f: F) {
        if let Some(header) = &mut self.header {
            header.visit_anchors(&mut f);
        }
        if let Some(main) = &mut self.main {
            for section in &mut main.sections {
                for node in &mut section.nodes {
                    node.visit_anchors(&mut f);
                }
            }
        }
        if let Some(footer) = &mut self.footer {
            footer.visit_anchors(&mut f);
        }
    }
}

/// Document head
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    /// `<meta>` elements in document order
    #[serde(default)]
    pub metas: Vec<MetaTag>,
    /// `<link>` elements
    #[serde(default)]
    pub links: Vec<HeadLink>,
}

/// `<meta>` element keyed by `name` or `property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// `name` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `property` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// `content` attribute
    pub content: String,
}

impl MetaTag {
    /// `<meta name=… content=…>`
    #[must_use]
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            property: None,
            content: content.into(),
        }
    }

    /// `<meta property=… content=…>`
    #[must_use]
    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: Some(property.into()),
            content: content.into(),
        }
    }
}

/// `<link>` element in the head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadLink {
    /// Link relation
    pub rel: String,
    /// Link target
    pub href: String,
}

/// Main content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Main {
    /// Sections in document order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Main {
    /// Create main from sections
    #[inline]
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Find a block by name, searching nested blocks too
    #[must_use]
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.sections
            .iter()
            .flat_map(|s| s.nodes.iter())
            .find_map(|n| n.find_block(name))
    }

    /// Check for a block by name
    #[inline]
    #[must_use]
    pub fn has_block(&self, name: &str) -> bool {
        self.find_block(name).is_some()
    }

    /// Top-level blocks with their positions
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .nodes
                .iter()
                .enumerate()
                .filter_map(move |(n, node)| match node {
                    Node::Block(block) => Some((BlockId { section: s, node: n }, block)),
                    _ => None,
                })
        })
    }

    /// Top-level block at a position
    #[must_use]
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        match self.sections.get_mut(id.section)?.nodes.get_mut(id.node)? {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Index of the first section carrying a class
    #[must_use]
    pub fn section_with_class(&self, class: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.has_class(class))
    }

    /// Text of the first heading of the given levels, in document order
    #[must_use]
    pub fn first_heading_text(&self, levels: &[u8]) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.nodes.iter())
            .find_map(|n| n.first_heading_text(levels))
    }
}

/// Position of a top-level block in `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Index of the section
    pub section: usize,
    /// Index of the block among the section nodes
    pub node: usize,
}

/// Section of `main`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section classes, metadata styles included
    #[serde(default)]
    pub classes: Vec<String>,
    /// Section attributes, `data-*` metadata
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Load status once decorated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoadStatus>,
    /// Default content and blocks
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Section {
    /// Create section from nodes
    #[inline]
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Add a class once
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Check for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether the section holds no content
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lifecycle of sections and blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// Authored, not decorated
    #[default]
    Authored,
    /// Decorated, waiting for load
    Initialized,
    /// Load in progress
    Loading,
    /// Loaded and rendered
    Loaded,
}

/// Content node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    /// `h1` to `h6`
    Heading {
        /// Heading level, 1 to 6
        level: u8,
        /// Heading text
        text: String,
    },
    /// Paragraph with optional classes
    Paragraph {
        /// Paragraph classes
        #[serde(default)]
        classes: Vec<String>,
        /// Inline content
        content: Vec<Inline>,
    },
    /// Picture outside a paragraph
    Picture(Picture),
    /// Unordered list, one entry per item
    List {
        /// Content of each item
        items: Vec<Vec<Inline>>,
    },
    /// Block
    Block(Block),
}

impl Node {
    /// Heading node
    #[must_use]
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Paragraph of inline content
    #[must_use]
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::Paragraph {
            classes: Vec::new(),
            content,
        }
    }

    /// Paragraph holding plain text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::paragraph(vec![Inline::text(text)])
    }

    /// Check for a heading of one of the given levels
    #[must_use]
    pub fn is_heading(&self, levels: &[u8]) -> bool {
        matches!(self, Self::Heading { level, .. } if levels.contains(level))
    }

    /// Paragraph content, if this is a paragraph
    #[must_use]
    pub fn paragraph_content(&self) -> Option<&[Inline]> {
        match self {
            Self::Paragraph { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Whether this is a paragraph holding a picture at its top level
    #[must_use]
    pub fn is_picture_paragraph(&self) -> bool {
        self.paragraph_content()
            .is_some_and(|c| c.iter().any(|i| matches!(i, Inline::Picture(_))))
    }

    /// Whether this is a paragraph starting with emphasis (an image caption)
    #[must_use]
    pub fn is_caption(&self) -> bool {
        matches!(
            self.paragraph_content().and_then(<[Inline]>::first),
            Some(Inline::Emphasis { .. })
        )
    }

    /// Plain text of the node
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Heading { text, .. } => text.clone(),
            Self::Paragraph { content, .. } => inline_text(content),
            Self::Picture(_) => String::new(),
            Self::List { items } => items
                .iter()
                .map(|i| inline_text(i))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Block(block) => block
                .cells()
                .flat_map(|c| c.iter())
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn find_block(&self, name: &str) -> Option<&Block> {
        match self {
            Self::Block(block) if block.name == name => Some(block),
            Self::Block(block) => block
                .cells()
                .flat_map(|c| c.iter())
                .find_map(|n| n.find_block(name)),
            _ => None,
        }
    }

    fn first_heading_text(&self, levels: &[u8]) -> Option<&str> {
        match self {
            Self::Heading { level, text } if levels.contains(level) => Some(text),
            Self::Block(block) => block
                .cells()
                .flat_map(|c| c.iter())
                .find_map(|n| n.first_heading_text(levels)),
            _ => None,
        }
    }

    pub(crate) fn visit_anchors<F: FnMut(&mut Anchor)>(&mut self, f: &mut F) {
        match self {
            Self::Paragraph { content, .. } => visit_inline_anchors(content, f),
            Self::List { items } => {
                for item in items {
                    visit_inline_anchors(item, f);
                }
            }
            Self::Block(block) => block.visit_anchors(f),
            Self::Heading { .. } | Self::Picture(_) => {}
        }
    }
}

/// Inline content of paragraphs and list items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Inline {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Link
    Link(Anchor),
    /// Picture
    Picture(Picture),
    /// Bold
    Strong {
        /// Bold content
        content: Vec<Inline>,
    },
    /// Italic
    Emphasis {
        /// Italic content
        content: Vec<Inline>,
    },
}

impl Inline {
    /// Plain text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Whether this is a bold/italic wrapper holding a picture
    #[must_use]
    pub fn is_styled_picture(&self) -> bool {
        match self {
            Self::Strong { content } | Self::Emphasis { content } => {
                content.iter().any(|i| matches!(i, Inline::Picture(_)))
            }
            _ => false,
        }
    }
}

fn inline_text(content: &[Inline]) -> String {
    content
        .iter()
        .map(|i| match i {
            Inline::Text { text } => text.clone(),
            Inline::Link(a) => a.text.clone(),
            Inline::Picture(_) => String::new(),
            Inline::Strong { content } | Inline::Emphasis { content } => inline_text(content),
        })
        .collect()
}

fn visit_inline_anchors<F: FnMut(&mut Anchor)>(content: &mut [Inline], f: &mut F) {
    for inline in content {
        match inline {
            Inline::Link(anchor) => f(anchor),
            Inline::Strong { content } | Inline::Emphasis { content } => {
                visit_inline_anchors(content, f);
            }
            Inline::Text { .. } | Inline::Picture(_) => {}
        }
    }
}

/// Anchor element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Anchor {
    /// Link target; empty while a topic link is deferred
    pub href: String,
    /// Link text
    #[serde(default)]
    pub text: String,
    /// Raw topic name awaiting resolution (`data-topic-link`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_link: Option<String>,
}

impl Anchor {
    /// Plain link
    #[must_use]
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            topic_link: None,
        }
    }
}

impl From<TopicLink> for Anchor {
    fn from(link: TopicLink) -> Self {
        match link {
            TopicLink::Resolved { href, label } => Self {
                href,
                text: label,
                topic_link: None,
            },
            TopicLink::Deferred { topic, label } => Self {
                href: String::new(),
                text: label,
                topic_link: Some(topic),
            },
        }
    }
}

/// Picture element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Picture {
    /// Image URL
    pub src: String,
    /// Alt text
    #[serde(default)]
    pub alt: String,
}

impl Picture {
    /// Create picture
    #[must_use]
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Cell of a block row
pub type Cell = Vec<Node>;

/// Block: a named component authored as a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block name, the first class
    pub name: String,
    /// Variant classes
    #[serde(default)]
    pub variants: Vec<String>,
    /// Block attributes
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Load status
    #[serde(default)]
    pub status: LoadStatus,
    /// Rows of cells
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Block {
    /// Build a block from rows of cells
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
            ..Self::default()
        }
    }

    /// Block with a single cell
    #[must_use]
    pub fn single(name: impl Into<String>, cell: Cell) -> Self {
        Self::new(name, vec![vec![cell]])
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.iter())
    }

    /// With an attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Visit every anchor in the block, nested blocks included
    pub fn for_each_anchor_mut<F: FnMut(&mut Anchor)>(&mut self, mut f: F) {
        self.visit_anchors(&mut f);
    }

    fn visit_anchors<F: FnMut(&mut Anchor)>(&mut self, f: &mut F) {
        for row in &mut self.rows {
            for cell in row {
                for node in cell {
                    node.visit_anchors(f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        let mut page = Page::new("/en/publish/post");
        page.header = Some(Block::single(
            "gnav",
            vec![Node::paragraph(vec![Inline::Link(Anchor::new("/en", "Home"))])],
        ));
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "Title"),
            Node::paragraph(vec![Inline::Strong {
                content: vec![Inline::Link(Anchor::new("/en/a", "A"))],
            }]),
            Node::Block(Block::single(
                "cards",
                vec![Node::List {
                    items: vec![vec![Inline::Link(Anchor::new("/en/b", "B"))]],
                }],
            )),
        ])]));
        page
    }

    #[test]
    fn visits_all_anchors() {
        let mut page = page();
        let mut hrefs = Vec::new();
        page.for_each_anchor_mut(|a| hrefs.push(a.href.clone()));
        assert_eq!(hrefs, vec!["/en", "/en/a", "/en/b"]);
    }

    #[test]
    fn find_nested_block() {
        let mut page = page();
        let main = page.main.as_mut().unwrap();
        main.sections[0].nodes.push(Node::Block(Block::single(
            "columns",
            vec![Node::Block(Block::new("video", vec![]))],
        )));
        assert!(main.has_block("video"));
        assert!(!main.has_block("carousel"));
    }

    #[test]
    fn block_positions() {
        let page = page();
        let main = page.main.as_ref().unwrap();
        let ids: Vec<_> = main.blocks().map(|(id, b)| (id, b.name.clone())).collect();
        assert_eq!(ids, vec![(BlockId { section: 0, node: 2 }, "cards".to_string())]);
    }

    #[test]
    fn deferred_topic_link_to_anchor() {
        let anchor: Anchor = TopicLink::Deferred {
            topic: "Cloud".to_string(),
            label: "Cloud".to_string(),
        }
        .into();
        assert_eq!(anchor.href, "");
        assert_eq!(anchor.topic_link.as_deref(), Some("Cloud"));
    }

    #[test]
    fn page_json_roundtrip_shape() {
        let json = r#"{
            "path": "/de/topics/cloud",
            "main": { "sections": [ { "nodes": [
                { "type": "heading", "level": 1, "text": "Cloud" },
                { "type": "paragraph", "content": [ { "type": "picture", "src": "/media/a.png" } ] },
                { "type": "block", "name": "article-feed", "rows": [] }
            ] } ] }
        }"#;
        let page = Page::from_json(json).unwrap();
        assert_eq!(page.language(), Language::De);
        let main = page.main.as_ref().unwrap();
        assert!(main.sections[0].nodes[1].is_picture_paragraph());
        assert!(main.has_block("article-feed"));
        assert_eq!(main.first_heading_text(&[1, 2]), Some("Cloud"));
    }

    #[test]
    fn caption_detection() {
        let caption = Node::paragraph(vec![Inline::Emphasis {
            content: vec![Inline::text("Photo by X")],
        }]);
        assert!(caption.is_caption());
        assert!(!Node::text("plain").is_caption());
        assert_eq!(caption.text_content(), "Photo by X");
    }
}
