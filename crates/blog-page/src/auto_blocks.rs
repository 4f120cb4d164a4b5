//! Auto blocking
//!
//! Synthesises blocks from default content and page metadata: hero, article
//! header, topic and author headers with their article feeds, social links,
//! images blocks and the newsletter modal.
//!
//! Builders run in order. The first failure stops auto blocking for the page;
//! it is logged and reported, never propagated.

use crate::document::{Anchor, Block, Cell, Inline, Main, Node, Page, Picture, Section};
use crate::error::{PageError, PageResult};
use crate::metadata::ARTICLE_TAG;
use blog_core::{to_class_name, Language};
use blog_taxonomy::{link_for_topic, TaxonomyStore};
use serde::Serialize;

/// Position of a node directly inside a section
type NodePos = (usize, usize);

/// What auto blocking did to a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoBlockReport {
    /// Names of the blocks built, in build order
    pub built: Vec<&'static str>,
    /// An article header was built, so this is an article page
    pub article_header: bool,
    /// Failure that stopped auto blocking
    pub error: Option<String>,
}

impl AutoBlockReport {
    fn record(&mut self, name: &'static str) {
        self.built.push(name);
    }
}

/// Build all synthetic blocks of a page
///
/// `store` is the taxonomy as known at this point; before it has loaded,
/// topic links are emitted deferred.
pub fn build_auto_blocks(page: &mut Page, store: Option<&TaxonomyStore>) -> AutoBlockReport {
    let mut report = AutoBlockReport::default();
    let Some(main) = page.main.as_mut() else {
        return report;
    };
    strip_picture_styling(main);

    if let Err(e) = run_builders(page, store, &mut report) {
        tracing::error!("Auto Blocking failed: {}", e);
        report.error = Some(e.to_string());
    }
    report
}

fn run_builders(
    page: &mut Page,
    store: Option<&TaxonomyStore>,
    report: &mut AutoBlockReport,
) -> PageResult<()> {
    let language = page.language();
    let is_topic_page = page.path.contains("/topics/");
    let is_author_page = page.path.contains("/authors/");
    let header = ArticleHeaderMeta::from_page(page, language);
    let main = page.main.as_mut().ok_or(PageError::NoMain)?;
    let header = header.filter(|_| !main.has_block("article-header"));

    // the article header claims the h1 and picture the hero would take
    if header.is_none() && build_hero(main) {
        report.record("hero");
    }
    if let Some(meta) = header {
        build_article_header(main, &meta, store, &page.path)?;
        report.record("article-header");
        report.article_header = true;
    }
    if is_topic_page {
        if build_tag_header(main) {
            report.record("tag-header");
        }
        if !main.has_block("article-feed") {
            build_article_feed(main, "tags")?;
            report.record("article-feed");
        }
    }
    if is_author_page {
        build_author_header(main)?;
        report.record("author-header");
        if build_social_links(main) {
            report.record("social-links");
        }
        if !main.has_block("article-feed") {
            build_article_feed(main, "author")?;
            report.record("article-feed");
        }
    }
    if build_image_blocks(main) > 0 {
        report.record("images");
    }
    build_newsletter_modal(main);
    report.record("newsletter-modal");
    Ok(())
}

/// Metadata the article header is built from
struct ArticleHeaderMeta {
    category: String,
    author: String,
    author_url: String,
    publication_date: String,
}

impl ArticleHeaderMeta {
    /// Present only on pages carrying a publication date
    fn from_page(page: &Page, language: Language) -> Option<Self> {
        let publication_date = page.head.get("publication-date")?;
        let category = page
            .head
            .get_all(ARTICLE_TAG)
            .into_iter()
            .next()
            .unwrap_or_default();
        let author = page.head.get("author").unwrap_or_default();
        let author_url = page.head.get("author-url").unwrap_or_else(|| {
            format!("{}/authors/{}", language.root_path(), to_class_name(&author))
        });
        Some(Self {
            category,
            author,
            author_url,
            publication_date,
        })
    }
}

/// Remove bold/italic wrappers around pictures, moving the pictures to the
/// start of their paragraph
pub fn strip_picture_styling(main: &mut Main) {
    for section in &mut main.sections {
        strip_in_nodes(&mut section.nodes);
    }
}

fn strip_in_nodes(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Paragraph { content, .. } => {
                if content.iter().any(Inline::is_styled_picture) {
                    let mut pictures = Vec::new();
                    content.retain(|inline| match inline {
                        Inline::Strong { content: inner } | Inline::Emphasis { content: inner }
                            if inline.is_styled_picture() =>
                        {
                            pictures.extend(
                                inner.iter().filter(|i| matches!(i, Inline::Picture(_))).cloned(),
                            );
                            false
                        }
                        _ => true,
                    });
                    pictures.append(content);
                    *content = pictures;
                }
            }
            Node::Block(block) => {
                for row in &mut block.rows {
                    for cell in row {
                        strip_in_nodes(cell);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_picture_node(node: &Node) -> bool {
    matches!(node, Node::Picture(_)) || node.is_picture_paragraph()
}

fn position(main: &Main, pred: impl Fn(&Node) -> bool) -> Option<NodePos> {
    main.sections.iter().enumerate().find_map(|(s, section)| {
        section.nodes.iter().position(&pred).map(|n| (s, n))
    })
}

fn take(main: &mut Main, (s, n): NodePos) -> Node {
    main.sections[s].nodes.remove(n)
}

/// Take the caption following a node that was just removed from `pos`
fn take_caption(main: &mut Main, (s, n): NodePos) -> Option<Node> {
    let nodes = &mut main.sections[s].nodes;
    if nodes.get(n).is_some_and(Node::is_caption) {
        Some(nodes.remove(n))
    } else {
        None
    }
}

/// Take a single picture out of the node at `pos`, dropping a paragraph left
/// empty
fn take_picture(main: &mut Main, (s, n): NodePos) -> Option<Picture> {
    let nodes = &mut main.sections[s].nodes;
    if matches!(nodes.get(n)?, Node::Picture(_)) {
        return match nodes.remove(n) {
            Node::Picture(picture) => Some(picture),
            _ => None,
        };
    }
    let Node::Paragraph { content, .. } = nodes.get_mut(n)? else {
        return None;
    };
    let i = content.iter().position(|c| matches!(c, Inline::Picture(_)))?;
    let picture = match content.remove(i) {
        Inline::Picture(picture) => Some(picture),
        _ => None,
    };
    if content.is_empty() {
        nodes.remove(n);
    }
    picture
}

/// Hero from the first picture when it precedes the first `h1`
fn build_hero(main: &mut Main) -> bool {
    let (Some(h1), Some(picture)) = (
        position(main, |n| n.is_heading(&[1])),
        position(main, is_picture_node),
    ) else {
        return false;
    };
    if picture >= h1 {
        return false;
    }
    let heading = take(main, h1);
    let Some(picture) = take_picture(main, picture) else {
        return false;
    };
    let hero = Block::single("hero", vec![Node::Picture(picture), heading]);
    main.sections.insert(0, Section::new(vec![Node::Block(hero)]));
    true
}

fn build_article_header(
    main: &mut Main,
    meta: &ArticleHeaderMeta,
    store: Option<&TaxonomyStore>,
    path: &str,
) -> PageResult<()> {
    let h1 = position(main, |n| n.is_heading(&[1]))
        .ok_or_else(|| PageError::missing("article-header", "h1"))?;
    let picture = position(main, is_picture_node)
        .ok_or_else(|| PageError::missing("article-header", "picture"))?;

    // remove the later node first so the earlier position stays valid
    let (heading, picture_cell) = if h1 > picture {
        let heading = take(main, h1);
        (heading, take_with_caption(main, picture))
    } else {
        let picture_cell = take_with_caption(main, picture);
        (take(main, h1), picture_cell)
    };

    let category = link_for_topic(&meta.category, store, Some(path));
    let rows: Vec<Vec<Cell>> = vec![
        vec![vec![Node::paragraph(vec![Inline::Link(category.into())])]],
        vec![vec![heading]],
        vec![vec![
            Node::paragraph(vec![Inline::Link(Anchor::new(
                meta.author_url.as_str(),
                meta.author.as_str(),
            ))]),
            Node::text(meta.publication_date.as_str()),
        ]],
        vec![picture_cell],
    ];
    main.sections.insert(
        0,
        Section::new(vec![Node::Block(Block::new("article-header", rows))]),
    );
    Ok(())
}

fn take_with_caption(main: &mut Main, pos: NodePos) -> Cell {
    let mut cell = vec![take(main, pos)];
    cell.extend(take_caption(main, pos));
    cell
}

/// Tag header from the heading and picture of the first section
fn build_tag_header(main: &mut Main) -> bool {
    let Some(section) = main.sections.first_mut() else {
        return false;
    };
    let Some(picture) = section.nodes.iter().position(Node::is_picture_paragraph) else {
        return false;
    };
    let heading = section.nodes.iter().position(|n| n.is_heading(&[1, 2]));

    let mut rows = Vec::new();
    let picture_node = section.nodes.remove(picture);
    if let Some(h) = heading {
        let h = if h > picture { h - 1 } else { h };
        rows.push(vec![vec![section.nodes.remove(h)]]);
    }
    rows.push(vec![vec![picture_node]]);
    section
        .nodes
        .insert(0, Node::Block(Block::new("tag-header", rows)));
    true
}

/// Article feed of the given type, titled after the first heading
fn build_article_feed(main: &mut Main, feed_type: &str) -> PageResult<()> {
    let title = main
        .first_heading_text(&[1, 2])
        .ok_or_else(|| PageError::missing("article-feed", "heading"))?
        .trim()
        .to_string();
    let feed = Block::new(
        "article-feed",
        vec![vec![vec![Node::text(feed_type)], vec![Node::text(title)]]],
    );
    main.sections.push(Section::new(vec![Node::Block(feed)]));
    Ok(())
}

/// Author header from the heading, picture and bio of the first section
fn build_author_header(main: &mut Main) -> PageResult<()> {
    let section = main
        .sections
        .first_mut()
        .ok_or_else(|| PageError::missing("author-header", "section"))?;
    let heading = section
        .nodes
        .iter()
        .position(|n| n.is_heading(&[1, 2]))
        .ok_or_else(|| PageError::missing("author-header", "heading"))?;
    let bio = section
        .nodes
        .get(heading + 1)
        .filter(|n| n.paragraph_content().is_some() && !n.is_picture_paragraph())
        .map(|_| heading + 1);
    let picture = section.nodes.iter().position(Node::is_picture_paragraph);

    let mut indices: Vec<usize> = [Some(heading), picture, bio].into_iter().flatten().collect();
    indices.sort_unstable();
    let mut taken: Vec<(usize, Node)> = indices
        .iter()
        .rev()
        .map(|&i| (i, section.nodes.remove(i)))
        .collect();
    taken.reverse();

    let mut node_at = |i: Option<usize>| {
        let i = i?;
        let at = taken.iter().position(|(j, _)| *j == i)?;
        Some(taken.remove(at).1)
    };
    let mut rows = Vec::new();
    rows.extend(node_at(Some(heading)).map(|n| vec![vec![n]]));
    rows.extend(node_at(picture).map(|n| vec![vec![n]]));
    rows.extend(node_at(bio).map(|n| vec![vec![n]]));

    section
        .nodes
        .insert(0, Node::Block(Block::new("author-header", rows)));
    Ok(())
}

/// Social links from a `Social:` paragraph followed by a list
fn build_social_links(main: &mut Main) -> bool {
    for section in &mut main.sections {
        let found = section.nodes.iter().position(|n| {
            n.paragraph_content().is_some() && n.text_content().trim() == "Social:"
        });
        let Some(i) = found else { continue };
        let first_list = section
            .nodes
            .iter()
            .position(|n| matches!(n, Node::List { .. }));
        if first_list != Some(i + 1) {
            continue;
        }
        let list = section.nodes.remove(i + 1);
        section.nodes[i] = Node::Block(Block::single("social-links", vec![list]));
        return true;
    }
    false
}

/// Wrap loose pictures in images blocks, with their captions
///
/// Only pictures in paragraphs directly inside a section are wrapped. Returns
/// the number of blocks built.
pub fn build_image_blocks(main: &mut Main) -> usize {
    let mut built = 0;
    for section in &mut main.sections {
        let mut i = 0;
        while i < section.nodes.len() {
            if section.nodes[i].is_picture_paragraph() {
                let mut cell: Cell = match &section.nodes[i] {
                    Node::Paragraph { content, .. } => content
                        .iter()
                        .filter_map(|c| match c {
                            Inline::Picture(p) => Some(Node::Picture(p.clone())),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                if section.nodes.get(i + 1).is_some_and(Node::is_caption) {
                    cell.push(section.nodes.remove(i + 1));
                }
                section.nodes[i] = Node::Block(Block::single("images", cell));
                built += 1;
            }
            i += 1;
        }
    }
    built
}

fn build_newsletter_modal(main: &mut Main) {
    main.sections.push(Section::new(vec![Node::Block(Block::new(
        "newsletter-modal",
        vec![],
    ))]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MetaTag;
    use pretty_assertions::assert_eq;

    fn picture_p(src: &str) -> Node {
        Node::paragraph(vec![Inline::Picture(Picture::new(src, ""))])
    }

    fn caption(text: &str) -> Node {
        Node::paragraph(vec![Inline::Emphasis {
            content: vec![Inline::text(text)],
        }])
    }

    fn article_page() -> Page {
        let mut page = Page::new("/en/publish/2023/01/01/post");
        page.head.push(MetaTag::named("publication-date", "01-01-2023"));
        page.head.push(MetaTag::named("author", "Jane Doe"));
        page.head.push(MetaTag::property(ARTICLE_TAG, "Security"));
        page.head.push(MetaTag::property(ARTICLE_TAG, "Cloud"));
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "Post title"),
            picture_p("/media/hero.png"),
            caption("Photo credit"),
            Node::text("Body"),
            picture_p("/media/inline.png"),
        ])]));
        page
    }

    fn block_names(main: &Main) -> Vec<String> {
        main.sections
            .iter()
            .flat_map(|s| s.nodes.iter())
            .filter_map(|n| match n {
                Node::Block(b) => Some(b.name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn article_page_gets_header_and_images() {
        let mut page = article_page();
        let report = build_auto_blocks(&mut page, None);

        assert!(report.article_header);
        assert_eq!(report.error, None);
        assert_eq!(report.built, vec!["article-header", "images", "newsletter-modal"]);

        let main = page.main.as_ref().unwrap();
        assert_eq!(
            block_names(main),
            vec!["article-header", "images", "newsletter-modal"]
        );

        let header = main.find_block("article-header").unwrap();
        assert_eq!(header.rows.len(), 4);
        assert_eq!(header.rows[1][0][0], Node::heading(1, "Post title"));
        assert_eq!(header.rows[3][0].len(), 2);
        assert!(header.rows[3][0][1].is_caption());
    }

    #[test]
    fn article_header_links_are_deferred_before_taxonomy() {
        let mut page = article_page();
        build_auto_blocks(&mut page, None);

        let mut anchors = Vec::new();
        page.for_each_anchor_mut(|a| anchors.push(a.clone()));
        assert_eq!(anchors[0].topic_link.as_deref(), Some("Security"));
        assert_eq!(
            anchors[1],
            Anchor::new("/en/authors/jane-doe", "Jane Doe")
        );
    }

    #[test]
    fn author_url_metadata_wins() {
        let mut page = article_page();
        page.head.push(MetaTag::named("author-url", "/en/authors/jd"));
        build_auto_blocks(&mut page, None);
        let mut hrefs = Vec::new();
        page.for_each_anchor_mut(|a| hrefs.push(a.href.clone()));
        assert_eq!(hrefs[1], "/en/authors/jd");
    }

    #[test]
    fn existing_article_header_is_kept() {
        let mut page = article_page();
        page.main.as_mut().unwrap().sections[0]
            .nodes
            .push(Node::Block(Block::new("article-header", vec![])));
        let report = build_auto_blocks(&mut page, None);
        assert!(!report.article_header);
    }

    #[test]
    fn missing_picture_stops_auto_blocking() {
        let mut page = article_page();
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "No picture"),
        ])]));
        let report = build_auto_blocks(&mut page, None);
        assert!(!report.article_header);
        assert_eq!(
            report.error.as_deref(),
            Some("missing picture for article-header")
        );
        assert!(!page.main.as_ref().unwrap().has_block("newsletter-modal"));
    }

    #[test]
    fn hero_when_picture_precedes_h1() {
        let mut page = Page::new("/en/landing");
        page.main = Some(Main::new(vec![Section::new(vec![
            picture_p("/media/hero.png"),
            Node::heading(1, "Welcome"),
            Node::text("Intro"),
        ])]));
        let report = build_auto_blocks(&mut page, None);
        assert_eq!(report.built, vec!["hero", "newsletter-modal"]);

        let main = page.main.as_ref().unwrap();
        let hero = main.find_block("hero").unwrap();
        assert!(matches!(hero.rows[0][0][0], Node::Picture(_)));
        assert_eq!(main.sections[1].nodes, vec![Node::text("Intro")]);
    }

    #[test]
    fn article_with_picture_before_h1_keeps_its_header() {
        let mut page = article_page();
        page.main = Some(Main::new(vec![Section::new(vec![
            picture_p("/media/hero.png"),
            Node::heading(1, "Post title"),
            Node::text("Body"),
        ])]));
        let report = build_auto_blocks(&mut page, None);

        assert_eq!(report.error, None);
        assert!(report.article_header);
        assert_eq!(report.built, vec!["article-header", "newsletter-modal"]);

        let main = page.main.as_ref().unwrap();
        assert!(!main.has_block("hero"));
        let header = main.find_block("article-header").unwrap();
        assert_eq!(header.rows[1][0][0], Node::heading(1, "Post title"));
        assert!(header.rows[3][0][0].is_picture_paragraph());
        assert_eq!(main.sections[1].nodes, vec![Node::text("Body")]);
    }

    #[test]
    fn topic_page_gets_tag_header_and_feed() {
        let mut page = Page::new("/en/topics/cloud");
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "Cloud"),
            picture_p("/media/cloud.png"),
        ])]));
        let report = build_auto_blocks(&mut page, None);
        assert_eq!(
            report.built,
            vec!["tag-header", "article-feed", "newsletter-modal"]
        );

        let main = page.main.as_ref().unwrap();
        let feed = main.find_block("article-feed").unwrap();
        assert_eq!(
            feed.rows,
            vec![vec![vec![Node::text("tags")], vec![Node::text("Cloud")]]]
        );
        let header = main.find_block("tag-header").unwrap();
        assert_eq!(header.rows.len(), 2);
    }

    #[test]
    fn author_page_blocks() {
        let mut page = Page::new("/en/authors/jane-doe");
        page.main = Some(Main::new(vec![Section::new(vec![
            Node::heading(1, "Jane Doe"),
            Node::text("Writes about cloud."),
            picture_p("/media/jane.png"),
            Node::text("Social:"),
            Node::List {
                items: vec![vec![Inline::Link(Anchor::new("https://x.com/jd", "X"))]],
            },
        ])]));
        let report = build_auto_blocks(&mut page, None);
        assert_eq!(
            report.built,
            vec!["author-header", "social-links", "article-feed", "newsletter-modal"]
        );

        let main = page.main.as_ref().unwrap();
        let header = main.find_block("author-header").unwrap();
        assert_eq!(header.rows.len(), 3);
        assert_eq!(header.rows[0][0][0], Node::heading(1, "Jane Doe"));
        assert!(header.rows[1][0][0].is_picture_paragraph());
        assert_eq!(header.rows[2][0][0], Node::text("Writes about cloud."));

        let feed = main.find_block("article-feed").unwrap();
        assert_eq!(feed.rows[0][0], vec![Node::text("author")]);
        assert_eq!(feed.rows[0][1], vec![Node::text("Jane Doe")]);
    }

    #[test]
    fn styled_pictures_unwrapped() {
        let mut main = Main::new(vec![Section::new(vec![Node::paragraph(vec![
            Inline::text("before"),
            Inline::Strong {
                content: vec![Inline::Picture(Picture::new("/a.png", ""))],
            },
        ])])]);
        strip_picture_styling(&mut main);
        assert_eq!(
            main.sections[0].nodes[0].paragraph_content().unwrap(),
            &[Inline::Picture(Picture::new("/a.png", "")), Inline::text("before")]
        );
    }

    #[test]
    fn images_block_groups_pictures_of_one_paragraph() {
        let mut main = Main::new(vec![Section::new(vec![
            Node::paragraph(vec![
                Inline::Picture(Picture::new("/a.png", "")),
                Inline::Picture(Picture::new("/b.png", "")),
            ]),
            caption("Both"),
        ])]);
        assert_eq!(build_image_blocks(&mut main), 1);
        let block = main.find_block("images").unwrap();
        assert_eq!(block.rows[0][0].len(), 3);
        assert_eq!(main.sections[0].nodes.len(), 1);
    }
}
