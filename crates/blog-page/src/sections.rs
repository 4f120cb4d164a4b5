//! Section and block decoration
//!
//! Some blocks must sit alone in their section so they can be laid out and
//! loaded independently. After splitting, empty sections are dropped and the
//! remaining sections and blocks are marked ready for loading.

use crate::document::{Block, LoadStatus, Main, Node, Section};
use blog_core::to_class_name;

/// Blocks that get a section of their own
pub const SPLIT_BLOCKS: [&str; 5] = [
    "article-header",
    "article-feed",
    "recommended-articles",
    "video",
    "carousel",
];

/// Block that configures its section rather than rendering
pub const SECTION_METADATA: &str = "section-metadata";

/// Move every split block into its own section
///
/// Content before the block stays in the original section (which keeps its
/// classes); content after it moves to a new section following the block.
pub fn split_sections(main: &mut Main) {
    let sections = std::mem::take(&mut main.sections);
    for section in sections {
        let Section {
            classes,
            attributes,
            status,
            nodes,
        } = section;
        let mut before = Section {
            classes,
            attributes,
            status,
            nodes: Vec::new(),
        };
        let mut current: Option<Section> = None;

        for node in nodes {
            let splits = matches!(&node, Node::Block(b) if SPLIT_BLOCKS.contains(&b.name.as_str()));
            if splits {
                if let Some(after) = current.take() {
                    main.sections.push(after);
                } else {
                    main.sections.push(std::mem::take(&mut before));
                }
                main.sections.push(Section::new(vec![node]));
                current = Some(Section::default());
            } else {
                match current.as_mut() {
                    Some(after) => after.nodes.push(node),
                    None => before.nodes.push(node),
                }
            }
        }
        match current {
            Some(after) => main.sections.push(after),
            None => main.sections.push(before),
        }
    }
    remove_empty_sections(main);
}

/// Drop sections without content
pub fn remove_empty_sections(main: &mut Main) {
    main.sections.retain(|s| !s.is_empty());
}

/// Mark sections for loading and apply section metadata
///
/// Each section gets the `section` class and a `{block}-container` class per
/// block it holds. A `section-metadata` block is consumed: its `style` row
/// becomes classes, other rows become `data-*` attributes.
pub fn decorate_sections(main: &mut Main) {
    for section in &mut main.sections {
        section.add_class("section");

        let names: Vec<String> = section
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Block(b) if b.name != SECTION_METADATA => Some(b.name.clone()),
                _ => None,
            })
            .collect();
        for name in names {
            section.add_class(&format!("{name}-container"));
        }

        let mut metadata = Vec::new();
        section.nodes.retain(|n| match n {
            Node::Block(b) if b.name == SECTION_METADATA => {
                metadata.push(b.clone());
                false
            }
            _ => true,
        });
        for block in &metadata {
            apply_section_metadata(section, block);
        }

        section.status = Some(LoadStatus::Initialized);
    }
}

fn apply_section_metadata(section: &mut Section, block: &Block) {
    for row in &block.rows {
        let (Some(key), Some(value)) = (row.first(), row.get(1)) else {
            continue;
        };
        let key = to_class_name(&cell_text(key));
        let value = cell_text(value);
        if key == "style" {
            for style in value.split(',').map(to_class_name).filter(|s| !s.is_empty()) {
                section.add_class(&style);
            }
        } else if !key.is_empty() {
            section.attributes.insert(format!("data-{key}"), value);
        }
    }
}

fn cell_text(cell: &[Node]) -> String {
    cell.iter()
        .map(Node::text_content)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Normalise block names and mark all blocks, nested ones included, for loading
pub fn decorate_blocks(main: &mut Main) {
    for section in &mut main.sections {
        for node in &mut section.nodes {
            if let Node::Block(block) = node {
                decorate_block(block);
            }
        }
    }
}

/// Normalise one block's name and mark it, and its nested blocks, for loading
pub fn decorate_block(block: &mut Block) {
    let name = to_class_name(&block.name);
    if name != block.name {
        block.name = name;
    }
    if block.status == LoadStatus::Authored {
        block.status = LoadStatus::Initialized;
    }
    for row in &mut block.rows {
        for cell in row {
            for node in cell {
                if let Node::Block(nested) = node {
                    decorate_block(nested);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(name: &str) -> Node {
        Node::Block(Block::new(name, vec![]))
    }

    fn names(main: &Main) -> Vec<Vec<String>> {
        main.sections
            .iter()
            .map(|s| {
                s.nodes
                    .iter()
                    .map(|n| match n {
                        Node::Block(b) => b.name.clone(),
                        other => other.text_content(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn split_around_article_header() {
        let mut main = Main::new(vec![Section::new(vec![
            Node::text("intro"),
            block("article-header"),
            Node::text("body"),
            block("cards"),
        ])]);
        split_sections(&mut main);
        assert_eq!(
            names(&main),
            vec![
                vec!["intro".to_string()],
                vec!["article-header".to_string()],
                vec!["body".to_string(), "cards".to_string()],
            ]
        );
    }

    #[test]
    fn split_leading_block_drops_empty_section() {
        let mut main = Main::new(vec![Section::new(vec![
            block("article-feed"),
            block("video"),
        ])]);
        split_sections(&mut main);
        assert_eq!(
            names(&main),
            vec![vec!["article-feed".to_string()], vec!["video".to_string()]]
        );
    }

    #[test]
    fn untouched_sections_keep_classes() {
        let mut section = Section::new(vec![Node::text("a")]);
        section.add_class("highlight");
        let mut main = Main::new(vec![section, Section::default()]);
        split_sections(&mut main);
        assert_eq!(main.sections.len(), 1);
        assert!(main.sections[0].has_class("highlight"));
    }

    #[test]
    fn decorate_sections_applies_metadata() {
        let metadata = Block::new(
            SECTION_METADATA,
            vec![
                vec![vec![Node::text("Style")], vec![Node::text("Dark, Wide Content")]],
                vec![vec![Node::text("Background")], vec![Node::text("blue")]],
            ],
        );
        let mut main = Main::new(vec![Section::new(vec![
            Node::text("a"),
            block("cards"),
            Node::Block(metadata),
        ])]);
        decorate_sections(&mut main);

        let section = &main.sections[0];
        assert_eq!(
            section.classes,
            vec!["section", "cards-container", "dark", "wide-content"]
        );
        assert_eq!(section.attributes.get("data-background").map(String::as_str), Some("blue"));
        assert_eq!(section.nodes.len(), 2);
        assert_eq!(section.status, Some(LoadStatus::Initialized));
    }

    #[test]
    fn decorate_blocks_recurses() {
        let mut main = Main::new(vec![Section::new(vec![Node::Block(Block::single(
            "Columns",
            vec![block("video")],
        ))])]);
        decorate_blocks(&mut main);
        let Node::Block(outer) = &main.sections[0].nodes[0] else {
            panic!("expected block");
        };
        assert_eq!(outer.name, "columns");
        assert_eq!(outer.status, LoadStatus::Initialized);
        let Node::Block(inner) = &outer.rows[0][0][0] else {
            panic!("expected nested block");
        };
        assert_eq!(inner.status, LoadStatus::Initialized);
    }
}
