//! Highlight section
//!
//! Pages with the `fact-box` body class announce new posts in a section put
//! at the start of `main`, one alert per `h1` carrying the `:new:` icon.

use crate::document::{Inline, Main, Node, Page, Section};

/// Body class enabling the highlight section
pub const FACT_BOX_CLASS: &str = "fact-box";

/// Icon marking a heading as new
const NEW_ICON: &str = ":new:";

/// Build the highlight section of a `fact-box` page
///
/// Returns the number of alerts it holds, or `None` when the page has no
/// `fact-box` class or no `main`.
pub fn build_highlight_section(page: &mut Page) -> Option<usize> {
    if !page.has_body_class(FACT_BOX_CLASS) {
        return None;
    }
    let main = page.main.as_mut()?;

    let alerts: Vec<String> = new_headings(main).iter().map(|h| alert(h)).collect();
    let mut section = Section::new(vec![Node::Paragraph {
        classes: vec!["highlight-content".to_string()],
        content: alerts.iter().map(Inline::text).collect(),
    }]);
    section
        .attributes
        .insert("id".to_string(), "highlight".to_string());
    if !alerts.is_empty() {
        section.add_class("animate-entry");
    }
    main.sections.insert(0, section);
    Some(alerts.len())
}

fn alert(heading: &str) -> String {
    format!(
        "\u{1F50A} New Post Alert! \u{1F680} Check out the latest addition in the \"{heading}\" \
         section this week. Dive into valuable insights now!"
    )
}

/// Text of every `h1` marked new, icon removed, in document order
fn new_headings(main: &Main) -> Vec<String> {
    let mut found = Vec::new();
    for section in &main.sections {
        collect_new_headings(&section.nodes, &mut found);
    }
    found
}

fn collect_new_headings(nodes: &[Node], found: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Heading { level: 1, text } if text.contains(NEW_ICON) => {
                found.push(text.replace(NEW_ICON, "").trim().to_string());
            }
            Node::Block(block) => {
                for cell in block.cells() {
                    collect_new_headings(cell, found);
                }
            }
            _ => {}
        }
    }
}
