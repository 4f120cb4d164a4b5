//! Eager decoration of `main`

use crate::auto_blocks::{build_auto_blocks, AutoBlockReport};
use crate::document::Page;
use crate::sections::{decorate_blocks, decorate_sections, remove_empty_sections, split_sections};
use blog_taxonomy::TaxonomyStore;

/// Decorate the page's main content
///
/// Auto blocks first, then section split, empty section removal and
/// section/block decoration.
pub fn decorate_main(page: &mut Page, store: Option<&TaxonomyStore>) -> AutoBlockReport {
    let report = build_auto_blocks(page, store);
    if let Some(main) = page.main.as_mut() {
        split_sections(main);
        remove_empty_sections(main);
        decorate_sections(main);
        decorate_blocks(main);
    }
    report
}
