//! Article cards
//!
//! A card links to an article and shows its picture, category, title,
//! description and date. The card type prefixes every class, so the same
//! builder serves article feeds (`article-card`) and featured articles
//! (`featured-article-card`).

use crate::date::format_card_date;
use blog_core::escape_html;
use blog_taxonomy::{clean_path, link_for_topic, Article, TaxonomyStore, TopicLink};
use serde::Serialize;

/// Card ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCard {
    /// Card type, the class prefix
    pub card_type: String,
    /// Article path without extension
    pub href: String,
    /// Card image URL
    pub image: String,
    /// Alt text of the card image
    pub image_alt: String,
    /// Link to the article's category
    pub category: TopicLink,
    /// Article title
    pub title: String,
    /// Teaser text
    pub description: String,
    /// Date formatted for the page's date locale
    pub date: String,
}

impl ArticleCard {
    /// Class of an element of this card, e.g. `article-card-body`
    #[must_use]
    pub fn class(&self, part: &str) -> String {
        if part.is_empty() {
            format!("{}-card", self.card_type)
        } else {
            format!("{}-card-{}", self.card_type, part)
        }
    }

    /// Render as HTML
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<a class="{card}" href="{href}">"#,
                r#"<div class="{image_class}"><picture><img src="{image}" alt="{alt}" loading="lazy"></picture></div>"#,
                r#"<div class="{body}">"#,
                r#"<p class="{category_class}">{category}</p>"#,
                "<h3>{title}</h3>",
                r#"<p class="{description_class}">{description}</p>"#,
                r#"<p class="{date_class}">{date}</p>"#,
                "</div></a>"
            ),
            card = self.class(""),
            href = escape_html(&self.href),
            image_class = self.class("image"),
            image = escape_html(&self.image),
            alt = escape_html(&self.image_alt),
            body = self.class("body"),
            category_class = self.class("category"),
            category = self.category.to_html(),
            title = escape_html(&self.title),
            description_class = self.class("description"),
            description = escape_html(&self.description),
            date_class = self.class("date"),
            date = escape_html(&self.date),
        )
    }
}

/// Build the card of an article
///
/// Loads the article's taxonomy if needed; the category link is deferred
/// while the store is not loaded.
pub fn build_article_card(
    article: &mut Article,
    card_type: &str,
    store: Option<&TaxonomyStore>,
    date_locale: &str,
) -> ArticleCard {
    let href = clean_path(&article.path).to_string();
    let category = article.taxonomy(store).category.clone();
    ArticleCard {
        card_type: card_type.to_string(),
        category: link_for_topic(&category, store, Some(&href)),
        href,
        image: article.image.clone(),
        image_alt: article
            .image_alt
            .clone()
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| article.title.clone()),
        title: article.title.clone(),
        description: article.description.clone(),
        date: format_card_date(&article.date, date_locale),
    }
}
