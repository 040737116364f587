//! Grouping articles by the heading text of their title.
//!
//! This grouping is purely presentational and has no effect on the citation
//! graph.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::domain::{Article, ArticleId};

/// Category of articles whose title carries no heading.
pub const CATCH_ALL: &str = "Autres";

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)LOI\s+\d+\s+-\s+(.*?)(?:\.{2,}|\s{2,}|$)").expect("static regex is valid")
});

/// A named group of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// The heading text shared by the articles.
    pub name: String,
    /// The articles in the category, in first-seen order.
    pub articles: Vec<ArticleId>,
}

/// The heading of a title such as `"LOI 12 - Enchères ....... 23"`.
///
/// Dot leaders and runs of whitespace end the heading.
#[must_use]
pub fn category_of(title: &str) -> Option<&str> {
    HEADING
        .captures(title)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
}

/// Group articles by title heading.
///
/// Categories appear in the order their first article appears. Articles
/// without a heading go to the [`CATCH_ALL`] category.
pub fn categorize<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let name = category_of(article.title()).unwrap_or(CATCH_ALL);
        let position = *positions.entry(name.to_string()).or_insert_with(|| {
            categories.push(Category {
                name: name.to_string(),
                articles: Vec::new(),
            });
            categories.len() - 1
        });
        categories[position].articles.push(article.id().clone());
    }

    categories
}
