// ArticleView - a borrowed view of an article for serialization.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::ArticleId;

/// A borrowed view of an article, suitable for serialization.
///
/// The text fields borrow from the [`ReferenceGraph`](crate::ReferenceGraph)
/// storage. The citation sets are read from the graph on demand, so they own
/// their data: `outgoing_refs` and `incoming_refs` hold only articles of the
/// corpus, and cited identifiers that match no article are kept apart in
/// `unresolved_refs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleView<'a> {
    /// The article's identifier.
    pub id: &'a ArticleId,
    /// The opening line of the article.
    pub title: &'a str,
    /// The full article text.
    pub content: &'a str,
    /// The document the article came from.
    pub source_document: &'a str,
    /// Number of whitespace-separated words in the content.
    pub word_count: usize,
    /// Articles of the corpus cited by this one.
    pub outgoing_refs: BTreeSet<ArticleId>,
    /// Articles of the corpus that cite this one.
    pub incoming_refs: BTreeSet<ArticleId>,
    /// Cited identifiers with no matching article, such as scores or years
    /// picked up by the bare-number pattern.
    pub unresolved_refs: BTreeSet<ArticleId>,
}
