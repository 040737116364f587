use std::collections::BTreeSet;

use crate::domain::ArticleId;

/// A segmented unit of a rulebook.
///
/// Articles are created by the segmenter once their closing boundary has been
/// reached, so an `Article` is never partially constructed. The set of
/// articles citing this one is not stored here; it is derived from the
/// [`ReferenceGraph`](crate::ReferenceGraph) on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub(crate) id: ArticleId,
    /// The line that opened the segment, verbatim.
    pub(crate) title: String,
    /// All lines of the segment joined with `\n`, title included.
    pub(crate) content: String,
    /// Name of the document the article was extracted from.
    pub(crate) source_document: String,
    /// Identifiers cited by the content. May include identifiers that are not
    /// part of the corpus; those never become graph edges.
    pub(crate) outgoing_refs: BTreeSet<ArticleId>,
}

impl Article {
    /// Construct an article from its segment lines.
    ///
    /// The title is the first line, or empty if there are none.
    #[must_use]
    pub fn new(id: ArticleId, lines: &[String], source_document: impl Into<String>) -> Self {
        Self {
            id,
            title: lines.first().cloned().unwrap_or_default(),
            content: lines.join("\n"),
            source_document: source_document.into(),
            outgoing_refs: BTreeSet::new(),
        }
    }

    /// The normalized identifier of the article.
    #[must_use]
    pub const fn id(&self) -> &ArticleId {
        &self.id
    }

    /// The opening line of the article.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The full text of the article.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The document the article came from.
    #[must_use]
    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    /// The identifiers this article cites, resolved or not.
    #[must_use]
    pub const fn outgoing_refs(&self) -> &BTreeSet<ArticleId> {
        &self.outgoing_refs
    }

    /// Replace the set of cited identifiers.
    pub fn set_outgoing_refs(&mut self, refs: BTreeSet<ArticleId>) {
        self.outgoing_refs = refs;
    }

    /// Number of whitespace-separated words in the content.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn title_is_first_line() {
        let id = ArticleId::try_from("12").unwrap();
        let article = Article::new(id, &lines("LOI 12 - Titre\nCorps du texte"), "code.txt");

        assert_eq!(article.title(), "LOI 12 - Titre");
        assert_eq!(article.content(), "LOI 12 - Titre\nCorps du texte");
        assert_eq!(article.source_document(), "code.txt");
        assert!(article.outgoing_refs().is_empty());
    }

    #[test]
    fn empty_segment_has_empty_title() {
        let id = ArticleId::try_from("1").unwrap();
        let article = Article::new(id, &[], "code.txt");
        assert_eq!(article.title(), "");
        assert_eq!(article.content(), "");
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        let id = ArticleId::try_from("3").unwrap();
        let article = Article::new(id, &lines("LOI 3\n  deux   mots "), "code.txt");
        assert_eq!(article.word_count(), 4);
    }
}
