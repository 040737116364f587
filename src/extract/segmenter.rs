//! Splitting raw document text into articles.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use tracing::instrument;

use crate::{
    domain::{Article, ArticleId},
    extract::citation::{CitationExtractor, ID_PATTERN},
    source::Page,
};

static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:LOI|ARTICLE)\s+({ID_PATTERN})")).expect("static regex is valid")
});

/// The articles found in one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Articles in order of first appearance.
    pub articles: Vec<Article>,
    /// Boundary lines whose identifier could not be normalized. The lines
    /// following them, up to the next boundary, are discarded.
    pub malformed: Vec<String>,
    /// Identifiers that opened more than one segment. The last segment with a
    /// given identifier replaces the earlier ones.
    pub duplicates: Vec<ArticleId>,
}

/// Partitions document text into [`Article`]s.
///
/// A line containing "LOI" or "ARTICLE" (any case) followed by an identifier
/// opens a new article; only the first such mention on a line counts. Every
/// following line belongs to that article until the next boundary or the end
/// of input. Lines before the first boundary are discarded.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    extractor: &'a CitationExtractor,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter that uses `extractor` to collect each article's
    /// citations when the article is closed.
    #[must_use]
    pub const fn new(extractor: &'a CitationExtractor) -> Self {
        Self { extractor }
    }

    /// Returns the identifier text of the first boundary on the line, if any.
    #[must_use]
    pub fn boundary(line: &str) -> Option<&str> {
        BOUNDARY
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }

    /// Segment the pages of a document.
    ///
    /// Pages are concatenated with a line break after each page; page
    /// boundaries are not otherwise marked.
    #[must_use]
    pub fn segment_pages(&self, pages: &[Page], source_document: &str) -> Segmentation {
        let text: String = pages
            .iter()
            .flat_map(|page| [page.text.as_str(), "\n"])
            .collect();
        self.segment(text.split('\n'), source_document)
    }

    /// Segment a sequence of lines.
    #[instrument(level = "debug", skip(self, lines))]
    pub fn segment<'l>(
        &self,
        lines: impl IntoIterator<Item = &'l str>,
        source_document: &str,
    ) -> Segmentation {
        let mut segmentation = Segmentation::default();
        let mut positions: HashMap<ArticleId, usize> = HashMap::new();

        // `None` while no article is open, including after a malformed boundary.
        let mut current: Option<ArticleId> = None;
        let mut current_lines: Vec<String> = Vec::new();

        for line in lines {
            let Some(raw_id) = Self::boundary(line) else {
                if current.is_some() {
                    current_lines.push(line.to_string());
                }
                continue;
            };

            if let Some(id) = current.take() {
                let article = self.close(id, &current_lines, source_document);
                record(&mut segmentation, &mut positions, article);
            }

            match ArticleId::try_from(raw_id) {
                Ok(id) => {
                    current = Some(id);
                    current_lines = vec![line.to_string()];
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed article boundary {line:?}: {e}");
                    segmentation.malformed.push(line.to_string());
                    current_lines.clear();
                }
            }
        }

        if let Some(id) = current {
            let article = self.close(id, &current_lines, source_document);
            record(&mut segmentation, &mut positions, article);
        }

        tracing::info!(
            "Extracted {} articles from {}",
            segmentation.articles.len(),
            source_document
        );

        segmentation
    }

    fn close(&self, id: ArticleId, lines: &[String], source_document: &str) -> Article {
        let mut article = Article::new(id, lines, source_document);
        let cited = self.extractor.cite(article.content(), article.id());
        tracing::debug!("Closed article {} citing {:?}", article.id(), cited);
        article.set_outgoing_refs(cited);
        article
    }
}

fn record(
    segmentation: &mut Segmentation,
    positions: &mut HashMap<ArticleId, usize>,
    article: Article,
) {
    if let Some(&position) = positions.get(article.id()) {
        tracing::debug!("Article {} appears more than once", article.id());
        segmentation.duplicates.push(article.id().clone());
        segmentation.articles[position] = article;
    } else {
        positions.insert(article.id().clone(), segmentation.articles.len());
        segmentation.articles.push(article);
    }
}
