//! Building a [`ReferenceGraph`] from a batch of documents.
//!
//! Documents are read and segmented in parallel, then merged in input order,
//! so the result does not depend on scheduling. Problems with individual
//! documents are collected in [`Diagnostics`] and never abort the batch.

use std::path::{Path, PathBuf};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::instrument;

use crate::{
    analytics::{self, AnalyticsReport},
    domain::{ArticleId, Config},
    extract::{CitationExtractor, Segmentation, Segmenter},
    source::{collect_documents, PageSource, SourceError},
    ReferenceGraph,
};

/// Errors that prevent a corpus from being built at all.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// No input documents were given or found.
    #[error("no input documents")]
    NoDocuments,

    /// The page source cannot read any document.
    #[error(transparent)]
    Source(SourceError),
}

/// What was read from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// The document path.
    pub path: PathBuf,
    /// Number of pages read.
    pub pages: usize,
    /// Number of distinct articles found.
    pub articles: usize,
}

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// The document path.
    pub path: PathBuf,
    /// Why it could not be read.
    pub reason: String,
}

/// Everything that went wrong, or was merely notable, while building a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Documents that were read, in input order.
    pub documents: Vec<DocumentReport>,
    /// Documents that could not be read.
    pub failures: Vec<DocumentFailure>,
    /// Boundary lines whose identifier could not be normalized.
    pub malformed_boundaries: Vec<String>,
    /// Identifiers seen more than once, within or across documents.
    pub duplicate_articles: Vec<ArticleId>,
    /// Citations of identifiers that are not in the corpus.
    pub unresolved_citations: usize,
}

impl Diagnostics {
    /// Whether nothing went wrong.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self.malformed_boundaries.is_empty()
            && self.duplicate_articles.is_empty()
    }
}

/// A built citation graph and the diagnostics of building it.
#[derive(Debug, Clone)]
pub struct Corpus {
    graph: ReferenceGraph,
    diagnostics: Diagnostics,
}

impl Corpus {
    /// Read every document found under `paths` and build the citation graph.
    ///
    /// # Errors
    ///
    /// Fails if no documents are found, or if the page source reports itself
    /// misconfigured.
    pub fn load<S: PageSource>(
        paths: &[PathBuf],
        source: &S,
        extractor: &CitationExtractor,
        config: &Config,
    ) -> Result<Self, CorpusError> {
        let documents = collect_documents(paths, config);
        Self::build(&documents, source, extractor)
    }

    /// Build the citation graph from a list of documents.
    ///
    /// When several articles share an identifier, the last one read wins and
    /// keeps the position of the first.
    ///
    /// # Errors
    ///
    /// Fails if `documents` is empty, or if the page source reports itself
    /// misconfigured.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn build<S: PageSource>(
        documents: &[PathBuf],
        source: &S,
        extractor: &CitationExtractor,
    ) -> Result<Self, CorpusError> {
        if documents.is_empty() {
            return Err(CorpusError::NoDocuments);
        }

        let segmenter = Segmenter::new(extractor);
        let results: Vec<(&PathBuf, Result<(usize, Segmentation), SourceError>)> = documents
            .par_iter()
            .map(|path| {
                let result = source.page_text(path).map(|pages| {
                    let segmentation = segmenter.segment_pages(&pages, &document_name(path));
                    (pages.len(), segmentation)
                });
                (path, result)
            })
            .collect();

        let mut graph = ReferenceGraph::default();
        let mut diagnostics = Diagnostics::default();

        for (path, result) in results {
            match result {
                Ok((pages, segmentation)) => {
                    diagnostics.documents.push(DocumentReport {
                        path: path.clone(),
                        pages,
                        articles: segmentation.articles.len(),
                    });
                    diagnostics
                        .malformed_boundaries
                        .extend(segmentation.malformed);
                    diagnostics
                        .duplicate_articles
                        .extend(segmentation.duplicates);

                    for article in segmentation.articles {
                        let id = article.id().clone();
                        if graph.insert(article).is_some() {
                            tracing::warn!("Article {id} redefined by {}", path.display());
                            diagnostics.duplicate_articles.push(id);
                        }
                    }
                }
                Err(e) if e.is_fatal() => return Err(CorpusError::Source(e)),
                Err(e) => {
                    tracing::warn!("Skipping document: {e}");
                    diagnostics.failures.push(DocumentFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        graph.rebuild();
        diagnostics.unresolved_citations = graph.unresolved_count();

        tracing::info!(
            "Corpus built from {} documents ({} failed)",
            diagnostics.documents.len(),
            diagnostics.failures.len()
        );

        Ok(Self { graph, diagnostics })
    }

    /// The citation graph.
    #[must_use]
    pub const fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    /// The diagnostics of the build.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Compute the analytics report over the graph.
    #[must_use]
    pub fn analyze(&self, config: &Config) -> AnalyticsReport {
        analytics::analyze(&self.graph, config)
    }

    /// Split into the graph and the diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (ReferenceGraph, Diagnostics) {
        (self.graph, self.diagnostics)
    }
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs, io};

    use super::*;
    use crate::source::{Page, PlainTextSource};

    /// Serves pages from memory.
    #[derive(Default)]
    struct FakeSource {
        documents: HashMap<PathBuf, Vec<&'static str>>,
        misconfigured: bool,
    }

    impl FakeSource {
        fn with(mut self, path: &str, pages: &[&'static str]) -> Self {
            self.documents.insert(PathBuf::from(path), pages.to_vec());
            self
        }
    }

    impl PageSource for FakeSource {
        fn page_text(&self, path: &Path) -> Result<Vec<Page>, SourceError> {
            if self.misconfigured {
                return Err(SourceError::Misconfigured("no backend".to_string()));
            }
            self.documents
                .get(path)
                .map(|pages| {
                    pages
                        .iter()
                        .enumerate()
                        .map(|(i, text)| Page::new(i + 1, *text))
                        .collect()
                })
                .ok_or_else(|| SourceError::Unavailable {
                    path: path.to_path_buf(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                })
        }
    }

    fn paths(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    fn id(s: &str) -> ArticleId {
        ArticleId::try_from(s).unwrap()
    }

    #[test]
    fn mutual_citation_across_pages() {
        let source = FakeSource::default().with(
            "code.pdf",
            &["LOI 1 - Début\nvoir 2", "LOI 2 - Fin\ncf. 1"],
        );

        let corpus = Corpus::build(
            &paths(&["code.pdf"]),
            &source,
            &CitationExtractor::default(),
        )
        .unwrap();

        let graph = corpus.graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.incoming_refs(&id("1")), [id("2")].into());
        assert_eq!(graph.incoming_refs(&id("2")), [id("1")].into());
        assert_eq!(graph.article(&id("1")).unwrap().source_document, "code.pdf");
        assert!(corpus.diagnostics().is_clean());
    }

    #[test]
    fn unreadable_document_is_recorded_and_skipped() {
        let source = FakeSource::default().with("a.pdf", &["LOI 1\ncf. 7"]);

        let corpus = Corpus::build(
            &paths(&["a.pdf", "missing.pdf"]),
            &source,
            &CitationExtractor::default(),
        )
        .unwrap();

        let diagnostics = corpus.diagnostics();
        assert_eq!(corpus.graph().node_count(), 1);
        assert_eq!(diagnostics.documents.len(), 1);
        assert_eq!(diagnostics.failures.len(), 1);
        assert_eq!(diagnostics.failures[0].path, PathBuf::from("missing.pdf"));
        assert_eq!(diagnostics.unresolved_citations, 1);
    }

    #[test]
    fn later_documents_redefine_articles() {
        let source = FakeSource::default()
            .with("a.pdf", &["LOI 1\nancien\nLOI 2"])
            .with("b.pdf", &["LOI 1\nnouveau"]);

        let corpus = Corpus::build(
            &paths(&["a.pdf", "b.pdf"]),
            &source,
            &CitationExtractor::default(),
        )
        .unwrap();

        let graph = corpus.graph();
        let ids: Vec<_> = graph.ids().map(ArticleId::as_str).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(graph.get(&id("1")).unwrap().content(), "LOI 1\nnouveau\n");
        assert_eq!(graph.get(&id("1")).unwrap().source_document(), "b.pdf");
        assert_eq!(corpus.diagnostics().duplicate_articles, vec![id("1")]);
    }

    #[test]
    fn all_documents_unreadable_yields_an_empty_corpus() {
        let corpus = Corpus::build(
            &paths(&["a.pdf", "b.pdf"]),
            &FakeSource::default(),
            &CitationExtractor::default(),
        )
        .unwrap();

        assert!(corpus.graph().is_empty());
        assert!(corpus.diagnostics().documents.is_empty());
        assert_eq!(corpus.diagnostics().failures.len(), 2);

        let report = corpus.analyze(&Config::default());
        assert_eq!(report.article_count, 0);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn no_documents_is_fatal() {
        let error = Corpus::build(&[], &FakeSource::default(), &CitationExtractor::default())
            .unwrap_err();
        assert!(matches!(error, CorpusError::NoDocuments));
    }

    #[test]
    fn misconfigured_source_is_fatal() {
        let source = FakeSource {
            misconfigured: true,
            ..FakeSource::default()
        };

        let error = Corpus::build(&paths(&["a.pdf"]), &source, &CitationExtractor::default())
            .unwrap_err();

        assert!(matches!(error, CorpusError::Source(SourceError::Misconfigured(_))));
    }

    #[test]
    fn load_walks_a_directory_of_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "LOI 1 - Un\nvoir 2\u{c}").unwrap();
        fs::write(dir.path().join("b.txt"), "LOI 2 - Deux\nrien\u{c}").unwrap();

        let config = Config::default();
        let corpus = Corpus::load(
            &[dir.path().to_path_buf()],
            &PlainTextSource::from_config(&config),
            &CitationExtractor::default(),
            &config,
        )
        .unwrap();

        assert_eq!(corpus.graph().edges(), vec![(id("1"), id("2"))]);

        let report = corpus.analyze(&config);
        assert_eq!(report.article_count, 2);
        assert_eq!(report.most_referenced[0], (id("2"), 1));
    }
}
