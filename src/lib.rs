//! Citation graphs for numbered rulebooks
//!
//! A rulebook is a long document split into numbered articles ("LOI 12",
//! "Article 40A") that refer to one another. This crate splits document text
//! into articles, detects the citations between them, and analyzes the
//! resulting directed graph.
//!
//! ```
//! use rulebook::{analyze, CitationExtractor, Config, ReferenceGraph, Segmenter};
//!
//! let text = "LOI 1 - Début\ncf. 2\nLOI 2 - Suite\ncf. 1";
//! let extractor = CitationExtractor::default();
//! let segmentation = Segmenter::new(&extractor).segment(text.lines(), "code.txt");
//! let graph = ReferenceGraph::from_articles(segmentation.articles);
//!
//! let report = analyze(&graph, &Config::default());
//! assert_eq!(report.circular_references.unwrap().len(), 1);
//! ```

pub mod domain;
pub use domain::{Article, ArticleId, ArticleView, Config, ReferenceGraph};

pub mod extract;
pub use extract::{categorize, CitationExtractor, CitationPattern, Segmentation, Segmenter};

pub mod source;
pub use source::{PageSource, PlainTextSource, SourceError};

pub mod analytics;
pub use analytics::{analyze, AnalyticsError, AnalyticsReport};

pub mod corpus;
pub use corpus::{Corpus, CorpusError, Diagnostics};
