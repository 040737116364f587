//! Text processing: splitting documents into articles and finding the
//! citations between them.

/// Title-based grouping of articles.
pub mod category;
/// Multi-pattern citation detection.
pub mod citation;
mod segmenter;

pub use category::{categorize, Category};
pub use citation::{CitationExtractor, CitationPattern};
pub use segmenter::{Segmentation, Segmenter};
