//! Domain models for the citation corpus.
//!
//! This module contains the core domain types: normalized article identifiers,
//! articles, the reference graph, and configuration.

/// Article records.
pub mod article;
pub use article::Article;

/// Normalized article identifier types and parsing.
pub mod article_id;
pub use article_id::{ArticleId, Error as ArticleIdError};

mod article_view;
pub use article_view::ArticleView;

mod config;
pub use config::Config;

/// The bidirectional citation graph.
pub mod graph;
pub use graph::ReferenceGraph;
