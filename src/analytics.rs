//! Graph analytics over a [`ReferenceGraph`].
//!
//! Every metric is computed independently from the same immutable graph. The
//! expensive ones ([`centrality`], [`chains`], [`cycles`]) are bounded by the
//! limits in [`Config`]. Centrality and cycles return
//! [`AnalyticsError::Degenerate`] past their limit; the chain search keeps
//! the longest chains found before its budget ran out.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{ArticleId, Config},
    ReferenceGraph,
};

/// Betweenness centrality.
pub mod centrality;
/// Long citation chains.
pub mod chains;
/// Simple citation cycles.
pub mod cycles;
/// Degree rankings and isolated articles.
pub mod degree;

/// The metrics that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Betweenness centrality.
    Centrality,
    /// Long citation chains.
    Chains,
    /// Simple cycles.
    Cycles,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Centrality => "centrality",
            Self::Chains => "reference chains",
            Self::Cycles => "circular references",
        })
    }
}

/// Errors produced while computing a metric.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The metric cannot be computed within the configured bounds, or its
    /// result would be meaningless.
    #[error("{metric} skipped: {reason}")]
    Degenerate {
        /// The metric that was skipped.
        metric: Metric,
        /// Human-readable explanation.
        reason: String,
    },

    /// The metric is switched off in the configuration.
    #[error("{0} disabled by configuration")]
    Disabled(Metric),
}

impl AnalyticsError {
    pub(crate) fn degenerate(metric: Metric, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            metric,
            reason: reason.into(),
        }
    }
}

/// The result of analyzing a corpus.
///
/// Metrics that could not be computed are `None`, and the reason is listed in
/// `failures`. Chains cut short by their search budget are kept, with a note
/// in `failures`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Number of articles.
    pub article_count: usize,
    /// Number of resolved citations.
    pub reference_count: usize,
    /// Most cited articles with their in-degree.
    pub most_referenced: Vec<(ArticleId, usize)>,
    /// Most citing articles with their out-degree.
    pub most_referencing: Vec<(ArticleId, usize)>,
    /// Most central articles with their normalized betweenness.
    pub central_articles: Option<Vec<(ArticleId, f64)>>,
    /// Articles with no citations in either direction.
    pub isolated_articles: Vec<ArticleId>,
    /// The longest citation chains, longest first.
    pub reference_chains: Option<Vec<Vec<ArticleId>>>,
    /// Every simple citation cycle.
    pub circular_references: Option<Vec<Vec<ArticleId>>>,
    /// Why metrics are missing or incomplete.
    pub failures: Vec<String>,
}

/// Compute every metric of the report.
///
/// A failing metric never prevents the others from being computed.
#[instrument(skip_all, fields(articles = graph.node_count(), citations = graph.edge_count()))]
#[must_use]
pub fn analyze(graph: &ReferenceGraph, config: &Config) -> AnalyticsReport {
    let mut failures = Vec::new();
    let top_k = config.top_k();

    let central_articles = settle(
        &mut failures,
        centrality::most_central(graph, top_k, config.max_centrality_nodes()),
    );
    let reference_chains =
        settle(&mut failures, chains::longest_chains(graph, config)).map(|found| {
            if !found.is_exhaustive() {
                let note = format!(
                    "{} sampled: search from {} articles stopped after {} partial paths",
                    Metric::Chains,
                    found.truncated_sources,
                    config.max_chain_paths()
                );
                tracing::warn!("{note}");
                failures.push(note);
            }
            found.chains
        });
    let circular_references = settle(
        &mut failures,
        cycles::simple_cycles(graph, config.max_cycles()),
    );

    tracing::info!("Analytics complete with {} skipped or sampled metrics", failures.len());

    AnalyticsReport {
        article_count: graph.node_count(),
        reference_count: graph.edge_count(),
        most_referenced: degree::most_cited(graph, top_k),
        most_referencing: degree::most_citing(graph, top_k),
        central_articles,
        isolated_articles: degree::isolated(graph),
        reference_chains,
        circular_references,
        failures,
    }
}

fn settle<T>(failures: &mut Vec<String>, result: Result<T, AnalyticsError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{e}");
            failures.push(e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::tests::{article, graph, id};

    #[test]
    fn mutual_citation_report() {
        let graph = graph(&[("1", &["2"]), ("2", &["1"])]);

        let report = analyze(&graph, &Config::default());

        assert_eq!(report.article_count, 2);
        assert_eq!(report.reference_count, 2);
        assert_eq!(
            report.circular_references,
            Some(vec![vec![id("1"), id("2")]])
        );
        assert!(report.isolated_articles.is_empty());
        assert_eq!(report.reference_chains, Some(Vec::new()));
        assert!(report.failures.is_empty());
    }

    #[test]
    fn isolated_pair_report() {
        let graph = graph(&[("1", &[]), ("2", &[])]);

        let report = analyze(&graph, &Config::default());

        assert_eq!(report.reference_count, 0);
        assert_eq!(report.isolated_articles, vec![id("1"), id("2")]);
        assert_eq!(report.circular_references, Some(Vec::new()));
        assert_eq!(
            report.central_articles,
            Some(vec![(id("1"), 0.0), (id("2"), 0.0)])
        );
    }

    #[test]
    fn failed_metric_is_absent_and_recorded() {
        let graph = graph(&[("1", &["2"]), ("2", &["3"]), ("3", &[])]);
        let mut config = Config::default();
        config.set_max_centrality_nodes(2);
        config.chains_enabled = false;

        let report = analyze(&graph, &config);

        assert_eq!(report.central_articles, None);
        assert_eq!(report.reference_chains, None);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.most_referenced.len(), 3);
        assert_eq!(report.circular_references, Some(Vec::new()));
    }

    #[test]
    fn chains_reported_for_a_realistic_rulebook() {
        // Article i cites the next three, as in a typical rulebook.
        let articles = (1..=60_u32).map(|i| {
            let cites: Vec<String> = (i + 1..=(i + 3).min(60)).map(|j| j.to_string()).collect();
            let cites: Vec<&str> = cites.iter().map(String::as_str).collect();
            article(&i.to_string(), &cites)
        });
        let graph = ReferenceGraph::from_articles(articles);

        let report = analyze(&graph, &Config::default());

        assert!(report.reference_chains.is_some());
        assert_eq!(report.reference_chains.map(|chains| chains.len()), Some(10));
        assert!(report.failures.is_empty());
    }

    #[test]
    fn sampled_chains_are_kept_and_noted() {
        let graph = graph(&[
            ("1", &["2"]),
            ("2", &["3"]),
            ("3", &["4"]),
            ("4", &["5"]),
            ("5", &[]),
        ]);
        let mut config = Config::default();
        config.set_max_chain_paths(3);

        let report = analyze(&graph, &config);

        assert_eq!(report.reference_chains.map(|chains| chains.len()), Some(2));
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("sampled"));
    }

    #[test]
    fn empty_graph_report() {
        let report = analyze(&ReferenceGraph::default(), &Config::default());

        assert_eq!(report.article_count, 0);
        assert!(report.most_referenced.is_empty());
        assert_eq!(report.central_articles, Some(Vec::new()));
        assert!(report.failures.is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let graph = graph(&[("1", &["2"]), ("2", &[])]);
        let report = analyze(&graph, &Config::default());

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["article_count"], 2);
        assert_eq!(json["most_referenced"][0][0], "2");
        assert_eq!(json["most_referenced"][0][1], 1);
    }
}
