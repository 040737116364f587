use crate::{domain::ArticleId, ReferenceGraph};

/// The `k` articles cited by the most other articles, most cited first.
///
/// Ties keep first-seen order.
#[must_use]
pub fn most_cited(graph: &ReferenceGraph, k: usize) -> Vec<(ArticleId, usize)> {
    ranked(graph, k, |position| graph.predecessors(position).count())
}

/// The `k` articles citing the most other articles, most citing first.
///
/// Ties keep first-seen order.
#[must_use]
pub fn most_citing(graph: &ReferenceGraph, k: usize) -> Vec<(ArticleId, usize)> {
    ranked(graph, k, |position| graph.successors(position).count())
}

/// Articles that neither cite nor are cited by anything, in first-seen order.
#[must_use]
pub fn isolated(graph: &ReferenceGraph) -> Vec<ArticleId> {
    (0..graph.node_count())
        .filter(|&position| {
            graph.successors(position).next().is_none()
                && graph.predecessors(position).next().is_none()
        })
        .map(|position| graph.id_at(position).clone())
        .collect()
}

fn ranked(
    graph: &ReferenceGraph,
    k: usize,
    degree: impl Fn(usize) -> usize,
) -> Vec<(ArticleId, usize)> {
    let mut degrees: Vec<(usize, usize)> = (0..graph.node_count())
        .map(|position| (position, degree(position)))
        .collect();

    // `sort_by` is stable, which preserves first-seen order among ties.
    degrees.sort_by(|a, b| b.1.cmp(&a.1));

    degrees
        .into_iter()
        .take(k)
        .map(|(position, degree)| (graph.id_at(position).clone(), degree))
        .collect()
}
