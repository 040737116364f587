use std::collections::VecDeque;

use super::{AnalyticsError, Metric};
use crate::{domain::ArticleId, ReferenceGraph};

/// Normalized betweenness centrality of every article, indexed by first-seen
/// position.
///
/// Brandes' algorithm over the directed, unweighted citation graph. Scores
/// are scaled by `1 / ((n - 1)(n - 2))` when there are more than two articles.
///
/// # Errors
///
/// Returns [`AnalyticsError::Degenerate`] if the graph has more than
/// `max_nodes` articles or a score is not finite.
#[allow(clippy::cast_precision_loss)]
pub fn betweenness(graph: &ReferenceGraph, max_nodes: usize) -> Result<Vec<f64>, AnalyticsError> {
    let n = graph.node_count();
    if n > max_nodes {
        return Err(AnalyticsError::degenerate(
            Metric::Centrality,
            format!("{n} articles exceed the limit of {max_nodes}"),
        ));
    }

    let adjacency = graph.adjacency();
    let mut scores = vec![0.0_f64; n];

    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut paths = vec![0.0_f64; n];
    let mut distance: Vec<Option<usize>> = vec![None; n];
    let mut dependency = vec![0.0_f64; n];

    for source in 0..n {
        order.clear();
        predecessors.iter_mut().for_each(Vec::clear);
        paths.fill(0.0);
        distance.fill(None);
        dependency.fill(0.0);

        paths[source] = 1.0;
        distance[source] = Some(0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            let Some(dv) = distance[v] else { continue };
            for &w in &adjacency[v] {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    paths[w] += paths[v];
                    predecessors[w].push(v);
                }
            }
        }

        while let Some(w) = order.pop() {
            for &v in &predecessors[w] {
                dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                scores[w] += dependency[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        scores.iter_mut().for_each(|score| *score *= scale);
    }

    if scores.iter().any(|score| !score.is_finite()) {
        return Err(AnalyticsError::degenerate(
            Metric::Centrality,
            "scores are not finite",
        ));
    }

    Ok(scores)
}

/// The `k` articles with the highest betweenness, most central first.
///
/// Ties keep first-seen order.
///
/// # Errors
///
/// Fails when [`betweenness`] does.
pub fn most_central(
    graph: &ReferenceGraph,
    k: usize,
    max_nodes: usize,
) -> Result<Vec<(ArticleId, f64)>, AnalyticsError> {
    let mut ranked: Vec<(usize, f64)> = betweenness(graph, max_nodes)?
        .into_iter()
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(ranked
        .into_iter()
        .take(k)
        .map(|(position, score)| (graph.id_at(position).clone(), score))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::tests::{graph, id};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn middle_of_a_path_is_central() {
        let graph = graph(&[("1", &["2"]), ("2", &["3"]), ("3", &[])]);

        let scores = betweenness(&graph, 100).unwrap();

        assert!(close(scores[0], 0.0));
        assert!(close(scores[1], 0.5));
        assert!(close(scores[2], 0.0));
    }

    #[test]
    fn shortest_paths_share_credit() {
        // Two shortest paths from 1 to 4, through 2 and through 3.
        let graph = graph(&[("1", &["2", "3"]), ("2", &["4"]), ("3", &["4"]), ("4", &[])]);

        let scores = betweenness(&graph, 100).unwrap();

        // 0.5 each, scaled by 1 / (3 * 2).
        assert!(close(scores[1], 0.5 / 6.0));
        assert!(close(scores[2], 0.5 / 6.0));
        assert!(close(scores[0], 0.0));
    }

    #[test]
    fn two_articles_are_not_normalized() {
        let graph = graph(&[("1", &["2"]), ("2", &["1"])]);
        assert_eq!(betweenness(&graph, 100).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let graph = graph(&[("1", &["2"]), ("2", &["3"]), ("3", &[]), ("4", &[])]);

        let ranked = most_central(&graph, 2, 100).unwrap();

        assert_eq!(ranked[0].0, id("2"));
        assert_eq!(ranked[1].0, id("1"));
    }

    #[test]
    fn too_many_articles_is_degenerate() {
        let graph = graph(&[("1", &[]), ("2", &[]), ("3", &[])]);

        let error = betweenness(&graph, 2).unwrap_err();

        assert!(matches!(
            error,
            AnalyticsError::Degenerate {
                metric: Metric::Centrality,
                ..
            }
        ));
    }
}
