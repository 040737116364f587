use std::collections::{HashMap, HashSet};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};

use super::{AnalyticsError, Metric};
use crate::{domain::ArticleId, ReferenceGraph};

/// Every simple directed cycle of the citation graph.
///
/// Uses Johnson's elementary circuit algorithm on each strongly connected
/// component. Each cycle starts at its earliest first-seen article, and the
/// cycles are sorted by the first-seen positions of their articles, so the
/// output is deterministic. A self-citation is a cycle of one.
///
/// # Errors
///
/// Returns [`AnalyticsError::Degenerate`] once more than `max_cycles` cycles
/// are found.
pub fn simple_cycles(
    graph: &ReferenceGraph,
    max_cycles: usize,
) -> Result<Vec<Vec<ArticleId>>, AnalyticsError> {
    let adjacency = graph.adjacency();
    let mut circuits = Circuits {
        found: Vec::new(),
        limit: max_cycles,
    };

    for (position, successors) in adjacency.iter().enumerate() {
        if successors.contains(&position) {
            circuits.push(vec![position])?;
        }
    }

    let mut pending: Vec<Vec<usize>> = tarjan_scc(graph.petgraph())
        .into_iter()
        .filter(|component| component.len() > 1)
        .collect();

    while let Some(mut component) = pending.pop() {
        component.sort_unstable();
        let start = component[0];

        let mut members = vec![false; adjacency.len()];
        for &position in &component {
            members[position] = true;
        }
        circuits.through(start, &adjacency, &members)?;

        // The rest of the component, without `start`, may still hold cycles.
        members[start] = false;
        pending.extend(
            components(&adjacency, &members)
                .into_iter()
                .filter(|component| component.len() > 1),
        );
    }

    let mut cycles = circuits.found;
    cycles.sort();
    tracing::debug!("Found {} simple cycles", cycles.len());

    Ok(cycles
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|position| graph.id_at(position).clone())
                .collect()
        })
        .collect())
}

struct Circuits {
    found: Vec<Vec<usize>>,
    limit: usize,
}

impl Circuits {
    fn push(&mut self, cycle: Vec<usize>) -> Result<(), AnalyticsError> {
        if self.found.len() >= self.limit {
            return Err(AnalyticsError::degenerate(
                Metric::Cycles,
                format!("more than {} cycles", self.limit),
            ));
        }
        self.found.push(cycle);
        Ok(())
    }

    /// Every cycle through `start` within `members`, which must be strongly
    /// connected and have `start` as its smallest position.
    fn through(
        &mut self,
        start: usize,
        adjacency: &[Vec<usize>],
        members: &[bool],
    ) -> Result<(), AnalyticsError> {
        let successors = |position: usize| -> Vec<usize> {
            adjacency[position]
                .iter()
                .copied()
                .filter(|&next| members[next] && next != position)
                .collect()
        };

        let mut path = vec![start];
        let mut blocked = HashSet::from([start]);
        let mut closed: HashSet<usize> = HashSet::new();
        let mut waiting: HashMap<usize, HashSet<usize>> = HashMap::new();
        let mut stack = vec![(start, successors(start))];

        while let Some((current, remaining)) = stack.last_mut() {
            let current = *current;
            let next = remaining.pop();
            let exhausted = remaining.is_empty();

            if let Some(next) = next {
                if next == start {
                    self.push(path.clone())?;
                    closed.extend(path.iter().copied());
                } else if !blocked.contains(&next) {
                    path.push(next);
                    stack.push((next, successors(next)));
                    closed.remove(&next);
                    blocked.insert(next);
                    continue;
                }
            }

            if exhausted {
                if closed.contains(&current) {
                    unblock(current, &mut blocked, &mut waiting);
                } else {
                    for next in successors(current) {
                        waiting.entry(next).or_default().insert(current);
                    }
                }
                stack.pop();
                path.pop();
            }
        }

        Ok(())
    }
}

fn unblock(
    position: usize,
    blocked: &mut HashSet<usize>,
    waiting: &mut HashMap<usize, HashSet<usize>>,
) {
    let mut stack = vec![position];
    while let Some(position) = stack.pop() {
        if blocked.remove(&position) {
            if let Some(dependents) = waiting.remove(&position) {
                stack.extend(dependents);
            }
        }
    }
}

/// Strongly connected components of the subgraph induced by `members`.
fn components(adjacency: &[Vec<usize>], members: &[bool]) -> Vec<Vec<usize>> {
    let mut subgraph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (position, successors) in adjacency.iter().enumerate() {
        if !members[position] {
            continue;
        }
        subgraph.add_node(position);
        for &next in successors {
            if members[next] && next != position {
                subgraph.add_edge(position, next, ());
            }
        }
    }
    tarjan_scc(&subgraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::tests::{graph, id};

    fn ids(cycles: &[Vec<ArticleId>]) -> Vec<Vec<&str>> {
        cycles
            .iter()
            .map(|cycle| cycle.iter().map(ArticleId::as_str).collect())
            .collect()
    }

    #[test]
    fn mutual_citation_is_a_cycle() {
        let graph = graph(&[("1", &["2"]), ("2", &["1"])]);

        let cycles = simple_cycles(&graph, 100).unwrap();

        assert_eq!(cycles, vec![vec![id("1"), id("2")]]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph(&[("1", &["2", "3"]), ("2", &["3"]), ("3", &[])]);
        assert!(simple_cycles(&graph, 100).unwrap().is_empty());
    }

    #[test]
    fn cycles_start_at_earliest_article() {
        // Listed in an order where "3" is seen first.
        let graph = graph(&[("3", &["1"]), ("1", &["2"]), ("2", &["3"])]);

        let cycles = simple_cycles(&graph, 100).unwrap();

        assert_eq!(ids(&cycles), vec![vec!["3", "1", "2"]]);
    }

    #[test]
    fn overlapping_cycles_are_all_found() {
        let graph = graph(&[
            ("1", &["2"]),
            ("2", &["1", "3"]),
            ("3", &["1", "3"]),
        ]);

        let cycles = simple_cycles(&graph, 100).unwrap();

        assert_eq!(
            ids(&cycles),
            vec![vec!["1", "2"], vec!["1", "2", "3"], vec!["3"]]
        );
    }

    #[test]
    fn complete_graph_cycle_count() {
        // K4 has 6 two-cycles, 8 three-cycles and 6 four-cycles.
        let graph = graph(&[
            ("1", &["2", "3", "4"]),
            ("2", &["1", "3", "4"]),
            ("3", &["1", "2", "4"]),
            ("4", &["1", "2", "3"]),
        ]);

        let cycles = simple_cycles(&graph, 100).unwrap();

        assert_eq!(cycles.len(), 20);
        assert!(cycles.iter().all(|cycle| {
            let unique: HashSet<_> = cycle.iter().collect();
            unique.len() == cycle.len()
        }));
    }

    #[test]
    fn too_many_cycles_is_degenerate() {
        let graph = graph(&[
            ("1", &["2", "3"]),
            ("2", &["1", "3"]),
            ("3", &["1", "2"]),
        ]);

        let error = simple_cycles(&graph, 2).unwrap_err();

        assert!(matches!(
            error,
            AnalyticsError::Degenerate {
                metric: Metric::Cycles,
                ..
            }
        ));
    }
}
