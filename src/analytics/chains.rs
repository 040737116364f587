use super::{AnalyticsError, Metric};
use crate::{
    domain::{ArticleId, Config},
    ReferenceGraph,
};

/// The outcome of a chain search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chains {
    /// The longest chains, longest first.
    pub chains: Vec<Vec<ArticleId>>,
    /// Number of starting articles whose search ran out of budget. Their
    /// chains are the longest found before stopping.
    pub truncated_sources: usize,
}

impl Chains {
    /// Whether every starting article was searched to the depth limit.
    #[must_use]
    pub const fn is_exhaustive(&self) -> bool {
        self.truncated_sources == 0
    }
}

/// The longest simple citation chains, longest first.
///
/// For every ordered pair of distinct articles, the simple paths of at most
/// `chain_max_depth` edges are enumerated and the first longest one is kept.
/// Chains with fewer than `chain_min_nodes` articles are dropped. Of the
/// rest, the `top_k` longest are returned; equal lengths keep the order of
/// their source and then target in the corpus.
///
/// The search from each article stops after `max_chain_paths` partial paths.
/// What was found up to then is kept, and the article is counted in
/// [`Chains::truncated_sources`].
///
/// All pairs sharing a source are served by one depth-first search from that
/// source, rather than one simple-path enumeration per pair.
///
/// # Errors
///
/// Returns [`AnalyticsError::Disabled`] if chains are switched off.
pub fn longest_chains(graph: &ReferenceGraph, config: &Config) -> Result<Chains, AnalyticsError> {
    if !config.chains_enabled {
        return Err(AnalyticsError::Disabled(Metric::Chains));
    }

    let adjacency = graph.adjacency();
    let n = adjacency.len();
    let mut search = Search {
        adjacency: &adjacency,
        max_depth: config.chain_max_depth(),
        budget: config.max_chain_paths(),
        explored: 0,
        truncated: false,
        path: Vec::new(),
        on_path: vec![false; n],
        longest: vec![None; n],
    };

    let mut chains: Vec<Vec<usize>> = Vec::new();
    let mut truncated_sources = 0;
    let mut explored = 0;

    for source in 0..n {
        search.start(source);
        search.explore();
        search.on_path[source] = false;

        explored += search.explored;
        if search.truncated {
            tracing::debug!("Chain search from {} cut short", graph.id_at(source));
            truncated_sources += 1;
        }

        chains.extend(
            search
                .longest
                .iter_mut()
                .filter_map(Option::take)
                .filter(|chain| chain.len() >= config.chain_min_nodes()),
        );
    }

    tracing::debug!(
        "Explored {explored} partial paths, {} chains qualify",
        chains.len()
    );

    chains.sort_by(|a, b| b.len().cmp(&a.len()));

    Ok(Chains {
        chains: chains
            .into_iter()
            .take(config.top_k())
            .map(|chain| {
                chain
                    .into_iter()
                    .map(|position| graph.id_at(position).clone())
                    .collect()
            })
            .collect(),
        truncated_sources,
    })
}

struct Search<'a> {
    adjacency: &'a [Vec<usize>],
    max_depth: usize,
    /// Partial paths allowed per source.
    budget: usize,
    explored: usize,
    truncated: bool,
    path: Vec<usize>,
    on_path: Vec<bool>,
    /// First longest path from the current source, indexed by target.
    longest: Vec<Option<Vec<usize>>>,
}

impl Search<'_> {
    fn start(&mut self, source: usize) {
        self.explored = 0;
        self.truncated = false;
        self.longest.fill(None);
        self.path.clear();
        self.path.push(source);
        self.on_path[source] = true;
    }

    fn explore(&mut self) {
        if self.path.len() > self.max_depth {
            return;
        }
        let Some(&current) = self.path.last() else {
            return;
        };

        let adjacency = self.adjacency;
        for &next in &adjacency[current] {
            if self.on_path[next] {
                continue;
            }

            if self.explored == self.budget {
                self.truncated = true;
                return;
            }
            self.explored += 1;

            self.path.push(next);
            self.on_path[next] = true;

            if self.longest[next]
                .as_ref()
                .is_none_or(|best| best.len() < self.path.len())
            {
                self.longest[next] = Some(self.path.clone());
            }

            self.explore();

            self.on_path[next] = false;
            self.path.pop();

            if self.truncated {
                return;
            }
        }
    }
}
