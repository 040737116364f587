//! In-memory citation graph over the articles of a corpus.
//!
//! The [`ReferenceGraph`] knows nothing about documents or text extraction. It
//! owns the articles of a corpus in first-seen order and maintains a directed
//! graph of resolved citations between them.

use std::collections::{BTreeSet, HashMap};

use petgraph::{graphmap::DiGraphMap, Direction};
use tracing::instrument;

use crate::domain::{Article, ArticleId, ArticleView};

/// The articles of a corpus and the citations between them.
///
/// Storage is an arena of records plus derived indices:
/// - Articles: `Vec<Article>`, in first-seen order (the arena)
/// - Identifier lookup: `HashMap<ArticleId, usize>` into the arena
/// - Citations: `DiGraphMap<usize, ()>`, edges point from the citing article
///   to the cited article
///
/// The outgoing citation sets stored on each [`Article`] are authoritative.
/// The graph is derived from them by [`ReferenceGraph::rebuild`], and the
/// inverse ("cited by") view is always read from the graph's incoming edges,
/// so forward and inverse views cannot drift apart.
#[derive(Debug, Default, Clone)]
pub struct ReferenceGraph {
    articles: Vec<Article>,
    index: HashMap<ArticleId, usize>,
    graph: DiGraphMap<usize, ()>,
    unresolved: usize,
}

impl ReferenceGraph {
    /// Creates an empty graph with pre-allocated capacity for the given number
    /// of articles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            articles: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            graph: DiGraphMap::with_capacity(capacity, capacity * 2),
            unresolved: 0,
        }
    }

    /// Builds a graph from a complete set of articles.
    ///
    /// If several articles share an identifier, the last one wins but keeps the
    /// position of the first.
    #[must_use]
    pub fn from_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let articles = articles.into_iter();
        let mut graph = Self::with_capacity(articles.size_hint().0);
        for article in articles {
            graph.insert(article);
        }
        graph.rebuild();
        graph
    }

    /// Inserts an article, replacing any article with the same identifier.
    ///
    /// Returns the replaced article, if any. The citation edges are not updated
    /// until [`ReferenceGraph::rebuild`] is called.
    pub fn insert(&mut self, article: Article) -> Option<Article> {
        if let Some(&position) = self.index.get(&article.id) {
            return Some(std::mem::replace(&mut self.articles[position], article));
        }

        self.index.insert(article.id.clone(), self.articles.len());
        self.articles.push(article);
        None
    }

    /// Replaces the outgoing citations of an article.
    ///
    /// Returns `false` if no article has the given identifier. The citation
    /// edges are not updated until [`ReferenceGraph::rebuild`] is called.
    pub fn set_outgoing_refs(&mut self, id: &ArticleId, refs: BTreeSet<ArticleId>) -> bool {
        let Some(&position) = self.index.get(id) else {
            return false;
        };
        self.articles[position].set_outgoing_refs(refs);
        true
    }

    /// Rebuilds the citation edges from the articles' outgoing citation sets.
    ///
    /// Citations of identifiers that are not in the corpus are dropped from the
    /// graph and counted as unresolved. This is a full replacement: calling it
    /// twice yields the same graph.
    #[instrument(skip(self), fields(articles = self.articles.len()))]
    pub fn rebuild(&mut self) {
        let mut graph = DiGraphMap::with_capacity(self.articles.len(), self.graph.edge_count());
        let mut unresolved = 0;

        for position in 0..self.articles.len() {
            graph.add_node(position);
        }

        for (source, article) in self.articles.iter().enumerate() {
            for cited in &article.outgoing_refs {
                match self.index.get(cited) {
                    Some(&target) => {
                        graph.add_edge(source, target, ());
                    }
                    None => {
                        tracing::trace!("Unresolved citation {} -> {}", article.id, cited);
                        unresolved += 1;
                    }
                }
            }
        }

        self.graph = graph;
        self.unresolved = unresolved;

        tracing::info!(
            "Reference graph built: {} articles, {} citations, {} unresolved",
            self.node_count(),
            self.edge_count(),
            self.unresolved
        );
    }

    /// Number of articles.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.articles.len()
    }

    /// Number of resolved citations.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of citations dropped by the last rebuild because their target is
    /// not in the corpus.
    #[must_use]
    pub const fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    /// Returns `true` if the graph holds no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns `true` if an article with this identifier exists.
    #[must_use]
    pub fn contains(&self, id: &ArticleId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over all article identifiers in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &ArticleId> + '_ {
        self.articles.iter().map(Article::id)
    }

    /// The articles in first-seen order.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Retrieves an article by identifier.
    #[must_use]
    pub fn get(&self, id: &ArticleId) -> Option<&Article> {
        self.index.get(id).map(|&position| &self.articles[position])
    }

    /// Retrieves an article by identifier as a borrowed view, including the
    /// articles that cite it.
    #[must_use]
    pub fn article(&self, id: &ArticleId) -> Option<ArticleView<'_>> {
        let position = *self.index.get(id)?;
        Some(self.view(position))
    }

    /// Returns an iterator over all articles as borrowed views, in first-seen
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = ArticleView<'_>> + '_ {
        (0..self.articles.len()).map(move |position| self.view(position))
    }

    /// Articles cited by the given article that are present in the corpus.
    pub fn out_edges(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> + '_ {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Articles that cite the given article.
    pub fn in_edges(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> + '_ {
        self.neighbors(id, Direction::Incoming)
    }

    /// The set of articles citing the given article.
    #[must_use]
    pub fn incoming_refs(&self, id: &ArticleId) -> BTreeSet<ArticleId> {
        self.in_edges(id).cloned().collect()
    }

    /// Number of resolved citations made by the article.
    #[must_use]
    pub fn out_degree(&self, id: &ArticleId) -> usize {
        self.out_edges(id).count()
    }

    /// Number of articles citing the article.
    #[must_use]
    pub fn in_degree(&self, id: &ArticleId) -> usize {
        self.in_edges(id).count()
    }

    /// Cited identifiers of the article that are not present in the corpus.
    pub fn unresolved_refs(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|article| article.outgoing_refs.iter())
            .filter(|cited| !self.contains(cited))
    }

    /// The flat list of resolved citations as `(citing, cited)` pairs.
    ///
    /// Pairs are ordered by citing article (first-seen order), then by cited
    /// identifier.
    #[must_use]
    pub fn edges(&self) -> Vec<(ArticleId, ArticleId)> {
        self.graph
            .all_edges()
            .map(|(source, target, _)| {
                (
                    self.articles[source].id.clone(),
                    self.articles[target].id.clone(),
                )
            })
            .collect()
    }
}

/// Index-level access for the analytics.
impl ReferenceGraph {
    pub(crate) fn id_at(&self, position: usize) -> &ArticleId {
        &self.articles[position].id
    }

    pub(crate) fn successors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors_directed(position, Direction::Outgoing)
    }

    pub(crate) fn predecessors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors_directed(position, Direction::Incoming)
    }

    /// Outgoing adjacency lists indexed by arena position.
    pub(crate) fn adjacency(&self) -> Vec<Vec<usize>> {
        (0..self.articles.len())
            .map(|position| self.successors(position).collect())
            .collect()
    }

    pub(crate) const fn petgraph(&self) -> &DiGraphMap<usize, ()> {
        &self.graph
    }
}

impl ReferenceGraph {
    fn view(&self, position: usize) -> ArticleView<'_> {
        let article = &self.articles[position];
        ArticleView {
            id: &article.id,
            title: &article.title,
            content: &article.content,
            source_document: &article.source_document,
            word_count: article.word_count(),
            outgoing_refs: self
                .successors(position)
                .map(|cited| self.articles[cited].id.clone())
                .collect(),
            incoming_refs: self
                .predecessors(position)
                .map(|citing| self.articles[citing].id.clone())
                .collect(),
            unresolved_refs: self.unresolved_refs(&article.id).cloned().collect(),
        }
    }

    fn neighbors(
        &self,
        id: &ArticleId,
        direction: Direction,
    ) -> impl Iterator<Item = &ArticleId> + '_ {
        self.index
            .get(id)
            .copied()
            .filter(|&position| self.graph.contains_node(position))
            .into_iter()
            .flat_map(move |position| self.graph.neighbors_directed(position, direction))
            .map(|neighbor| &self.articles[neighbor].id)
    }
}
