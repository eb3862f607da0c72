//! The directed dependency graph over column names.
//!
//! Vertices are column names (plus the synthetic root and any merged-group
//! names); each directed edge carries exactly one relationship, enforced by
//! keying the [`RelationshipIndex`] on the ordered pair. Vertices live in an
//! indexed table (name to integer id) with adjacency sets of ids, so removal
//! during merging never has to chase object references.
//!
//! The graph is mutated in strictly ordered phases: populate, merge
//! equivalent nodes, break residual two-cycles, then compute longest paths.
//! Longest-path results are memoized and never invalidated, so callers must
//! not mutate the graph once the final phase has started. Set and map
//! iteration never drives an order-sensitive decision directly; every such
//! loop walks vertex names lexicographically so the same input always
//! produces the same tree.

mod cycles;
mod equivalence;
mod longest_path;

use std::collections::{BTreeSet, HashMap};

use crate::{
    error::Result,
    index::{GraphEdge, RelationshipIndex},
    relationship::DependencySignal,
};

/// A directed graph of functional-dependency candidates.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use trellis_core::{DependencyGraph, GraphEdge, PairStatistics, Relationship};
///
/// let mut graph = DependencyGraph::new();
/// let stats = Arc::new(PairStatistics::root_link("city"));
/// graph.add_relationship(GraphEdge::Direct(Relationship::forward(stats)));
/// assert!(graph.has_edge("ROOT", "city"));
/// assert_eq!(graph.vertices(), vec!["ROOT", "city"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    index: RelationshipIndex,
    ids: HashMap<String, usize>,
    names: Vec<Option<String>>,
    outgoing: Vec<BTreeSet<usize>>,
    merged_columns: BTreeSet<String>,
    longest_paths: HashMap<String, Vec<String>>,
    longest_paths_computed: bool,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `edge` in the relationship index and adds the directed edge
    /// `source -> target`, creating vertices as needed.
    pub fn add_relationship(&mut self, edge: GraphEdge) {
        let source = edge.source().to_owned();
        let target = edge.target().to_owned();
        self.index.add(edge);
        let source_id = self.ensure_vertex(&source);
        let target_id = self.ensure_vertex(&target);
        self.outgoing[source_id].insert(target_id);
    }

    /// Adds an isolated vertex if it does not already exist.
    pub fn add_vertex(&mut self, name: &str) {
        self.ensure_vertex(name);
    }

    /// Whether `name` is currently a vertex of the graph.
    #[must_use]
    pub fn contains_vertex(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// All vertex names in lexicographic order.
    #[must_use]
    pub fn vertices(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of vertices currently in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    /// Whether the directed edge `source -> target` exists.
    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.ids.get(source), self.ids.get(target)) {
            (Some(&source_id), Some(&target_id)) => self.outgoing[source_id].contains(&target_id),
            _ => false,
        }
    }

    /// Number of outgoing edges of `name` (zero when absent).
    #[must_use]
    pub fn out_degree(&self, name: &str) -> usize {
        self.ids
            .get(name)
            .map_or(0, |&id| self.outgoing[id].len())
    }

    /// Number of incoming edges of `name` (zero when absent).
    #[must_use]
    pub fn in_degree(&self, name: &str) -> usize {
        self.ids.get(name).map_or(0, |&id| {
            self.outgoing.iter().filter(|set| set.contains(&id)).count()
        })
    }

    /// Names of the vertices `name` points to, in lexicographic order.
    #[must_use]
    pub fn outgoing_neighbours(&self, name: &str) -> Vec<String> {
        let Some(&id) = self.ids.get(name) else {
            return Vec::new();
        };
        let mut neighbours: Vec<String> = self.outgoing[id]
            .iter()
            .filter_map(|&target| self.name_of(target))
            .map(str::to_owned)
            .collect();
        neighbours.sort_unstable();
        neighbours
    }

    /// Names of the vertices pointing at `name`, in lexicographic order.
    #[must_use]
    pub fn incoming_sources(&self, name: &str) -> Vec<String> {
        let Some(&id) = self.ids.get(name) else {
            return Vec::new();
        };
        let mut sources: Vec<String> = self
            .outgoing
            .iter()
            .enumerate()
            .filter(|(_, targets)| targets.contains(&id))
            .filter_map(|(source, _)| self.name_of(source))
            .map(str::to_owned)
            .collect();
        sources.sort_unstable();
        sources
    }

    /// Looks up the relationship carried by the edge `source -> target`.
    ///
    /// # Errors
    /// Returns [`crate::GraphError::MissingRelationship`] when the ordered
    /// pair was never registered.
    pub fn relationship(&self, source: &str, target: &str) -> Result<&GraphEdge> {
        self.index.get(source, target)
    }

    /// Original columns that were collapsed into merged groups, in
    /// lexicographic order.
    #[must_use]
    pub fn merged_columns(&self) -> Vec<&str> {
        self.merged_columns.iter().map(String::as_str).collect()
    }

    /// Whether `name` is an original column that was merged away.
    #[must_use]
    pub fn is_merged_column(&self, name: &str) -> bool {
        self.merged_columns.contains(name)
    }

    pub(crate) fn index(&self) -> &RelationshipIndex {
        &self.index
    }

    fn ensure_vertex(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(Some(name.to_owned()));
        self.outgoing.push(BTreeSet::new());
        self.ids.insert(name.to_owned(), id);
        id
    }

    fn name_of(&self, id: usize) -> Option<&str> {
        self.names.get(id).and_then(Option::as_deref)
    }

    fn remove_edge(&mut self, source: &str, target: &str) {
        if let (Some(&source_id), Some(&target_id)) = (self.ids.get(source), self.ids.get(target)) {
            self.outgoing[source_id].remove(&target_id);
        }
    }

    fn remove_vertex(&mut self, name: &str) {
        let Some(id) = self.ids.remove(name) else {
            return;
        };
        self.names[id] = None;
        self.outgoing[id].clear();
        for targets in &mut self.outgoing {
            targets.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests;
