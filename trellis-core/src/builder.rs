//! Attribute-tree construction from pairwise statistics.
//!
//! The builder derives both orientations of every statistics record, keeps
//! the orientations that pass the acceptance predicate as graph edges, and
//! tracks every observed column regardless of acceptance. Building then
//! synthesizes root edges, validates the graph, collapses equivalences,
//! breaks residual cycles, and reads the tree off the longest-path
//! assignment. Columns with no accepted relationship at all are attached
//! directly under the root.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    error::{GraphError, Result},
    graph::DependencyGraph,
    index::GraphEdge,
    relationship::Relationship,
    stats::{PairStatistics, ROOT_NAME},
    strength,
    tree::AttributeTree,
};

/// Builds an [`AttributeTree`] from [`PairStatistics`] records.
///
/// Records may arrive in any order; the same set of records always yields
/// the same tree.
///
/// # Examples
/// ```
/// use trellis_core::{AttributeTreeBuilder, PairStatistics};
///
/// let mut builder = AttributeTreeBuilder::new();
/// builder.add_statistics(PairStatistics {
///     c1: "city".into(),
///     c2: "country".into(),
///     card_c1: 40,
///     card_c2: 7,
///     card_pair: 40,
///     mode_c1: None,
///     mode_c2: None,
///     null_count_c1: 0,
///     null_count_c2: 0,
///     penalty_c1_c2: 0,
///     penalty_c2_c1: 0,
/// });
/// let tree = builder.build().expect("graph is acyclic");
/// assert_eq!(tree.children(tree.root()), &["city".to_owned()]);
/// assert_eq!(tree.children("city"), &["country".to_owned()]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeTreeBuilder {
    graph: DependencyGraph,
    observed: BTreeSet<String>,
}

impl AttributeTreeBuilder {
    /// Creates a builder with no statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-loaded with `records`.
    #[must_use]
    pub fn with_statistics<I: IntoIterator<Item = PairStatistics>>(records: I) -> Self {
        let mut builder = Self::new();
        for record in records {
            builder.add_statistics(record);
        }
        builder
    }

    /// Feeds one statistics record into the graph.
    ///
    /// Both orientations are derived; each becomes an edge only when it
    /// passes the acceptance predicate. Both column names count as observed
    /// either way.
    pub fn add_statistics(&mut self, record: PairStatistics) {
        self.observed.insert(record.c1.clone());
        self.observed.insert(record.c2.clone());

        let record = Arc::new(record);
        let (forward, reverse) = Relationship::both(&record);
        for relationship in [forward, reverse] {
            if strength::is_accepted(&relationship) {
                self.graph
                    .add_relationship(GraphEdge::Direct(relationship));
            }
        }
    }

    /// Column names observed so far, in lexicographic order.
    #[must_use]
    pub fn observed_columns(&self) -> Vec<&str> {
        self.observed.iter().map(String::as_str).collect()
    }

    /// Runs the remaining phases and extracts the tree.
    ///
    /// # Errors
    /// Returns [`GraphError::MalformedGraph`] when a non-root vertex lacks
    /// incoming edges after root synthesis (a defect in population, not a
    /// runtime condition), [`GraphError::MissingRelationship`] when merging
    /// requires an unregistered member pair, and
    /// [`GraphError::RemainingCycle`] when a cycle survives preprocessing.
    #[instrument(skip(self), err)]
    pub fn build(mut self) -> Result<AttributeTree> {
        self.create_root_node();
        self.assert_only_root_lacks_incoming_edges()?;
        self.graph.merge_nodes()?;
        self.graph.break_cycles();
        self.assemble_tree()
    }

    /// Synthesizes a root edge to every observed column so each one is
    /// reachable from the root even without accepted data-derived edges.
    fn create_root_node(&mut self) {
        for column in &self.observed {
            let stats = Arc::new(PairStatistics::root_link(column));
            self.graph
                .add_relationship(GraphEdge::Direct(Relationship::forward(stats)));
        }
        debug!(columns = self.observed.len(), "synthesized root edges");
    }

    /// The root is the only vertex allowed to have no incoming edges; any
    /// other such vertex means root synthesis missed a column.
    fn assert_only_root_lacks_incoming_edges(&self) -> Result<()> {
        for vertex in self.graph.vertices() {
            if vertex != ROOT_NAME && self.graph.in_degree(vertex) == 0 {
                return Err(GraphError::MalformedGraph {
                    vertex: vertex.to_owned(),
                });
            }
        }
        Ok(())
    }

    fn assemble_tree(mut self) -> Result<AttributeTree> {
        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        children.entry(ROOT_NAME.to_owned()).or_default();

        let vertices: Vec<String> = self
            .graph
            .vertices()
            .into_iter()
            .map(str::to_owned)
            .collect();
        for vertex in vertices {
            if vertex == ROOT_NAME {
                continue;
            }
            let parent = self
                .graph
                .longest_path_predecessor(&vertex)?
                .unwrap_or_else(|| ROOT_NAME.to_owned());
            children.entry(parent).or_default().push(vertex);
        }

        // Columns that never took part in a retained relationship are neither
        // graph vertices nor group members; they land directly under the root.
        for column in &self.observed {
            if !self.graph.contains_vertex(column) && !self.graph.is_merged_column(column) {
                children
                    .entry(ROOT_NAME.to_owned())
                    .or_default()
                    .push(column.clone());
            }
        }

        let members = self.graph.index().merged_members().clone();
        Ok(AttributeTree::new(children, members))
    }
}
