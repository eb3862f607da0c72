//! Residual cycle breaking.
//!
//! Merging collapses the bidirectional pairs that are true equivalences; any
//! two-cycle that survives connects vertices with differing neighbour sets.
//! This pass removes one edge of each such cycle: the vertex with the lower
//! out-degree loses its edge into the higher-connectivity vertex, so the more
//! structural node keeps its outgoing reach. The heuristic is deterministic
//! but not proven to resolve cycles longer than two nodes; those surface as
//! [`crate::GraphError::RemainingCycle`] when longest paths are requested.

use tracing::{debug, instrument};

use super::DependencyGraph;

impl DependencyGraph {
    /// Breaks every two-cycle left after [`Self::merge_nodes`].
    ///
    /// Vertices are scanned in lexicographic order. For a surviving cycle
    /// `a <-> b`, the edge `a -> b` is removed when out-degree(a) is less than
    /// or equal to out-degree(b); on a tie the first-visited direction loses.
    /// Out-degrees are read live, so a removal is visible to the rest of the
    /// scan.
    #[instrument(skip(self))]
    pub fn break_cycles(&mut self) {
        let mut removed = 0_usize;
        let vertices: Vec<String> = self.vertices().into_iter().map(str::to_owned).collect();
        for vertex in &vertices {
            for neighbour in self.outgoing_neighbours(vertex) {
                if !self.has_edge(&neighbour, vertex) {
                    continue;
                }
                if self.out_degree(vertex) <= self.out_degree(&neighbour) {
                    self.remove_edge(vertex, &neighbour);
                    removed += 1;
                }
            }
        }
        debug!(removed, "broke residual two-cycles");
    }

    /// Whether the graph currently contains any directed cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.topological_order().is_err()
    }
}
