//! Longest-path assignment over the acyclic dependency graph.
//!
//! Every vertex is assigned the longest path reaching it from the root; the
//! second-to-last vertex on that path becomes its parent in the attribute
//! tree. Ties between equally long incoming paths are resolved by the
//! greater relationship strength, then by lexicographic source order.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, instrument};

use crate::{
    error::{GraphError, Result},
    stats::ROOT_NAME,
    strength,
};

use super::DependencyGraph;

impl DependencyGraph {
    /// Length in edges of the longest path from the root to `name`.
    ///
    /// Longest paths are computed on first use and memoized; the graph must
    /// not be mutated afterwards.
    ///
    /// # Errors
    /// Returns [`GraphError::RemainingCycle`] when the graph is still cyclic
    /// and [`GraphError::MissingVertex`] when `name` is not a vertex.
    pub fn longest_path_length(&mut self, name: &str) -> Result<usize> {
        self.ensure_longest_paths()?;
        let path = self
            .longest_paths
            .get(name)
            .ok_or_else(|| GraphError::MissingVertex {
                vertex: name.to_owned(),
            })?;
        Ok(path.len().saturating_sub(1))
    }

    /// The vertex preceding `name` on its longest path from the root, which
    /// is `name`'s parent in the synthesized tree. Returns `None` for the
    /// root itself.
    ///
    /// # Errors
    /// Returns [`GraphError::RemainingCycle`] when the graph is still cyclic
    /// and [`GraphError::MissingVertex`] when `name` is not a vertex.
    pub fn longest_path_predecessor(&mut self, name: &str) -> Result<Option<String>> {
        self.ensure_longest_paths()?;
        let path = self
            .longest_paths
            .get(name)
            .ok_or_else(|| GraphError::MissingVertex {
                vertex: name.to_owned(),
            })?;
        if path.len() < 2 {
            return Ok(None);
        }
        Ok(path.get(path.len() - 2).cloned())
    }

    fn ensure_longest_paths(&mut self) -> Result<()> {
        if self.longest_paths_computed {
            return Ok(());
        }
        self.longest_paths = self.compute_longest_paths()?;
        self.longest_paths_computed = true;
        Ok(())
    }

    /// Computes the longest path from the root to every vertex.
    ///
    /// Requires an acyclic graph; a brute-force search over cyclic graphs is
    /// not implemented and such graphs are rejected outright. Vertices are
    /// processed in topological order, so every predecessor path is final
    /// before it is extended. A vertex without incoming edges gets the
    /// singleton root path. For any other vertex the incoming edge with the
    /// strictly longest predecessor path wins; equal lengths fall back to the
    /// greater relationship strength, and remaining ties keep the first
    /// candidate in lexicographic source order.
    #[instrument(skip(self), err)]
    fn compute_longest_paths(&self) -> Result<HashMap<String, Vec<String>>> {
        let order = self.topological_order()?;
        debug!(vertices = order.len(), "computing longest paths");

        let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
        for source in self.vertices() {
            for target in self.outgoing_neighbours(source) {
                incoming.entry(target).or_default().push(source.to_owned());
            }
        }

        let mut paths: HashMap<String, Vec<String>> = HashMap::new();
        for vertex in order {
            let sources = incoming.get(&vertex).map_or(&[][..], Vec::as_slice);
            if sources.is_empty() {
                paths.insert(vertex, vec![ROOT_NAME.to_owned()]);
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            let mut winner: Vec<String> = Vec::new();
            for source in sources {
                let edge = self.index.get(source, &vertex)?;
                let edge_strength = strength::strength(edge);
                let path = paths
                    .get(source)
                    .ok_or(GraphError::RemainingCycle)?;
                let replaces = match best {
                    None => true,
                    Some((length, incumbent)) => {
                        path.len() > length
                            || (path.len() == length && edge_strength > incumbent)
                    }
                };
                if replaces {
                    best = Some((path.len(), edge_strength));
                    winner = path.clone();
                }
            }

            winner.push(vertex.clone());
            paths.insert(vertex, winner);
        }

        Ok(paths)
    }

    /// A deterministic topological order: Kahn's algorithm with a
    /// lexicographically ordered ready set.
    ///
    /// # Errors
    /// Returns [`GraphError::RemainingCycle`] when the graph is cyclic.
    pub(super) fn topological_order(&self) -> Result<Vec<String>> {
        let mut remaining: HashMap<usize, usize> = self.ids.values().map(|&id| (id, 0)).collect();
        for &id in self.ids.values() {
            for target in &self.outgoing[id] {
                if let Some(degree) = remaining.get_mut(target) {
                    *degree += 1;
                }
            }
        }

        // Keyed by name so equal-depth vertices drain in lexicographic order.
        let mut ready: BTreeSet<(&str, usize)> = remaining
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .filter_map(|(&id, _)| self.name_of(id).map(|name| (name, id)))
            .collect();

        let mut order = Vec::with_capacity(self.vertex_count());
        while let Some(&(name, id)) = ready.iter().next() {
            ready.remove(&(name, id));
            order.push(name.to_owned());
            for &target in &self.outgoing[id] {
                if let Some(degree) = remaining.get_mut(&target) {
                    *degree -= 1;
                    if *degree == 0 {
                        if let Some(target_name) = self.name_of(target) {
                            ready.insert((target_name, target));
                        }
                    }
                }
            }
        }

        if order.len() == self.vertex_count() {
            Ok(order)
        } else {
            Err(GraphError::RemainingCycle)
        }
    }
}
