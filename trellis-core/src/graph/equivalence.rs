//! Equivalence detection and node merging.
//!
//! Two columns that point at each other *and* share exactly the same set of
//! remaining out-neighbours carry no distinguishing downstream information:
//! each determines the other and everything below them is identical. Such
//! pairs collapse into one merged vertex. Bidirectional pairs whose
//! neighbour sets differ are genuinely cyclic and are left for cycle
//! breaking.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, instrument, warn};

use crate::error::Result;

use super::DependencyGraph;

/// Disjoint-set forest over the columns that appear in equivalence pairs.
///
/// Uses union by size with path halving; group ids are indices into the
/// caller's sorted name table, so group iteration stays deterministic.
#[derive(Debug)]
struct EquivalenceClasses {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl EquivalenceClasses {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, left: usize, right: usize) {
        let left = self.find(left);
        let right = self.find(right);
        if left == right {
            return;
        }
        let (small, large) = if self.size[left] < self.size[right] {
            (left, right)
        } else {
            (right, left)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
    }
}

impl DependencyGraph {
    /// Classifies every bidirectional edge pair.
    ///
    /// Returns the true equivalences as sorted `(smaller, larger)` name pairs
    /// in lexicographic order. A pair `(a, b)` qualifies only when
    /// out-degree(a) - 1, out-degree(b) - 1, and the size of the shared
    /// neighbour set (excluding each other) all agree, meaning `a` and `b`
    /// point at exactly the same vertices besides one another. Imperfect
    /// bidirectional pairs are reported via `tracing` and must be resolved by
    /// cycle breaking instead.
    #[must_use]
    pub fn bidirectional_relationships(&self) -> Vec<(String, String)> {
        let mut equivalences = BTreeSet::new();
        for left in self.vertices() {
            for right in self.outgoing_neighbours(left) {
                // Evaluate each unordered pair once; the test is symmetric.
                if right.as_str() <= left || !self.has_edge(&right, left) {
                    continue;
                }

                let left_neighbours: BTreeSet<String> =
                    self.outgoing_neighbours(left).into_iter().collect();
                let right_neighbours: BTreeSet<String> =
                    self.outgoing_neighbours(&right).into_iter().collect();
                let shared = left_neighbours.intersection(&right_neighbours).count();
                let left_others = left_neighbours.len().saturating_sub(1);
                let right_others = right_neighbours.len().saturating_sub(1);

                if left_others == right_others && right_others == shared {
                    equivalences.insert((left.to_owned(), right));
                } else {
                    warn!(
                        left,
                        right = right.as_str(),
                        "bidirectional dependency without matching neighbour sets; \
                         deferring to cycle breaking"
                    );
                }
            }
        }
        equivalences.into_iter().collect()
    }

    /// Collapses every bidirectional-equivalence group into a single merged
    /// vertex.
    ///
    /// Groups are formed by unioning all equivalence pairs. For each group the
    /// external out-neighbours and in-neighbours of its members are gathered,
    /// the group is registered with the relationship index under its canonical
    /// name, replacement edges are synthesized in both directions, and the
    /// original member vertices are removed. This is a one-shot pass: newly
    /// formed merged vertices are not re-examined for further bidirectional
    /// pairs.
    ///
    /// When no equivalence pair exists the graph is left unchanged.
    ///
    /// # Errors
    /// Returns [`crate::GraphError::MissingRelationship`] when a replacement
    /// edge requires a member pair that was never registered.
    #[instrument(skip(self), err)]
    pub fn merge_nodes(&mut self) -> Result<()> {
        let pairs = self.bidirectional_relationships();
        if pairs.is_empty() {
            return Ok(());
        }

        // Union the pairs into groups over a sorted name table so both group
        // membership and group order are reproducible.
        let nodes: BTreeSet<&String> = pairs.iter().flat_map(|(a, b)| [a, b]).collect();
        let nodes: Vec<String> = nodes.into_iter().cloned().collect();
        let positions: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(position, name)| (name.as_str(), position))
            .collect();

        let mut classes = EquivalenceClasses::new(nodes.len());
        for (left, right) in &pairs {
            classes.union(positions[left.as_str()], positions[right.as_str()]);
        }

        let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (position, name) in nodes.iter().enumerate() {
            groups
                .entry(classes.find(position))
                .or_default()
                .push(name.clone());
        }

        for group in groups.values() {
            self.materialize_group(group)?;
        }

        for node in &nodes {
            self.remove_vertex(node);
        }

        debug!(groups = groups.len(), "collapsed equivalence groups");
        Ok(())
    }

    /// Adds the merged vertex for `group` and rewires its external edges.
    fn materialize_group(&mut self, group: &[String]) -> Result<()> {
        let mut descendants: BTreeSet<String> = BTreeSet::new();
        let mut parents: BTreeSet<String> = BTreeSet::new();
        for member in group {
            descendants.extend(self.outgoing_neighbours(member));
            parents.extend(self.incoming_sources(member));
        }
        for member in group {
            descendants.remove(member);
            parents.remove(member);
        }

        let merged_name = self.index.merge_nodes(group);
        self.add_vertex(&merged_name);
        self.merged_columns.extend(group.iter().cloned());

        for descendant in &descendants {
            let edge = self.index.make_merged_relationship(&merged_name, descendant)?;
            self.add_relationship(edge);
        }
        for parent in &parents {
            let edge = self.index.make_merged_relationship(parent, &merged_name)?;
            self.add_relationship(edge);
        }

        Ok(())
    }
}
