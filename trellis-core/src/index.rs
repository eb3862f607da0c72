//! Storage and merging of directed relationships.
//!
//! The index holds exactly one relationship per ordered column pair and keeps
//! the membership records for merged groups. It is the factory for
//! [`MergedRelationship`] values: when the graph collapses a group, the index
//! expands each endpoint to its member columns and picks the strongest
//! representative among every member-pair combination.

use std::collections::{BTreeMap, HashMap};

use crate::{
    error::{GraphError, Result},
    relationship::{DependencySignal, MergedRelationship, Relationship},
    strength,
};

/// An edge stored in the index: either a raw directed relationship or a
/// synthesized group edge.
#[derive(Clone, Debug)]
pub enum GraphEdge {
    /// A relationship between two raw columns (or the root and a column).
    Direct(Relationship),
    /// A relationship involving at least one merged group.
    Merged(MergedRelationship),
}

impl GraphEdge {
    /// The raw relationship ultimately backing this edge.
    #[must_use]
    pub fn representative(&self) -> &Relationship {
        match self {
            Self::Direct(rel) => rel,
            Self::Merged(merged) => merged.representative(),
        }
    }
}

impl DependencySignal for GraphEdge {
    fn source(&self) -> &str {
        match self {
            Self::Direct(rel) => rel.source(),
            Self::Merged(merged) => merged.source(),
        }
    }

    fn target(&self) -> &str {
        match self {
            Self::Direct(rel) => rel.target(),
            Self::Merged(merged) => merged.target(),
        }
    }

    fn source_cardinality(&self) -> u64 {
        self.representative().source_cardinality()
    }

    fn target_cardinality(&self) -> u64 {
        self.representative().target_cardinality()
    }

    fn pair_cardinality(&self) -> u64 {
        self.representative().pair_cardinality()
    }

    fn source_mode(&self) -> Option<&str> {
        self.representative().source_mode()
    }

    fn target_mode(&self) -> Option<&str> {
        self.representative().target_mode()
    }

    fn source_null_count(&self) -> u64 {
        self.representative().source_null_count()
    }

    fn target_null_count(&self) -> u64 {
        self.representative().target_null_count()
    }

    fn penalty(&self) -> u64 {
        self.representative().penalty()
    }
}

/// Canonical display name for a merged group: sorted members joined by `", "`.
#[must_use]
pub fn canonical_group_name<S: AsRef<str>>(members: &[S]) -> String {
    let mut names: Vec<&str> = members.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();
    names.join(", ")
}

/// Stores one directed relationship per ordered column pair, plus merged-group
/// membership records.
#[derive(Clone, Debug, Default)]
pub struct RelationshipIndex {
    edges: HashMap<(String, String), GraphEdge>,
    members: BTreeMap<String, Vec<String>>,
}

impl RelationshipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `edge` under its ordered `(source, target)` pair, overwriting
    /// any prior entry for that pair.
    pub fn add(&mut self, edge: GraphEdge) {
        let key = (edge.source().to_owned(), edge.target().to_owned());
        self.edges.insert(key, edge);
    }

    /// Looks up the relationship for the ordered pair `(source, target)`.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingRelationship`] when no entry exists. This
    /// always indicates a programming-invariant violation in the caller.
    pub fn get(&self, source: &str, target: &str) -> Result<&GraphEdge> {
        self.edges
            .get(&(source.to_owned(), target.to_owned()))
            .ok_or_else(|| GraphError::MissingRelationship {
                source: source.to_owned(),
                target: target.to_owned(),
            })
    }

    /// Records that `members` now collectively form one logical group and
    /// returns the group's canonical name.
    ///
    /// The membership record is purely bookkeeping; the graph itself is not
    /// altered.
    pub fn merge_nodes(&mut self, members: &[String]) -> String {
        let name = canonical_group_name(members);
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        self.members.insert(name.clone(), sorted);
        name
    }

    /// Member columns of a registered merged group, sorted lexicographically.
    #[must_use]
    pub fn members_of(&self, name: &str) -> Option<&[String]> {
        self.members.get(name).map(Vec::as_slice)
    }

    /// All merged-group membership records, keyed by canonical group name.
    #[must_use]
    pub fn merged_members(&self) -> &BTreeMap<String, Vec<String>> {
        &self.members
    }

    /// Synthesizes the replacement edge between two (possibly singleton)
    /// groups once a node has been merged away.
    ///
    /// Each endpoint is expanded to its member list (falling back to the name
    /// itself when it is not a registered group) and the strongest
    /// relationship among every member-pair combination becomes the
    /// representative; the first candidate in member order wins ties. The
    /// resulting [`MergedRelationship`] is registered and returned.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingRelationship`] when some member pair was
    /// never added to the index.
    pub fn make_merged_relationship(&mut self, source: &str, target: &str) -> Result<GraphEdge> {
        let sources = self.expand(source);
        let targets = self.expand(target);

        let mut best: Option<(Relationship, f64)> = None;
        for source_member in &sources {
            for target_member in &targets {
                let candidate = self.get(source_member, target_member)?;
                let candidate_strength = strength::strength(candidate);
                let replaces = best
                    .as_ref()
                    .is_none_or(|(_, incumbent)| candidate_strength > *incumbent);
                if replaces {
                    best = Some((candidate.representative().clone(), candidate_strength));
                }
            }
        }

        let Some((representative, _)) = best else {
            return Err(GraphError::MissingRelationship {
                source: source.to_owned(),
                target: target.to_owned(),
            });
        };

        let edge = GraphEdge::Merged(MergedRelationship::new(
            source.to_owned(),
            target.to_owned(),
            representative,
        ));
        self.add(edge.clone());
        Ok(edge)
    }

    fn expand(&self, name: &str) -> Vec<String> {
        self.members
            .get(name)
            .cloned()
            .unwrap_or_else(|| vec![name.to_owned()])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::PairStatistics;

    fn direct(source: &str, target: &str, card: u64, pair: u64) -> GraphEdge {
        let stats = Arc::new(PairStatistics {
            c1: source.to_owned(),
            c2: target.to_owned(),
            card_c1: card,
            card_c2: 2,
            card_pair: pair,
            mode_c1: None,
            mode_c2: None,
            null_count_c1: 0,
            null_count_c2: 0,
            penalty_c1_c2: 0,
            penalty_c2_c1: 0,
        });
        GraphEdge::Direct(Relationship::forward(stats))
    }

    #[test]
    fn get_fails_for_unregistered_pair() {
        let index = RelationshipIndex::new();
        let err = index.get("a", "b").expect_err("nothing was added");
        assert!(matches!(
            err,
            GraphError::MissingRelationship { ref source, ref target }
                if source == "a" && target == "b"
        ));
    }

    #[test]
    fn add_overwrites_prior_entry_for_ordered_pair() {
        let mut index = RelationshipIndex::new();
        index.add(direct("a", "b", 1, 4));
        index.add(direct("a", "b", 3, 4));
        let edge = index.get("a", "b").expect("entry exists");
        assert_eq!(edge.source_cardinality(), 3);
    }

    #[test]
    fn merge_nodes_returns_sorted_canonical_name() {
        let mut index = RelationshipIndex::new();
        let name = index.merge_nodes(&["beta".to_owned(), "alpha".to_owned()]);
        assert_eq!(name, "alpha, beta");
        assert_eq!(
            index.members_of("alpha, beta"),
            Some(&["alpha".to_owned(), "beta".to_owned()][..])
        );
    }

    #[test]
    fn merged_relationship_selects_strongest_member_pair() {
        let mut index = RelationshipIndex::new();
        index.add(direct("a", "x", 1, 4)); // strength 0.25
        index.add(direct("b", "x", 3, 4)); // strength 0.75
        let group = index.merge_nodes(&["a".to_owned(), "b".to_owned()]);

        let edge = index
            .make_merged_relationship(&group, "x")
            .expect("member pairs are registered");
        assert_eq!(edge.source(), "a, b");
        assert_eq!(edge.target(), "x");
        assert_eq!(edge.representative().source(), "b");
    }

    #[test]
    fn merged_relationship_keeps_first_candidate_on_ties() {
        let mut index = RelationshipIndex::new();
        index.add(direct("a", "x", 2, 4));
        index.add(direct("b", "x", 2, 4));
        let group = index.merge_nodes(&["b".to_owned(), "a".to_owned()]);

        let edge = index
            .make_merged_relationship(&group, "x")
            .expect("member pairs are registered");
        assert_eq!(edge.representative().source(), "a");
    }

    #[test]
    fn merged_relationship_requires_every_member_pair() {
        let mut index = RelationshipIndex::new();
        index.add(direct("a", "x", 1, 4));
        let group = index.merge_nodes(&["a".to_owned(), "b".to_owned()]);
        let err = index
            .make_merged_relationship(&group, "x")
            .expect_err("(b, x) was never added");
        assert!(matches!(err, GraphError::MissingRelationship { .. }));
    }
}
