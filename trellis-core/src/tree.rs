//! The synthesized attribute tree.
//!
//! The tree maps each parent (the root, a raw column, or a merged-group
//! canonical name) to its ordered children, and retains the merged-group
//! membership records so later stages can resolve group names back to the
//! original columns. Downstream relation matching relies on the derived
//! queries here: [`AttributeTree::closure`], [`AttributeTree::is_descendant_of`]
//! and [`AttributeTree::resolve_owner`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;

use crate::stats::ROOT_NAME;

/// The rooted hierarchy of columns and merged groups produced by
/// [`crate::AttributeTreeBuilder`].
///
/// Every column observed in the input appears exactly once: as a tree node,
/// or as a member of exactly one merged-group node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeTree {
    children: BTreeMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    members: BTreeMap<String, Vec<String>>,
}

impl AttributeTree {
    pub(crate) fn new(
        children: BTreeMap<String, Vec<String>>,
        members: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut parents = HashMap::new();
        for (parent, child_list) in &children {
            for child in child_list {
                parents.insert(child.clone(), parent.clone());
            }
        }
        Self {
            children,
            parents,
            members,
        }
    }

    /// Name of the root node.
    #[must_use]
    pub fn root(&self) -> &str {
        ROOT_NAME
    }

    /// Children of `node` in deterministic order (empty for leaves and
    /// unknown names).
    #[must_use]
    pub fn children(&self, node: &str) -> &[String] {
        self.children.get(node).map_or(&[], Vec::as_slice)
    }

    /// Parent of `node`, or `None` for the root and unknown names.
    #[must_use]
    pub fn parent(&self, node: &str) -> Option<&str> {
        self.parents.get(node).map(String::as_str)
    }

    /// Every node of the tree (the root plus all children), sorted.
    #[must_use]
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: BTreeSet<&str> = self
            .children
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        nodes.insert(ROOT_NAME);
        nodes.into_iter().collect()
    }

    /// Member columns of a merged-group node, or `None` when `node` is not a
    /// merged group.
    #[must_use]
    pub fn group_members(&self, node: &str) -> Option<&[String]> {
        self.members.get(node).map(Vec::as_slice)
    }

    /// The set of original columns subsumed by `node`: its own columns (the
    /// node itself if raw, its members if merged) plus, recursively, those of
    /// all its descendants.
    ///
    /// The closure of the root is the full set of observed columns.
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
    /// let closure = tree.closure(tree.root());
    /// assert!(closure.contains("city"));
    /// assert!(closure.contains("country"));
    /// ```
    #[must_use]
    pub fn closure(&self, node: &str) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(members) = self.members.get(current) {
                columns.extend(members.iter().cloned());
            } else if current != ROOT_NAME {
                columns.insert(current.to_owned());
            }
            pending.extend(self.children(current).iter().map(String::as_str));
        }
        columns
    }

    /// Whether `node` sits below `ancestor` somewhere along the parent chain.
    ///
    /// A node is not its own descendant.
    #[must_use]
    pub fn is_descendant_of(&self, node: &str, ancestor: &str) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Maps a raw column back to the tree node that owns it: the column
    /// itself when it is a node, or the merged group that absorbed it.
    /// Returns `None` for names the tree has never seen.
    #[must_use]
    pub fn resolve_owner(&self, column: &str) -> Option<&str> {
        if column == ROOT_NAME || self.parents.contains_key(column) {
            return Some(self.node_name(column));
        }
        self.members
            .iter()
            .find(|(_, members)| members.iter().any(|member| member == column))
            .map(|(name, _)| name.as_str())
    }

    /// Renders the tree as text, one block per parent in depth-first order:
    /// a `PARENT:` line followed by the parent's children sorted by name.
    ///
    /// # Errors
    /// Propagates any failure of the underlying writer.
    pub fn render<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut pending: Vec<&str> = vec![ROOT_NAME];
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        while let Some(parent) = pending.pop() {
            if !seen.insert(parent) || !self.children.contains_key(parent) {
                continue;
            }
            writeln!(writer, "PARENT: {parent}")?;
            let mut child_names: Vec<&str> =
                self.children(parent).iter().map(String::as_str).collect();
            child_names.sort_unstable();
            for child in &child_names {
                writeln!(writer, "{child}")?;
            }
            writeln!(writer)?;
            for child in child_names.into_iter().rev() {
                pending.push(child);
            }
        }
        Ok(())
    }

    fn node_name(&self, column: &str) -> &str {
        if column == ROOT_NAME {
            return ROOT_NAME;
        }
        self.parents
            .get_key_value(column)
            .map_or(ROOT_NAME, |(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttributeTree {
        // ROOT -> [a, "p, q"]; a -> [b]; "p, q" -> [r]
        let mut children = BTreeMap::new();
        children.insert(
            ROOT_NAME.to_owned(),
            vec!["a".to_owned(), "p, q".to_owned()],
        );
        children.insert("a".to_owned(), vec!["b".to_owned()]);
        children.insert("p, q".to_owned(), vec!["r".to_owned()]);
        let mut members = BTreeMap::new();
        members.insert("p, q".to_owned(), vec!["p".to_owned(), "q".to_owned()]);
        AttributeTree::new(children, members)
    }

    #[test]
    fn parents_are_derived_from_child_lists() {
        let tree = sample();
        assert_eq!(tree.parent("a"), Some(ROOT_NAME));
        assert_eq!(tree.parent("b"), Some("a"));
        assert_eq!(tree.parent("r"), Some("p, q"));
        assert_eq!(tree.parent(ROOT_NAME), None);
    }

    #[test]
    fn closure_recurses_through_descendants_and_groups() {
        let tree = sample();
        let closure = tree.closure("p, q");
        let expected: BTreeSet<String> = ["p", "q", "r"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(closure, expected);

        let full = tree.closure(ROOT_NAME);
        assert_eq!(full.len(), 5);
        assert!(!full.contains(ROOT_NAME));
        assert!(!full.contains("p, q"));
    }

    #[test]
    fn ancestry_follows_the_parent_chain() {
        let tree = sample();
        assert!(tree.is_descendant_of("b", ROOT_NAME));
        assert!(tree.is_descendant_of("b", "a"));
        assert!(tree.is_descendant_of("r", "p, q"));
        assert!(!tree.is_descendant_of("a", "b"));
        assert!(!tree.is_descendant_of("a", "a"));
    }

    #[test]
    fn owners_resolve_to_nodes_or_absorbing_groups() {
        let tree = sample();
        assert_eq!(tree.resolve_owner("a"), Some("a"));
        assert_eq!(tree.resolve_owner("p"), Some("p, q"));
        assert_eq!(tree.resolve_owner("q"), Some("p, q"));
        assert_eq!(tree.resolve_owner("r"), Some("r"));
        assert_eq!(tree.resolve_owner("unknown"), None);
    }

    #[test]
    fn render_emits_parent_blocks_depth_first() {
        let tree = sample();
        let mut out = Vec::new();
        tree.render(&mut out).expect("writing to a vec cannot fail");
        let text = String::from_utf8(out).expect("rendered tree is utf-8");
        assert_eq!(
            text,
            "PARENT: ROOT\na\np, q\n\nPARENT: a\nb\n\nPARENT: p, q\nr\n\n"
        );
    }
}
