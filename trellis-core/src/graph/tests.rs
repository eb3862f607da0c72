//! Unit tests for graph preprocessing and longest-path assignment.

use std::sync::Arc;

use rstest::rstest;

use crate::{
    DependencyGraph, DependencySignal, GraphEdge, GraphError, PairStatistics, ROOT_NAME,
    Relationship,
};

/// Adds a directed edge whose forward strength is `card / pair` (no penalty).
fn add_edge(graph: &mut DependencyGraph, source: &str, target: &str, card: u64, pair: u64) {
    let stats = Arc::new(PairStatistics {
        c1: source.to_owned(),
        c2: target.to_owned(),
        card_c1: card,
        card_c2: 1,
        card_pair: pair,
        mode_c1: None,
        mode_c2: None,
        null_count_c1: 0,
        null_count_c2: 0,
        penalty_c1_c2: 0,
        penalty_c2_c1: 0,
    });
    graph.add_relationship(GraphEdge::Direct(Relationship::forward(stats)));
}

/// Adds a strength-1.0 edge in the given direction.
fn add_strong_edge(graph: &mut DependencyGraph, source: &str, target: &str) {
    add_edge(graph, source, target, 10, 10);
}

fn add_root_edges(graph: &mut DependencyGraph, columns: &[&str]) {
    for column in columns {
        let stats = Arc::new(PairStatistics::root_link(column));
        graph.add_relationship(GraphEdge::Direct(Relationship::forward(stats)));
    }
}

#[test]
fn add_relationship_creates_vertices_and_edge() {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "a", "b");
    assert!(graph.has_edge("a", "b"));
    assert!(!graph.has_edge("b", "a"));
    assert_eq!(graph.vertices(), vec!["a", "b"]);
    assert_eq!(graph.out_degree("a"), 1);
    assert_eq!(graph.in_degree("b"), 1);
}

#[test]
fn perfect_neighbour_overlap_is_classified_as_equivalence() {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "p", "q");
    add_strong_edge(&mut graph, "q", "p");
    for target in ["r", "s"] {
        add_strong_edge(&mut graph, "p", target);
        add_strong_edge(&mut graph, "q", target);
    }

    assert_eq!(
        graph.bidirectional_relationships(),
        vec![("p".to_owned(), "q".to_owned())]
    );
}

#[test]
fn mismatched_neighbour_sets_are_not_equivalent() {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "p", "q");
    add_strong_edge(&mut graph, "q", "p");
    for target in ["r", "s"] {
        add_strong_edge(&mut graph, "p", target);
        add_strong_edge(&mut graph, "q", target);
    }
    // p additionally determines t, which q does not.
    add_strong_edge(&mut graph, "p", "t");

    assert!(graph.bidirectional_relationships().is_empty());
}

#[test]
fn merge_nodes_collapses_equivalence_group() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["p", "q", "r", "s"]);
    add_strong_edge(&mut graph, "p", "q");
    add_strong_edge(&mut graph, "q", "p");
    for target in ["r", "s"] {
        add_strong_edge(&mut graph, "p", target);
        add_strong_edge(&mut graph, "q", target);
    }

    graph.merge_nodes().expect("merge must succeed");

    assert!(!graph.contains_vertex("p"));
    assert!(!graph.contains_vertex("q"));
    assert!(graph.contains_vertex("p, q"));
    assert!(graph.has_edge("p, q", "r"));
    assert!(graph.has_edge("p, q", "s"));
    assert!(graph.has_edge(ROOT_NAME, "p, q"));
    assert_eq!(graph.merged_columns(), vec!["p", "q"]);

    let edge = graph
        .relationship("p, q", "r")
        .expect("merged edge is registered");
    assert_eq!(edge.source(), "p, q");
}

#[test]
fn merge_nodes_without_equivalences_leaves_graph_unchanged() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["a", "b", "c"]);
    add_strong_edge(&mut graph, "a", "b");
    add_strong_edge(&mut graph, "b", "c");

    let before = graph.vertices().join("|");
    graph.merge_nodes().expect("merge must succeed");
    assert_eq!(graph.vertices().join("|"), before);
    assert!(graph.has_edge("a", "b"));
    assert!(graph.has_edge("b", "c"));
    assert!(graph.merged_columns().is_empty());
}

#[rstest]
#[case::lower_out_degree_loses(1, 3, false, true)]
#[case::higher_out_degree_keeps_its_edge(3, 1, true, false)]
fn break_cycles_removes_edge_from_weaker_vertex(
    #[case] extra_x: usize,
    #[case] extra_y: usize,
    #[case] x_to_y_survives: bool,
    #[case] y_to_x_survives: bool,
) {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "x", "y");
    add_strong_edge(&mut graph, "y", "x");
    for n in 0..extra_x {
        add_strong_edge(&mut graph, "x", &format!("x{n}"));
    }
    for n in 0..extra_y {
        add_strong_edge(&mut graph, "y", &format!("y{n}"));
    }

    graph.break_cycles();

    assert_eq!(graph.has_edge("x", "y"), x_to_y_survives);
    assert_eq!(graph.has_edge("y", "x"), y_to_x_survives);
}

#[test]
fn break_cycles_tie_removes_first_named_direction() {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "x", "y");
    add_strong_edge(&mut graph, "y", "x");
    for n in 0..2 {
        add_strong_edge(&mut graph, "x", &format!("x{n}"));
        add_strong_edge(&mut graph, "y", &format!("y{n}"));
    }
    assert_eq!(graph.out_degree("x"), 3);
    assert_eq!(graph.out_degree("y"), 3);

    graph.break_cycles();

    assert!(!graph.has_edge("x", "y"));
    assert!(graph.has_edge("y", "x"));
}

#[test]
fn break_cycles_leaves_no_two_cycles() {
    let mut graph = DependencyGraph::new();
    for (source, target) in [("a", "b"), ("b", "a"), ("b", "c"), ("c", "b"), ("a", "c")] {
        add_strong_edge(&mut graph, source, target);
    }

    graph.break_cycles();

    for vertex in graph.vertices() {
        for neighbour in graph.outgoing_neighbours(vertex) {
            assert!(
                !graph.has_edge(&neighbour, vertex),
                "two-cycle survived between {vertex} and {neighbour}"
            );
        }
    }
}

#[test]
fn longest_paths_follow_the_deepest_route() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["a", "b", "c"]);
    add_strong_edge(&mut graph, "a", "b");
    add_strong_edge(&mut graph, "b", "c");

    assert_eq!(graph.longest_path_length(ROOT_NAME).expect("acyclic"), 0);
    assert_eq!(graph.longest_path_length("a").expect("acyclic"), 1);
    assert_eq!(graph.longest_path_length("b").expect("acyclic"), 2);
    assert_eq!(graph.longest_path_length("c").expect("acyclic"), 3);
    assert_eq!(
        graph.longest_path_predecessor("c").expect("acyclic"),
        Some("b".to_owned())
    );
    assert_eq!(graph.longest_path_predecessor(ROOT_NAME).expect("acyclic"), None);
}

#[test]
fn equal_length_ties_resolve_by_strength() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["a", "b", "c"]);
    add_edge(&mut graph, "a", "c", 995, 1000); // strength 0.995
    add_edge(&mut graph, "b", "c", 999, 1000); // strength 0.999

    assert_eq!(
        graph.longest_path_predecessor("c").expect("acyclic"),
        Some("b".to_owned())
    );
}

#[test]
fn remaining_strength_ties_keep_first_source_in_name_order() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["a", "b", "c"]);
    add_edge(&mut graph, "b", "c", 999, 1000);
    add_edge(&mut graph, "a", "c", 999, 1000);

    assert_eq!(
        graph.longest_path_predecessor("c").expect("acyclic"),
        Some("a".to_owned())
    );
}

#[test]
fn longest_paths_reject_cyclic_graphs() {
    let mut graph = DependencyGraph::new();
    add_strong_edge(&mut graph, "a", "b");
    add_strong_edge(&mut graph, "b", "c");
    add_strong_edge(&mut graph, "c", "a");

    // No two-cycles, so cycle breaking has nothing to remove.
    graph.break_cycles();
    assert!(graph.has_cycle());

    let err = graph
        .longest_path_length("a")
        .expect_err("three-cycles are unsupported");
    assert_eq!(err, GraphError::RemainingCycle);
}

#[test]
fn longest_path_queries_reject_unknown_vertices() {
    let mut graph = DependencyGraph::new();
    add_root_edges(&mut graph, &["a"]);
    let err = graph
        .longest_path_length("missing")
        .expect_err("vertex was never added");
    assert!(matches!(err, GraphError::MissingVertex { ref vertex } if vertex == "missing"));
}
