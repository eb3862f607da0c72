//! Trellis core library.
//!
//! Infers a hierarchical schema decomposition for a flat, denormalized
//! dataset from pairwise functional-dependency statistics. Each statistics
//! record is scored in both directions by the strength model; accepted
//! candidates populate a directed dependency graph, which is preprocessed in
//! strictly ordered phases (collapse bidirectional equivalences, break
//! residual two-cycles) before a longest-path assignment turns it into a
//! single rooted attribute tree. The whole pipeline is a deterministic pure
//! function of its input records.

mod builder;
mod error;
mod graph;
mod index;
mod relationship;
mod stats;
pub mod strength;
mod tree;

pub use crate::{
    builder::AttributeTreeBuilder,
    error::{GraphError, GraphErrorCode, RelationshipError, RelationshipErrorCode, Result},
    graph::DependencyGraph,
    index::{GraphEdge, RelationshipIndex, canonical_group_name},
    relationship::{DependencySignal, MergedRelationship, Relationship},
    stats::{PairStatistics, ROOT_NAME},
    tree::AttributeTree,
};
