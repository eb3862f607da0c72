//! Error types for the trellis core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::error::Error as StdError;
use std::fmt;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::Relationship`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RelationshipError {
    /// The requested orientation matched neither column order of the
    /// underlying statistics record.
    MismatchedColumns {
        /// Source column requested by the caller.
        source: String,
        /// Target column requested by the caller.
        target: String,
        /// First column recorded in the statistics.
        stats_c1: String,
        /// Second column recorded in the statistics.
        stats_c2: String,
    },
}

// Implemented by hand rather than via `thiserror`: the derive treats any
// field named `source` as the error's cause, but here `source` is a column
// name, so the derive does not compile against these variants.
impl fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedColumns {
                source,
                target,
                stats_c1,
                stats_c2,
            } => write!(
                f,
                "relationship ({source}, {target}) does not match statistics for \
                 ({stats_c1}, {stats_c2})"
            ),
        }
    }
}

impl StdError for RelationshipError {}

define_error_codes! {
    /// Stable codes describing [`RelationshipError`] variants.
    enum RelationshipErrorCode for RelationshipError {
        /// The requested orientation matched neither column order of the
        /// underlying statistics record.
        MismatchedColumns => MismatchedColumns { .. } => "RELATIONSHIP_MISMATCHED_COLUMNS",
    }
}

/// An error produced while building or querying the dependency graph.
///
/// Every variant signals a deterministic, non-recoverable condition: the graph
/// is a pure function of its input statistics, so a failure reproduces exactly
/// given the same input set.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GraphError {
    /// A relationship was requested for an ordered pair that was never added.
    /// This is always a programming-invariant violation, never a recoverable
    /// runtime condition.
    MissingRelationship {
        /// Source column of the requested ordered pair.
        source: String,
        /// Target column of the requested ordered pair.
        target: String,
    },
    /// A vertex other than the root had no incoming edges after root
    /// synthesis, indicating a defect in graph population.
    MalformedGraph {
        /// Vertex that violated the root invariant.
        vertex: String,
    },
    /// A longest-path query referenced a vertex that is not in the graph.
    MissingVertex {
        /// Name supplied by the caller.
        vertex: String,
    },
    /// A cycle survived merging and cycle breaking. Longest paths over cyclic
    /// graphs would require a brute-force search, which is not implemented.
    RemainingCycle,
}

// Implemented by hand rather than via `thiserror`: the derive treats any
// field named `source` as the error's cause, but `MissingRelationship`'s
// `source` is a column name, so the derive does not compile against it.
impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRelationship { source, target } => {
                write!(f, "no relationship registered for ({source}, {target})")
            }
            Self::MalformedGraph { vertex } => {
                write!(f, "vertex `{vertex}` has no incoming edges but is not the root")
            }
            Self::MissingVertex { vertex } => {
                write!(f, "vertex `{vertex}` is not present in the dependency graph")
            }
            Self::RemainingCycle => f.write_str(
                "the dependency graph still contains a cycle after merging and cycle \
                 breaking; longest paths over cyclic graphs are not implemented",
            ),
        }
    }
}

impl StdError for GraphError {}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A relationship was requested for an ordered pair that was never added.
        MissingRelationship => MissingRelationship { .. } => "GRAPH_MISSING_RELATIONSHIP",
        /// A non-root vertex had no incoming edges after root synthesis.
        MalformedGraph => MalformedGraph { .. } => "GRAPH_MALFORMED",
        /// A longest-path query referenced an unknown vertex.
        MissingVertex => MissingVertex { .. } => "GRAPH_MISSING_VERTEX",
        /// A cycle survived merging and cycle breaking.
        RemainingCycle => RemainingCycle => "GRAPH_REMAINING_CYCLE",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
