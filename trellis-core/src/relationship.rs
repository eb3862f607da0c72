//! Directed views over pairwise statistics.
//!
//! A [`Relationship`] orients one [`PairStatistics`] record to model the
//! functional-dependency candidate `source -> target`. Two relationships (one
//! per orientation) exist for every record; both share the record via
//! [`Arc`] rather than duplicating storage.
//!
//! Merged groups produced during graph preprocessing are represented by
//! [`MergedRelationship`], which displays group names while forwarding every
//! numeric accessor to a chosen representative relationship. The
//! [`DependencySignal`] trait is the explicit interface both implement.

use std::sync::Arc;

use crate::{error::RelationshipError, stats::PairStatistics};

/// The operations every graph edge must support, whether it connects raw
/// columns or merged groups.
///
/// Accessors are oriented: `source` determines `target`, and the penalty is
/// the one computed for that direction.
pub trait DependencySignal {
    /// Determinant column (or group) of the candidate dependency.
    fn source(&self) -> &str;
    /// Dependent column (or group) of the candidate dependency.
    fn target(&self) -> &str;
    /// Number of distinct values of the source column.
    fn source_cardinality(&self) -> u64;
    /// Number of distinct values of the target column.
    fn target_cardinality(&self) -> u64;
    /// Number of distinct `(source, target)` pairs.
    fn pair_cardinality(&self) -> u64;
    /// Most frequent value of the source column.
    fn source_mode(&self) -> Option<&str>;
    /// Most frequent value of the target column.
    fn target_mode(&self) -> Option<&str>;
    /// Number of records where the source column is null.
    fn source_null_count(&self) -> u64;
    /// Number of records where the target column is null.
    fn target_null_count(&self) -> u64;
    /// Number of distinct pairs where the target column equals its mode.
    fn penalty(&self) -> u64;
}

/// Which way a [`Relationship`] reads its statistics record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Orientation {
    /// `source = c1`, `target = c2`.
    Forward,
    /// `source = c2`, `target = c1`.
    Reverse,
}

/// A directed functional-dependency candidate between two columns.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use trellis_core::{DependencySignal, PairStatistics, Relationship};
///
/// let stats = Arc::new(PairStatistics {
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
/// let rel = Relationship::new("country", "city", Arc::clone(&stats))
///     .expect("columns match the record");
/// assert_eq!(rel.source(), "country");
/// assert_eq!(rel.source_cardinality(), 7);
/// ```
#[derive(Clone, Debug)]
pub struct Relationship {
    stats: Arc<PairStatistics>,
    orientation: Orientation,
}

impl Relationship {
    /// Orients `stats` so that `source` determines `target`.
    ///
    /// # Errors
    /// Returns [`RelationshipError::MismatchedColumns`] when the requested
    /// endpoints match neither orientation of the record. This aborts at
    /// construction time; a relationship never exists in a mismatched state.
    pub fn new(
        source: &str,
        target: &str,
        stats: Arc<PairStatistics>,
    ) -> Result<Self, RelationshipError> {
        let orientation = if stats.c1 == source && stats.c2 == target {
            Orientation::Forward
        } else if stats.c1 == target && stats.c2 == source {
            Orientation::Reverse
        } else {
            return Err(RelationshipError::MismatchedColumns {
                source: source.to_owned(),
                target: target.to_owned(),
                stats_c1: stats.c1.clone(),
                stats_c2: stats.c2.clone(),
            });
        };
        Ok(Self { stats, orientation })
    }

    /// Builds the relationship reading the record in `c1 -> c2` order.
    #[must_use]
    pub fn forward(stats: Arc<PairStatistics>) -> Self {
        Self {
            stats,
            orientation: Orientation::Forward,
        }
    }

    /// Builds the relationship reading the record in `c2 -> c1` order.
    #[must_use]
    pub fn reverse(stats: Arc<PairStatistics>) -> Self {
        Self {
            stats,
            orientation: Orientation::Reverse,
        }
    }

    /// Builds both orientations over one shared record.
    #[must_use]
    pub fn both(stats: &Arc<PairStatistics>) -> (Self, Self) {
        (
            Self::forward(Arc::clone(stats)),
            Self::reverse(Arc::clone(stats)),
        )
    }

    /// The shared statistics record backing this relationship.
    #[must_use]
    pub fn statistics(&self) -> &PairStatistics {
        &self.stats
    }
}

impl DependencySignal for Relationship {
    fn source(&self) -> &str {
        match self.orientation {
            Orientation::Forward => &self.stats.c1,
            Orientation::Reverse => &self.stats.c2,
        }
    }

    fn target(&self) -> &str {
        match self.orientation {
            Orientation::Forward => &self.stats.c2,
            Orientation::Reverse => &self.stats.c1,
        }
    }

    fn source_cardinality(&self) -> u64 {
        match self.orientation {
            Orientation::Forward => self.stats.card_c1,
            Orientation::Reverse => self.stats.card_c2,
        }
    }

    fn target_cardinality(&self) -> u64 {
        match self.orientation {
            Orientation::Forward => self.stats.card_c2,
            Orientation::Reverse => self.stats.card_c1,
        }
    }

    fn pair_cardinality(&self) -> u64 {
        self.stats.card_pair
    }

    fn source_mode(&self) -> Option<&str> {
        match self.orientation {
            Orientation::Forward => self.stats.mode_c1.as_deref(),
            Orientation::Reverse => self.stats.mode_c2.as_deref(),
        }
    }

    fn target_mode(&self) -> Option<&str> {
        match self.orientation {
            Orientation::Forward => self.stats.mode_c2.as_deref(),
            Orientation::Reverse => self.stats.mode_c1.as_deref(),
        }
    }

    fn source_null_count(&self) -> u64 {
        match self.orientation {
            Orientation::Forward => self.stats.null_count_c1,
            Orientation::Reverse => self.stats.null_count_c2,
        }
    }

    fn target_null_count(&self) -> u64 {
        match self.orientation {
            Orientation::Forward => self.stats.null_count_c2,
            Orientation::Reverse => self.stats.null_count_c1,
        }
    }

    fn penalty(&self) -> u64 {
        match self.orientation {
            Orientation::Forward => self.stats.penalty_c1_c2,
            Orientation::Reverse => self.stats.penalty_c2_c1,
        }
    }
}

/// A relationship whose endpoints are merged groups of columns.
///
/// The displayed endpoint names are comma-joined sorted member lists; all
/// numeric behaviour is forwarded to the representative relationship chosen
/// by [`crate::RelationshipIndex::make_merged_relationship`].
#[derive(Clone, Debug)]
pub struct MergedRelationship {
    source: String,
    target: String,
    representative: Relationship,
}

impl MergedRelationship {
    pub(crate) fn new(source: String, target: String, representative: Relationship) -> Self {
        Self {
            source,
            target,
            representative,
        }
    }

    /// The underlying relationship this group edge delegates to.
    #[must_use]
    pub fn representative(&self) -> &Relationship {
        &self.representative
    }
}

impl DependencySignal for MergedRelationship {
    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn source_cardinality(&self) -> u64 {
        self.representative.source_cardinality()
    }

    fn target_cardinality(&self) -> u64 {
        self.representative.target_cardinality()
    }

    fn pair_cardinality(&self) -> u64 {
        self.representative.pair_cardinality()
    }

    fn source_mode(&self) -> Option<&str> {
        self.representative.source_mode()
    }

    fn target_mode(&self) -> Option<&str> {
        self.representative.target_mode()
    }

    fn source_null_count(&self) -> u64 {
        self.representative.source_null_count()
    }

    fn target_null_count(&self) -> u64 {
        self.representative.target_null_count()
    }

    fn penalty(&self) -> u64 {
        self.representative.penalty()
    }
}
