//! Pairwise column statistics consumed by the tree builder.
//!
//! A [`PairStatistics`] record is produced exactly once per unordered column
//! pair by an external statistics collaborator and is read-only thereafter.
//! The record itself carries no direction; directionality is layered on top by
//! [`crate::Relationship`].

/// Name of the synthetic root vertex injected into every dependency graph.
pub const ROOT_NAME: &str = "ROOT";

/// Aggregate statistics for one unordered column pair.
///
/// The ordering of `c1` and `c2` is arbitrary; both orientations of a
/// functional-dependency candidate are derived from the same record.
///
/// # Examples
/// ```
/// use trellis_core::PairStatistics;
///
/// let stats = PairStatistics {
///     c1: "city".into(),
///     c2: "country".into(),
///     card_c1: 40,
///     card_c2: 7,
///     card_pair: 40,
///     mode_c1: Some("london".into()),
///     mode_c2: Some("uk".into()),
///     null_count_c1: 0,
///     null_count_c2: 0,
///     penalty_c1_c2: 12,
///     penalty_c2_c1: 1,
/// };
/// assert_eq!(stats.card_pair, 40);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairStatistics {
    /// Name of the first column.
    pub c1: String,
    /// Name of the second column.
    pub c2: String,
    /// Number of distinct values of `c1`.
    pub card_c1: u64,
    /// Number of distinct values of `c2`.
    pub card_c2: u64,
    /// Number of distinct `(c1, c2)` pairs.
    pub card_pair: u64,
    /// Most frequent value of `c1`, if the column is not entirely null.
    pub mode_c1: Option<String>,
    /// Most frequent value of `c2`, if the column is not entirely null.
    pub mode_c2: Option<String>,
    /// Number of records where `c1` is null.
    pub null_count_c1: u64,
    /// Number of records where `c2` is null.
    pub null_count_c2: u64,
    /// Number of distinct `(c1, c2)` pairs where `c2` equals `mode_c2`.
    pub penalty_c1_c2: u64,
    /// Number of distinct `(c1, c2)` pairs where `c1` equals `mode_c1`.
    pub penalty_c2_c1: u64,
}

impl PairStatistics {
    /// Builds the degenerate record backing a synthetic `ROOT -> column` edge.
    ///
    /// All counts are zero; the strength model special-cases the root source,
    /// so these edges always evaluate to the strongest possible value and are
    /// retained in the final graph.
    ///
    /// # Examples
    /// ```
    /// use trellis_core::{PairStatistics, ROOT_NAME};
    ///
    /// let stats = PairStatistics::root_link("city");
    /// assert_eq!(stats.c1, ROOT_NAME);
    /// assert_eq!(stats.c2, "city");
    /// ```
    #[must_use]
    pub fn root_link(column: &str) -> Self {
        Self {
            c1: ROOT_NAME.to_owned(),
            c2: column.to_owned(),
            card_c1: 0,
            card_c2: 0,
            card_pair: 0,
            mode_c1: None,
            mode_c2: None,
            null_count_c1: 0,
            null_count_c2: 0,
            penalty_c1_c2: 0,
            penalty_c2_c1: 0,
        }
    }
}
