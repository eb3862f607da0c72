//! The strength model: scoring a directed functional-dependency candidate.
//!
//! The strength of `c1 -> c2` estimates how cleanly the value of `c1`
//! determines the value of `c2`, discounted by pairs where `c2` merely equals
//! its most frequent value:
//!
//! ```text
//!            card(c1) - penalty
//! strength = ------------------
//!            card(c1, c2) - penalty
//! ```
//!
//! where `penalty` counts the distinct `(c1, c2)` pairs in which `c2` is
//! modal. A perfect dependency scores `1.0`; a zero denominator carries no
//! usable signal and scores `0.0`.

use crate::{relationship::DependencySignal, stats::ROOT_NAME};

/// Minimum strength a relationship must reach to be retained as a graph edge.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.99;

/// Scores the dependency candidate described by `rel`.
///
/// Synthetic edges out of the root always score `1.0` so every column stays
/// reachable from the root regardless of its data-derived relationships.
///
/// # Examples
/// ```
/// use trellis_core::{PairStatistics, Relationship, strength};
/// use std::sync::Arc;
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
///     penalty_c1_c2: 5,
///     penalty_c2_c1: 0,
/// });
/// let (city_to_country, _) = Relationship::both(&stats);
/// assert!((strength::strength(&city_to_country) - 1.0).abs() < f64::EPSILON);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "the strength formula is defined over floating-point ratios"
)]
#[must_use]
pub fn strength<R: DependencySignal + ?Sized>(rel: &R) -> f64 {
    if rel.source() == ROOT_NAME {
        return 1.0;
    }

    let penalty = rel.penalty() as f64;
    let numerator = rel.source_cardinality() as f64 - penalty;
    let denominator = rel.pair_cardinality() as f64 - penalty;

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Is the source column null more often than the target column?
///
/// A column that is defined on fewer rows than its counterpart cannot be a
/// reliable determinant, so sparser sources are rejected by the acceptance
/// predicate.
#[must_use]
pub fn source_is_sparser<R: DependencySignal + ?Sized>(rel: &R) -> bool {
    rel.source_null_count() > rel.target_null_count()
}

/// The acceptance predicate applied before a relationship becomes an edge.
#[must_use]
pub fn is_accepted<R: DependencySignal + ?Sized>(rel: &R) -> bool {
    strength(rel) >= ACCEPTANCE_THRESHOLD && !source_is_sparser(rel)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::{PairStatistics, Relationship};

    fn stats(card_c1: u64, card_pair: u64, penalty_c1_c2: u64) -> Arc<PairStatistics> {
        Arc::new(PairStatistics {
            c1: "a".to_owned(),
            c2: "b".to_owned(),
            card_c1,
            card_c2: 3,
            card_pair,
            mode_c1: None,
            mode_c2: None,
            null_count_c1: 0,
            null_count_c2: 0,
            penalty_c1_c2,
            penalty_c2_c1: 0,
        })
    }

    #[rstest]
    #[case::perfect(40, 40, 0, 1.0)]
    #[case::penalised(40, 41, 12, 28.0 / 29.0)]
    #[case::weak(10, 40, 0, 0.25)]
    #[case::degenerate_denominator(0, 0, 0, 0.0)]
    #[case::penalty_consumes_pairs(5, 5, 5, 0.0)]
    fn strength_matches_formula(
        #[case] card_c1: u64,
        #[case] card_pair: u64,
        #[case] penalty: u64,
        #[case] expected: f64,
    ) {
        let rel = Relationship::forward(stats(card_c1, card_pair, penalty));
        assert!((strength(&rel) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn root_edges_always_score_one() {
        let rel = Relationship::forward(Arc::new(PairStatistics::root_link("a")));
        assert!((strength(&rel) - 1.0).abs() < f64::EPSILON);
        assert!(is_accepted(&rel));
    }

    #[test]
    fn sparser_source_is_rejected_even_when_strong() {
        let mut record = stats(40, 40, 0).as_ref().clone();
        record.null_count_c1 = 2;
        record.null_count_c2 = 1;
        let rel = Relationship::forward(Arc::new(record));
        assert!((strength(&rel) - 1.0).abs() < f64::EPSILON);
        assert!(source_is_sparser(&rel));
        assert!(!is_accepted(&rel));
    }

    #[test]
    fn acceptance_requires_threshold_strength() {
        let strong = Relationship::forward(stats(991, 1000, 0));
        let weak = Relationship::forward(stats(989, 1000, 0));
        assert!(is_accepted(&strong));
        assert!(!is_accepted(&weak));
    }
}
