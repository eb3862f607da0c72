//! Shared test fixtures used across trellis crates.

pub mod stats {
    //! Builders for [`PairStatistics`] records with sensible test defaults.

    use trellis_core::PairStatistics;

    /// Fluent builder over a [`PairStatistics`] record.
    ///
    /// Defaults describe a pair with no signal: zero cardinalities, no
    /// modes, no nulls, no penalties. Tests override only what matters.
    #[derive(Clone, Debug)]
    pub struct PairStatsBuilder {
        record: PairStatistics,
    }

    /// Starts a builder for the unordered pair `(c1, c2)`.
    ///
    /// # Examples
    /// ```
    /// use trellis_test_support::stats::pair;
    ///
    /// let record = pair("city", "country")
    ///     .cardinalities(40, 7)
    ///     .pair_cardinality(40)
    ///     .build();
    /// assert_eq!(record.card_pair, 40);
    /// ```
    #[must_use]
    pub fn pair(c1: &str, c2: &str) -> PairStatsBuilder {
        PairStatsBuilder {
            record: PairStatistics {
                c1: c1.to_owned(),
                c2: c2.to_owned(),
                card_c1: 0,
                card_c2: 0,
                card_pair: 0,
                mode_c1: None,
                mode_c2: None,
                null_count_c1: 0,
                null_count_c2: 0,
                penalty_c1_c2: 0,
                penalty_c2_c1: 0,
            },
        }
    }

    impl PairStatsBuilder {
        /// Sets the distinct-value counts of both columns.
        #[must_use]
        pub fn cardinalities(mut self, card_c1: u64, card_c2: u64) -> Self {
            self.record.card_c1 = card_c1;
            self.record.card_c2 = card_c2;
            self
        }

        /// Sets the distinct `(c1, c2)` pair count.
        #[must_use]
        pub fn pair_cardinality(mut self, card_pair: u64) -> Self {
            self.record.card_pair = card_pair;
            self
        }

        /// Sets the most frequent value of each column.
        #[must_use]
        pub fn modes(mut self, mode_c1: &str, mode_c2: &str) -> Self {
            self.record.mode_c1 = Some(mode_c1.to_owned());
            self.record.mode_c2 = Some(mode_c2.to_owned());
            self
        }

        /// Sets the null counts of both columns.
        #[must_use]
        pub fn null_counts(mut self, null_count_c1: u64, null_count_c2: u64) -> Self {
            self.record.null_count_c1 = null_count_c1;
            self.record.null_count_c2 = null_count_c2;
            self
        }

        /// Sets both directed penalties.
        #[must_use]
        pub fn penalties(mut self, penalty_c1_c2: u64, penalty_c2_c1: u64) -> Self {
            self.record.penalty_c1_c2 = penalty_c1_c2;
            self.record.penalty_c2_c1 = penalty_c2_c1;
            self
        }

        /// Finishes the record.
        #[must_use]
        pub fn build(self) -> PairStatistics {
            self.record
        }
    }

    /// A record whose `source -> target` orientation scores a perfect 1.0
    /// while the reverse stays well under the acceptance threshold.
    #[must_use]
    pub fn perfect_fd(source: &str, target: &str) -> PairStatistics {
        pair(source, target)
            .cardinalities(9, 3)
            .pair_cardinality(9)
            .build()
    }

    /// A record that scores 1.0 in both orientations, as produced by two
    /// columns in perfect one-to-one correspondence.
    #[must_use]
    pub fn mutual_fd(left: &str, right: &str) -> PairStatistics {
        pair(left, right).cardinalities(9, 9).pair_cardinality(9).build()
    }

    /// A strong but imperfect record: `source -> target` scores just above
    /// the acceptance threshold with the given strength numerator and
    /// denominator.
    #[must_use]
    pub fn graded_fd(source: &str, target: &str, card: u64, card_pair: u64) -> PairStatistics {
        pair(source, target)
            .cardinalities(card, 1)
            .pair_cardinality(card_pair)
            .build()
    }

    /// A record undercut by its mode: the raw ratio (100/101) clears the
    /// acceptance threshold, but half the pairs involve the target's most
    /// frequent value and the discounted ratio (50/51) does not.
    #[must_use]
    pub fn mode_dominated_fd(source: &str, target: &str) -> PairStatistics {
        pair(source, target)
            .cardinalities(100, 4)
            .pair_cardinality(101)
            .modes("v0", "v1")
            .penalties(50, 0)
            .build()
    }

    /// A perfect dependency whose source is null more often than its target,
    /// so the acceptance predicate rejects it regardless of strength.
    #[must_use]
    pub fn sparse_source_fd(source: &str, target: &str) -> PairStatistics {
        pair(source, target)
            .cardinalities(9, 3)
            .pair_cardinality(9)
            .null_counts(4, 1)
            .build()
    }
}
