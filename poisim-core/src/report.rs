//! Outcome of comparing two datasets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MatchKey;

/// Statistics for one matching pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassReport {
    /// Key used to pair records.
    pub key: MatchKey,
    /// Driving records entering the pass.
    pub records_a: usize,
    /// Reference records entering the pass.
    pub records_b: usize,
    /// Pairs formed.
    pub matched_pairs: usize,
    /// Reference records left without a counterpart.
    pub residual_b: usize,
    /// Change this pass made to the running score.
    pub score_delta: f64,
}

/// Final similarity between two datasets.
///
/// `normalized_score` is `raw_score / (2 * records_a)`. It is not clamped:
/// many unmatched reference records push it below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimilarityReport {
    /// Sum of both passes before normalisation.
    pub raw_score: f64,
    /// Raw score divided by twice the driving dataset size.
    pub normalized_score: f64,
    /// Size of the driving dataset before partitioning.
    pub records_a: usize,
    /// Size of the reference dataset before partitioning.
    pub records_b: usize,
    /// Pass over records with a unique geometry.
    pub unique_pass: PassReport,
    /// Pass over records sharing their geometry.
    pub duplicate_pass: PassReport,
}

impl SimilarityReport {
    /// Normalised score as a percentage rounded to one decimal place.
    ///
    /// Exact ties round to the even digit, so 6.25 reports as 6.2.
    ///
    /// # Examples
    /// ```
    /// use poisim_core::{MatchKey, PassReport, SimilarityReport};
    ///
    /// let pass = PassReport {
    ///     key: MatchKey::Geometry,
    ///     records_a: 0,
    ///     records_b: 0,
    ///     matched_pairs: 0,
    ///     residual_b: 0,
    ///     score_delta: 0.0,
    /// };
    /// let report = SimilarityReport {
    ///     raw_score: 2.0,
    ///     normalized_score: 2.0 / 3.0,
    ///     records_a: 3,
    ///     records_b: 3,
    ///     unique_pass: pass,
    ///     duplicate_pass: pass,
    /// };
    /// assert_eq!(report.percentage(), 66.7);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "percentages scale and round the normalised score"
    )]
    pub fn percentage(&self) -> f64 {
        let percent = self.normalized_score * 100.0;
        (percent * 10.0).round_ties_even() / 10.0
    }
}
