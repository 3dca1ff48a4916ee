//! Score matched pairs by attribute agreement.
//!
//! Each pair earns the match bonus, then loses the penalty weight of every
//! field on which the two records disagree. The reference side (`b`) is the
//! authority being validated: a missing or empty value in `b` is always
//! forgiven, while a missing value in `a` alone is penalised.

use log::{debug, trace};

use crate::{FieldNames, FieldValue, MatchKey, PenaltyWeights, Record, Schema};

/// Report whether two values disagree and should cost a penalty.
///
/// Values agree when both are missing, when their string forms are equal
/// ignoring case, or when `b` is missing or the empty string.
///
/// # Examples
/// ```
/// use poisim_core::{FieldValue, is_penalised};
///
/// assert!(!is_penalised(&"Main St".into(), &"MAIN ST".into()));
/// assert!(!is_penalised(&"Main St".into(), &"".into()));
/// assert!(!is_penalised(&"Main St".into(), &FieldValue::Missing));
/// assert!(is_penalised(&FieldValue::Missing, &"Main St".into()));
/// assert!(is_penalised(&"Main St".into(), &"High St".into()));
/// ```
#[must_use]
pub fn is_penalised(a: &FieldValue, b: &FieldValue) -> bool {
    texts_disagree(a.as_text().as_deref(), b.as_text().as_deref())
}

fn texts_disagree(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (_, None | Some("")) => false,
        (None, Some(_)) => true,
        (Some(left), Some(right)) => left != right && left.to_lowercase() != right.to_lowercase(),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ColumnPenalty {
    column: String,
    weight: f64,
}

/// Weighted disagreement scorer bound to one schema.
///
/// # Examples
/// ```
/// use poisim_core::{FieldNames, MatchKey, PenaltyWeights, Record, Schema, Scorer};
///
/// # fn main() -> Result<(), poisim_core::DatasetError> {
/// let schema = Schema::new(["name", "address", "phone"])?;
/// let scorer = Scorer::new(&schema, &FieldNames::default(), &PenaltyWeights::default());
/// let a = Record::new("1", "POINT (0 0)", vec!["Cafe X".into(), "1 Main St".into(), "555-1111".into()]);
/// let b = Record::new("9", "POINT (0 0)", vec!["Cafe X".into(), "2 Main St".into(), "".into()]);
///
/// let score = scorer.score(0.0, [(&a, &b)], MatchKey::Geometry);
/// assert!((score - 0.7).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    geometry_penalty: f64,
    columns: Vec<ColumnPenalty>,
    match_bonus: f64,
    name_index: Option<usize>,
}

impl Scorer {
    /// Resolve penalty weights for every column of `schema`.
    #[must_use]
    pub fn new(schema: &Schema, fields: &FieldNames, weights: &PenaltyWeights) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|column| ColumnPenalty {
                column: column.clone(),
                weight: weights.penalty_for(column, fields),
            })
            .collect();
        Self {
            geometry_penalty: weights.penalty_for(&fields.geometry, fields),
            columns,
            match_bonus: weights.match_bonus,
            name_index: schema.position(&fields.name),
        }
    }

    /// Add the contribution of every pair satisfying `key` to `initial`.
    ///
    /// Pairs whose records do not satisfy `key` have no candidate and are
    /// skipped without bonus or penalty. The result is not normalised.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "scores accumulate floating-point bonuses and penalties"
    )]
    pub fn score<'r, I>(&self, initial: f64, pairs: I, key: MatchKey) -> f64
    where
        I: IntoIterator<Item = (&'r Record, &'r Record)>,
    {
        let mut running = initial;
        for (a, b) in pairs {
            if key.admits(a, b, self.name_index) {
                running += self.pair_delta(a, b);
            } else {
                debug!(
                    "skipping pair {} / {}: records do not share their {key}",
                    a.id, b.id
                );
            }
        }
        running
    }

    /// Bonus minus penalties for one pair, regardless of its match key.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "pair scores subtract floating-point penalties"
    )]
    pub fn pair_delta(&self, a: &Record, b: &Record) -> f64 {
        let mut delta = self.match_bonus;
        if texts_disagree(Some(&a.geometry), Some(&b.geometry)) {
            trace!("{} / {}: geometry differs", a.id, b.id);
            delta -= self.geometry_penalty;
        }
        for ((left, right), penalty) in a.values.iter().zip(&b.values).zip(&self.columns) {
            if is_penalised(left, right) {
                trace!(
                    "{} / {}: {} differs ({left} vs {right})",
                    a.id, b.id, penalty.column
                );
                delta -= penalty.weight;
            }
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{poi_schema, poi_with};
    use rstest::{fixture, rstest};

    const TOLERANCE: f64 = 1e-9;

    #[fixture]
    fn scorer() -> Scorer {
        Scorer::new(
            &poi_schema(),
            &FieldNames::default(),
            &PenaltyWeights::default(),
        )
    }

    #[rstest]
    #[case("1 Main St", "1 Main St", 0.0)]
    #[case("1 Main St", "1 MAIN ST", 0.0)]
    #[case("1 Main St", "", 0.0)]
    #[case("", "1 Main St", 0.3)]
    #[case("1 Main St", "2 Main St", 0.3)]
    #[expect(clippy::float_arithmetic, reason = "assertions compare score deltas")]
    fn address_penalties(
        scorer: Scorer,
        #[case] left: &str,
        #[case] right: &str,
        #[case] penalty: f64,
    ) {
        let a = poi_with("1", "POINT (0 0)", "Cafe X", left, "555");
        let b = poi_with("9", "POINT (0 0)", "Cafe X", right, "555");
        let delta = scorer.pair_delta(&a, &b);
        assert!((delta - (1.0 - penalty)).abs() < TOLERANCE, "got {delta}");
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "assertions compare score deltas")]
    fn missing_reference_value_is_forgiven(scorer: Scorer) {
        let a = poi_with("1", "POINT (0 0)", "Cafe X", "1 Main St", "555");
        let b = poi_with("9", "POINT (0 0)", "Cafe X", FieldValue::Missing, "555");
        assert!((scorer.pair_delta(&a, &b) - 1.0).abs() < TOLERANCE);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "assertions compare score deltas")]
    fn missing_driving_value_is_penalised(scorer: Scorer) {
        let a = poi_with("1", "POINT (0 0)", "Cafe X", FieldValue::Missing, "555");
        let b = poi_with("9", "POINT (0 0)", "Cafe X", "1 Main St", "555");
        assert!((scorer.pair_delta(&a, &b) - 0.7).abs() < TOLERANCE);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "assertions compare score deltas")]
    fn every_field_can_cost_its_weight(scorer: Scorer) {
        let a = poi_with("1", "POINT (0 0)", "Cafe X", "1 Main St", "555");
        let b = poi_with("9", "POINT (1 1)", "Bar Y", "2 Main St", "666");
        let expected = 1.0 - 1.0 - 0.5 - 0.3 - 0.1;
        assert!((scorer.pair_delta(&a, &b) - expected).abs() < TOLERANCE);
    }

    #[rstest]
    #[case(FieldValue::Number(42.0), FieldValue::from("42"), false)]
    #[case(FieldValue::Number(42.5), FieldValue::from("42"), true)]
    #[case(FieldValue::from("42"), FieldValue::Number(f64::NAN), false)]
    #[case(FieldValue::Number(f64::NAN), FieldValue::from("42"), true)]
    #[case(FieldValue::Missing, FieldValue::Number(f64::NAN), false)]
    fn numbers_compare_by_string_form(
        #[case] left: FieldValue,
        #[case] right: FieldValue,
        #[case] expected: bool,
    ) {
        assert_eq!(is_penalised(&left, &right), expected);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "assertions compare scores")]
    fn pairs_failing_the_key_are_skipped(scorer: Scorer) {
        let a = poi_with("1", "POINT (0 0)", "Cafe X", "", "");
        let b = poi_with("9", "POINT (0 0)", "Bar Y", "", "");
        let score = scorer.score(2.0, [(&a, &b)], MatchKey::GeometryAndName);
        assert!((score - 2.0).abs() < TOLERANCE);
        let by_geometry = scorer.score(2.0, [(&a, &b)], MatchKey::Geometry);
        assert!((by_geometry - 2.5).abs() < TOLERANCE);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "assertions compare scores")]
    fn overrides_change_generic_columns() {
        let schema = Schema::new(["name", "website"]).expect("valid schema");
        let weights = PenaltyWeights::default().with_override("website", 0.25);
        let scorer = Scorer::new(&schema, &FieldNames::default(), &weights);
        let a = Record::new("1", "POINT (0 0)", vec!["x".into(), "a.example".into()]);
        let b = Record::new("9", "POINT (0 0)", vec!["x".into(), "b.example".into()]);
        assert!((scorer.pair_delta(&a, &b) - 0.75).abs() < TOLERANCE);
    }
}
