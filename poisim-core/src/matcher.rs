//! Pair records across two datasets by geometry, optionally also by name.
//!
//! Every record of the driving dataset `a` is consumed. Each record of `b`
//! is consumed at most once: a matched `b` record leaves the pool of
//! candidates, so a later `a` record cannot claim it again. When several
//! candidates qualify, the earliest in `b`'s insertion order wins.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Dataset, DatasetError, FieldNames, FieldValue, Record, Schema};

/// What two records must share to be paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchKey {
    /// Equal canonical geometry.
    Geometry,
    /// Equal canonical geometry and equal name (exact, case-sensitive).
    ///
    /// A missing name never matches.
    GeometryAndName,
}

impl MatchKey {
    /// Index of the name column when this key needs one.
    ///
    /// # Errors
    /// Returns [`DatasetError::UnknownColumn`] when the key needs a name
    /// column and `schema` lacks it.
    pub fn name_column(
        self,
        schema: &Schema,
        fields: &FieldNames,
    ) -> Result<Option<usize>, DatasetError> {
        match self {
            Self::Geometry => Ok(None),
            Self::GeometryAndName => schema.require(&fields.name).map(Some),
        }
    }

    /// Report whether `a` and `b` satisfy this key.
    ///
    /// `name_index` locates the name column in both records.
    #[must_use]
    pub fn admits(self, a: &Record, b: &Record, name_index: Option<usize>) -> bool {
        if a.geometry != b.geometry {
            return false;
        }
        match self {
            Self::Geometry => true,
            Self::GeometryAndName => matches!(
                (record_name(a, name_index), record_name(b, name_index)),
                (Some(left), Some(right)) if left == right
            ),
        }
    }

    fn candidate_key(self, record: &Record, name_index: Option<usize>) -> Option<CandidateKey> {
        match self {
            Self::Geometry => Some((record.geometry.clone(), None)),
            Self::GeometryAndName => {
                let name = record_name(record, name_index)?;
                Some((record.geometry.clone(), Some(name.into_owned())))
            }
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry => f.write_str("geometry"),
            Self::GeometryAndName => f.write_str("geometry and name"),
        }
    }
}

type CandidateKey = (String, Option<String>);

fn record_name(record: &Record, name_index: Option<usize>) -> Option<std::borrow::Cow<'_, str>> {
    name_index
        .and_then(|index| record.value(index))
        .and_then(FieldValue::as_text)
}

/// A record of the driving dataset and its counterpart, if one was found.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry {
    /// Record from the driving dataset.
    pub a: Record,
    /// Matched record from the reference dataset.
    pub b: Option<Record>,
}

/// Result of [`match_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// One entry per driving record, in driving order.
    pub entries: Vec<MatchEntry>,
    /// Reference records that found no counterpart, in reference order.
    pub residual_b: Dataset,
}

impl MatchOutcome {
    /// Every driving record, matched or not.
    pub fn matched_a(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|entry| &entry.a)
    }

    /// Reference records that were paired, in pairing order.
    pub fn matched_b(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().filter_map(|entry| entry.b.as_ref())
    }

    /// Paired records as `(a, b)`.
    pub fn pairs(&self) -> impl Iterator<Item = (&Record, &Record)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.b.as_ref().map(|b| (&entry.a, b)))
    }

    /// Number of pairs formed.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.b.is_some()).count()
    }
}

/// Pair each record of `a` with the first still-available record of `b`
/// sharing its `key`.
///
/// Candidates are looked up through an index built once over `b`, holding
/// an ordered queue of positions per key, so the first-in-order tie-break is
/// preserved without rescanning.
///
/// # Errors
/// Returns [`DatasetError::UnknownColumn`] when `key` requires the name
/// column and either dataset lacks it.
///
/// # Examples
/// ```
/// use poisim_core::{Dataset, FieldNames, MatchKey, Record, Schema, match_records};
///
/// # fn main() -> Result<(), poisim_core::DatasetError> {
/// let schema = Schema::new(["name"])?;
/// let a = Dataset::new(schema.clone(), vec![Record::new("1", "POINT (0 0)", vec!["x".into()])])?;
/// let b = Dataset::new(
///     schema,
///     vec![
///         Record::new("8", "POINT (5 5)", vec!["y".into()]),
///         Record::new("9", "POINT (0 0)", vec!["x".into()]),
///     ],
/// )?;
/// let outcome = match_records(a, b, MatchKey::Geometry, &FieldNames::default())?;
/// assert_eq!(outcome.pair_count(), 1);
/// assert_eq!(outcome.residual_b.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn match_records(
    a: Dataset,
    b: Dataset,
    key: MatchKey,
    fields: &FieldNames,
) -> Result<MatchOutcome, DatasetError> {
    let name_a = key.name_column(a.schema(), fields)?;
    let name_b = key.name_column(b.schema(), fields)?;

    let (schema_b, records_b) = b.into_parts();
    let mut index: HashMap<CandidateKey, VecDeque<usize>> = HashMap::new();
    for (position, record) in records_b.iter().enumerate() {
        if let Some(candidate) = key.candidate_key(record, name_b) {
            index.entry(candidate).or_default().push_back(position);
        }
    }
    let mut available: Vec<Option<Record>> = records_b.into_iter().map(Some).collect();

    let driving = a.len();
    let mut entries = Vec::with_capacity(driving);
    for record in a {
        let partner = key
            .candidate_key(&record, name_a)
            .and_then(|candidate| index.get_mut(&candidate))
            .and_then(VecDeque::pop_front)
            .and_then(|position| available.get_mut(position))
            .and_then(Option::take);
        entries.push(MatchEntry {
            a: record,
            b: partner,
        });
    }

    let residual: Vec<Record> = available.into_iter().flatten().collect();
    let outcome = MatchOutcome {
        entries,
        residual_b: Dataset::from_validated(schema_b, residual),
    };
    debug!(
        "matched {} of {} records by {}; {} reference records left",
        outcome.pair_count(),
        driving,
        key,
        outcome.residual_b.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{poi, poi_dataset, poi_with};
    use rstest::rstest;

    fn ids<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<&'a str> {
        records.map(|record| record.id.as_str()).collect()
    }

    #[rstest]
    fn pairs_by_geometry() {
        let a = poi_dataset(vec![poi("1", "POINT (0 0)", "x"), poi("2", "POINT (1 1)", "y")]);
        let b = poi_dataset(vec![poi("9", "POINT (1 1)", "z"), poi("8", "POINT (0 0)", "w")]);

        let outcome =
            match_records(a, b, MatchKey::Geometry, &FieldNames::default()).expect("match");

        let pairs: Vec<(&str, &str)> = outcome
            .pairs()
            .map(|(left, right)| (left.id.as_str(), right.id.as_str()))
            .collect();
        assert_eq!(pairs, [("1", "8"), ("2", "9")]);
        assert!(outcome.residual_b.is_empty());
    }

    #[rstest]
    fn first_candidate_wins_and_others_stay_available() {
        let a = poi_dataset(vec![poi("1", "POINT (0 0)", "x"), poi("2", "POINT (0 0)", "x")]);
        let b = poi_dataset(vec![
            poi("7", "POINT (0 0)", "x"),
            poi("8", "POINT (0 0)", "x"),
            poi("9", "POINT (0 0)", "x"),
        ]);

        let outcome =
            match_records(a, b, MatchKey::GeometryAndName, &FieldNames::default()).expect("match");

        assert_eq!(ids(outcome.matched_b()), ["7", "8"]);
        assert_eq!(ids(outcome.residual_b.iter()), ["9"]);
    }

    #[rstest]
    fn unmatched_driving_records_are_still_consumed() {
        let a = poi_dataset(vec![poi("1", "POINT (0 0)", "x")]);
        let b = poi_dataset(vec![poi("9", "POINT (1 1)", "x")]);

        let outcome =
            match_records(a, b, MatchKey::Geometry, &FieldNames::default()).expect("match");

        assert_eq!(ids(outcome.matched_a()), ["1"]);
        assert_eq!(outcome.pair_count(), 0);
        assert_eq!(ids(outcome.residual_b.iter()), ["9"]);
    }

    #[rstest]
    #[case("Cafe X", "Cafe X", true)]
    #[case("Cafe X", "cafe x", false)]
    #[case("Cafe X", "Bar Y", false)]
    fn name_key_is_case_sensitive(#[case] left: &str, #[case] right: &str, #[case] paired: bool) {
        let a = poi_dataset(vec![poi("1", "POINT (0 0)", left)]);
        let b = poi_dataset(vec![poi("9", "POINT (0 0)", right)]);

        let outcome =
            match_records(a, b, MatchKey::GeometryAndName, &FieldNames::default()).expect("match");

        assert_eq!(outcome.pair_count() == 1, paired);
    }

    #[rstest]
    fn missing_names_never_match() {
        let a = poi_dataset(vec![poi_with("1", "POINT (0 0)", FieldValue::Missing, "", "")]);
        let b = poi_dataset(vec![poi_with("9", "POINT (0 0)", FieldValue::Missing, "", "")]);

        let outcome =
            match_records(a, b, MatchKey::GeometryAndName, &FieldNames::default()).expect("match");

        assert_eq!(outcome.pair_count(), 0);
        assert_eq!(outcome.residual_b.len(), 1);
    }

    #[rstest]
    fn empty_driving_dataset_leaves_reference_untouched() {
        let a = poi_dataset(Vec::new());
        let b = poi_dataset(vec![poi("9", "POINT (0 0)", "x")]);

        let outcome =
            match_records(a, b, MatchKey::Geometry, &FieldNames::default()).expect("match");

        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.residual_b.len(), 1);
    }

    #[rstest]
    fn empty_reference_dataset_matches_nothing() {
        let a = poi_dataset(vec![poi("1", "POINT (0 0)", "x")]);
        let b = poi_dataset(Vec::new());

        let outcome =
            match_records(a, b, MatchKey::Geometry, &FieldNames::default()).expect("match");

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.matched_b().count(), 0);
    }

    #[rstest]
    fn name_key_requires_a_name_column() {
        let fields = FieldNames {
            name: "title".into(),
            ..FieldNames::default()
        };
        let a = poi_dataset(Vec::new());
        let b = poi_dataset(Vec::new());

        let err = match_records(a, b, MatchKey::GeometryAndName, &fields).expect_err("no title");
        assert_eq!(
            err,
            DatasetError::UnknownColumn {
                column: "title".into()
            }
        );
    }

    #[rstest]
    fn admits_mirrors_the_name_rule() {
        let a = poi("1", "POINT (0 0)", "x");
        let b = poi("9", "POINT (0 0)", "x");
        let c = poi("8", "POINT (0 0)", "y");
        assert!(MatchKey::GeometryAndName.admits(&a, &b, Some(0)));
        assert!(!MatchKey::GeometryAndName.admits(&a, &c, Some(0)));
        assert!(MatchKey::Geometry.admits(&a, &c, None));
    }
}
