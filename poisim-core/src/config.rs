//! Field naming and penalty weighting used by matching and scoring.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CompareError;

const DEFAULT_ID_FIELD: &str = "id";
const DEFAULT_GEOMETRY_FIELD: &str = "WKT";
const DEFAULT_NAME_FIELD: &str = "name";
const DEFAULT_ADDRESS_FIELD: &str = "address";
const DEFAULT_PHONE_FIELD: &str = "phone";

/// Column names that carry a special role.
///
/// The identifier and geometry columns locate [`Record::id`](crate::Record)
/// and [`Record::geometry`](crate::Record) when loading; the name column keys
/// the duplicate-geometry pass; name, address and phone carry their own
/// penalty weights.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldNames {
    /// Unique identifier column.
    pub id: String,
    /// Geometry column.
    pub geometry: String,
    /// POI name column.
    pub name: String,
    /// Postal address column.
    pub address: String,
    /// Telephone column.
    pub phone: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_FIELD.to_owned(),
            geometry: DEFAULT_GEOMETRY_FIELD.to_owned(),
            name: DEFAULT_NAME_FIELD.to_owned(),
            address: DEFAULT_ADDRESS_FIELD.to_owned(),
            phone: DEFAULT_PHONE_FIELD.to_owned(),
        }
    }
}

/// Score adjustments applied while comparing two datasets.
///
/// # Examples
/// ```
/// use poisim_core::PenaltyWeights;
///
/// let weights = PenaltyWeights::default().with_override("opening_hours", 0.2);
/// assert_eq!(weights.name, 0.5);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PenaltyWeights {
    /// Penalty for a geometry disagreement.
    pub geometry: f64,
    /// Penalty for a name disagreement.
    pub name: f64,
    /// Penalty for an address disagreement.
    pub address: f64,
    /// Penalty for a phone disagreement.
    pub phone: f64,
    /// Penalty for a disagreement in any other column.
    pub other: f64,
    /// Bonus credited once per matched pair.
    pub match_bonus: f64,
    /// Penalty per reference-side record left unmatched by a pass.
    pub unmatched_penalty: f64,
    /// Explicit per-column penalties taking precedence over the above.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: BTreeMap<String, f64>,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            geometry: 1.0,
            name: 0.5,
            address: 0.3,
            phone: 0.1,
            other: 0.1,
            match_bonus: 1.0,
            unmatched_penalty: 0.5,
            overrides: BTreeMap::new(),
        }
    }
}

impl PenaltyWeights {
    /// Set an explicit penalty for `column`.
    #[must_use]
    pub fn with_override(mut self, column: impl Into<String>, weight: f64) -> Self {
        self.overrides.insert(column.into(), weight);
        self
    }

    /// Penalty applied when `column` disagrees.
    #[must_use]
    pub fn penalty_for(&self, column: &str, fields: &FieldNames) -> f64 {
        if let Some(weight) = self.overrides.get(column) {
            return *weight;
        }
        if column == fields.geometry {
            self.geometry
        } else if column == fields.name {
            self.name
        } else if column == fields.address {
            self.address
        } else if column == fields.phone {
            self.phone
        } else {
            self.other
        }
    }

    /// Reject non-finite weights.
    ///
    /// # Errors
    /// Returns [`CompareError::InvalidWeight`] naming the first offending
    /// weight.
    pub fn validate(&self) -> Result<(), CompareError> {
        let named = [
            ("geometry", self.geometry),
            ("name", self.name),
            ("address", self.address),
            ("phone", self.phone),
            ("other", self.other),
            ("match_bonus", self.match_bonus),
            ("unmatched_penalty", self.unmatched_penalty),
        ];
        let overrides = self
            .overrides
            .iter()
            .map(|(column, weight)| (column.as_str(), *weight));
        for (field, value) in named.into_iter().chain(overrides) {
            if !value.is_finite() {
                return Err(CompareError::InvalidWeight {
                    field: field.to_owned(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Inputs shared by every stage of [`compare`](crate::compare).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompareConfig {
    /// Column roles.
    pub fields: FieldNames,
    /// Score adjustments.
    pub weights: PenaltyWeights,
}
