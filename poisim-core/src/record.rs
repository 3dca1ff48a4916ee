//! Attribute values and the records that carry them.

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single attribute value held by a [`Record`].
///
/// Values are either absent (`Missing`), free text, or a number. A `Number`
/// holding NaN counts as missing; any other number compares through its
/// decimal string form.
///
/// # Examples
/// ```
/// use poisim_core::FieldValue;
///
/// assert!(FieldValue::Missing.is_missing());
/// assert!(FieldValue::Number(f64::NAN).is_missing());
/// assert_eq!(FieldValue::from("Cafe X").as_text().as_deref(), Some("Cafe X"));
/// assert_eq!(FieldValue::Number(42.0).as_text().as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    /// No value was recorded.
    #[default]
    Missing,
    /// A textual value, possibly empty.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl FieldValue {
    /// Report whether the value is absent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(_) => false,
            Self::Number(value) => value.is_nan(),
        }
    }

    /// Report whether the value is the empty string.
    #[must_use]
    pub const fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// String form used for comparisons, or `None` when missing.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Missing => None,
            Self::Text(text) => Some(Cow::Borrowed(text.as_str())),
            Self::Number(value) if value.is_nan() => None,
            Self::Number(value) => Some(Cow::Owned(value.to_string())),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("<missing>"),
        }
    }
}

/// One point of interest: an identifier, a canonical geometry and one value
/// per schema column.
///
/// Values are positional; their meaning comes from the
/// [`Schema`](crate::Schema) of the owning [`Dataset`](crate::Dataset).
///
/// # Examples
/// ```
/// use poisim_core::{FieldValue, Record};
///
/// let record = Record::new("1", "POINT (0 0)", vec!["Cafe X".into(), FieldValue::Missing]);
/// assert_eq!(record.id, "1");
/// assert_eq!(record.value(1), Some(&FieldValue::Missing));
/// assert_eq!(record.value(2), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    /// Identifier, unique within the owning dataset.
    pub id: String,
    /// Canonical geometry text.
    pub geometry: String,
    /// Attribute values in schema column order.
    pub values: Vec<FieldValue>,
}

impl Record {
    /// Construct a record from its parts.
    pub fn new(
        id: impl Into<String>,
        geometry: impl Into<String>,
        values: Vec<FieldValue>,
    ) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            values,
        }
    }

    /// Value at `index`, if the record has that many columns.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }
}
