//! Ordered record collections sharing one attribute schema.
//!
//! A [`Dataset`] preserves insertion order. Matching resolves ties by that
//! order, so two runs over the same input always agree.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DatasetError, Record};

/// Ordered attribute column names shared by every record of a dataset.
///
/// The identifier and geometry are held on [`Record`] directly and are not
/// part of the schema.
///
/// # Examples
/// ```
/// use poisim_core::Schema;
///
/// # fn main() -> Result<(), poisim_core::DatasetError> {
/// let schema = Schema::new(["name", "address", "phone"])?;
/// assert_eq!(schema.position("address"), Some(1));
/// assert!(Schema::new(["name", "name"]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Validate and construct a schema.
    ///
    /// # Errors
    /// Returns [`DatasetError::DuplicateColumn`] when a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for column in &names {
            if !seen.insert(column.as_str()) {
                return Err(DatasetError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self { columns: names })
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of `column`, if present.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Index of `column`.
    ///
    /// # Errors
    /// Returns [`DatasetError::UnknownColumn`] when the column is absent.
    pub fn require(&self, column: &str) -> Result<usize, DatasetError> {
        self.position(column)
            .ok_or_else(|| DatasetError::UnknownColumn {
                column: column.to_owned(),
            })
    }

    /// Number of columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// Report whether the schema has no columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check that `other` holds exactly the same set of columns.
    ///
    /// Column order is ignored; see [`Dataset::reproject`].
    ///
    /// # Errors
    /// Returns [`DatasetError::SchemaMismatch`] listing the columns of `self`
    /// missing from `other` and the columns of `other` absent from `self`.
    pub fn ensure_same_columns(&self, other: &Self) -> Result<(), DatasetError> {
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|column| other.position(column).is_none())
            .cloned()
            .collect();
        let unexpected: Vec<String> = other
            .columns
            .iter()
            .filter(|column| self.position(column).is_none())
            .cloned()
            .collect();
        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(DatasetError::SchemaMismatch {
                missing,
                unexpected,
            })
        }
    }
}

/// An ordered collection of [`Record`]s with unique identifiers.
///
/// # Examples
/// ```
/// use poisim_core::{Dataset, Record, Schema};
///
/// # fn main() -> Result<(), poisim_core::DatasetError> {
/// let schema = Schema::new(["name"])?;
/// let dataset = Dataset::new(
///     schema,
///     vec![
///         Record::new("1", "POINT (0 0)", vec!["Cafe X".into()]),
///         Record::new("2", "POINT (1 1)", vec!["Bar Y".into()]),
///     ],
/// )?;
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.get("2").map(|r| r.geometry.as_str()), Some("POINT (1 1)"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Validate and construct a dataset.
    ///
    /// # Errors
    /// Returns [`DatasetError::DuplicateId`] when identifiers repeat and
    /// [`DatasetError::FieldCountMismatch`] when a record's value count
    /// differs from the schema's column count.
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self, DatasetError> {
        {
            let mut seen = HashSet::with_capacity(records.len());
            for record in &records {
                if record.values.len() != schema.len() {
                    return Err(DatasetError::FieldCountMismatch {
                        id: record.id.clone(),
                        expected: schema.len(),
                        found: record.values.len(),
                    });
                }
                if !seen.insert(record.id.as_str()) {
                    return Err(DatasetError::DuplicateId {
                        id: record.id.clone(),
                    });
                }
            }
        }
        Ok(Self { schema, records })
    }

    /// An empty dataset over `schema`.
    #[must_use]
    pub const fn empty(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Build from parts already known to satisfy the invariants, such as a
    /// subset of a validated dataset.
    pub(crate) const fn from_validated(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// The attribute schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Report whether the dataset holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into schema and records.
    #[must_use]
    pub fn into_parts(self) -> (Schema, Vec<Record>) {
        (self.schema, self.records)
    }

    /// Replace every record's geometry with the output of `rewrite`.
    ///
    /// Identifiers, values and order are untouched, so the dataset stays
    /// valid.
    ///
    /// # Errors
    /// Returns the first error produced by `rewrite`.
    pub fn try_map_geometry<E, F>(mut self, mut rewrite: F) -> Result<Self, E>
    where
        F: FnMut(&Record) -> Result<String, E>,
    {
        for record in &mut self.records {
            record.geometry = rewrite(record)?;
        }
        Ok(self)
    }

    /// Reorder every record's values to follow `target`'s column order.
    ///
    /// # Errors
    /// Returns [`DatasetError::SchemaMismatch`] when `target` does not hold
    /// the same set of columns.
    pub fn reproject(self, target: &Schema) -> Result<Self, DatasetError> {
        if self.schema == *target {
            return Ok(self);
        }
        target.ensure_same_columns(&self.schema)?;
        let order = target
            .columns()
            .iter()
            .map(|column| self.schema.require(column))
            .collect::<Result<Vec<usize>, DatasetError>>()?;
        let records = self
            .records
            .into_iter()
            .map(|mut record| {
                let mut values = std::mem::take(&mut record.values);
                record.values = order
                    .iter()
                    .map(|&index| values.get_mut(index).map(std::mem::take).unwrap_or_default())
                    .collect();
                record
            })
            .collect();
        Ok(Self::from_validated(target.clone(), records))
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
