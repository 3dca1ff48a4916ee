//! Split a dataset by geometry uniqueness.

use std::collections::HashMap;

use log::debug;

use crate::Dataset;

/// The two halves produced by [`partition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Records whose geometry occurs exactly once.
    pub unique: Dataset,
    /// Records sharing their geometry with at least one other record.
    pub duplicate: Dataset,
}

/// Split `dataset` into unique-geometry and shared-geometry records.
///
/// Geometries are grouped by exact string equality, so callers should pass
/// canonicalized geometry. Every record lands in exactly one half and each
/// half keeps the input order.
///
/// # Examples
/// ```
/// use poisim_core::{Dataset, Record, Schema, partition};
///
/// # fn main() -> Result<(), poisim_core::DatasetError> {
/// let dataset = Dataset::new(
///     Schema::new(["name"])?,
///     vec![
///         Record::new("1", "POINT (0 0)", vec!["a".into()]),
///         Record::new("2", "POINT (1 1)", vec!["b".into()]),
///         Record::new("3", "POINT (0 0)", vec!["c".into()]),
///     ],
/// )?;
/// let halves = partition(dataset);
/// assert_eq!(halves.unique.len(), 1);
/// assert_eq!(halves.duplicate.len(), 2);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn partition(dataset: Dataset) -> Partition {
    let shared: Vec<bool> = {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &dataset {
            *counts.entry(record.geometry.as_str()).or_default() += 1;
        }
        dataset
            .iter()
            .map(|record| {
                counts
                    .get(record.geometry.as_str())
                    .is_some_and(|&count| count > 1)
            })
            .collect()
    };

    let (schema, records) = dataset.into_parts();
    let mut unique = Vec::new();
    let mut duplicate = Vec::new();
    for (record, is_shared) in records.into_iter().zip(shared) {
        if is_shared {
            duplicate.push(record);
        } else {
            unique.push(record);
        }
    }
    debug!(
        "partitioned {} records: {} unique geometries, {} shared",
        unique.len() + duplicate.len(),
        unique.len(),
        duplicate.len()
    );
    Partition {
        unique: Dataset::from_validated(schema.clone(), unique),
        duplicate: Dataset::from_validated(schema, duplicate),
    }
}
