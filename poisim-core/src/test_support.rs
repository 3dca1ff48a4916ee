//! Builders for the name/address/phone POI layout used by unit, behaviour
//! and property tests.

use crate::{Dataset, FieldValue, Record, Schema};

/// Attribute columns of the standard test layout.
pub const POI_COLUMNS: [&str; 3] = ["name", "address", "phone"];

/// Schema holding [`POI_COLUMNS`].
///
/// # Panics
/// Never in practice; the standard columns are distinct.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "the fixed column list has no duplicates"
)]
pub fn poi_schema() -> Schema {
    Schema::new(POI_COLUMNS).expect("standard columns are distinct")
}

/// A record with a name and missing address and phone.
#[must_use]
pub fn poi(id: &str, geometry: &str, name: &str) -> Record {
    poi_with(id, geometry, name, FieldValue::Missing, FieldValue::Missing)
}

/// A record with every standard column set.
#[must_use]
pub fn poi_with(
    id: &str,
    geometry: &str,
    name: impl Into<FieldValue>,
    address: impl Into<FieldValue>,
    phone: impl Into<FieldValue>,
) -> Record {
    Record::new(
        id,
        geometry,
        vec![name.into(), address.into(), phone.into()],
    )
}

/// Dataset over [`poi_schema`].
///
/// # Panics
/// Panics when identifiers repeat or a record does not have three values.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "test datasets are built from literals and should fail loudly"
)]
pub fn poi_dataset(records: Vec<Record>) -> Dataset {
    Dataset::new(poi_schema(), records).expect("valid test dataset")
}
