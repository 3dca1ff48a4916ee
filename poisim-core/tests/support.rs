//! Dataset builders shared by the integration tests.

use poisim_core::{Dataset, FieldValue, Record, Schema};

/// Tolerance for score comparisons.
pub const SCORE_EPSILON: f64 = 1.0e-9;

/// Schema with the standard name, address and phone columns.
pub fn poi_schema() -> Schema {
    Schema::new(["name", "address", "phone"]).expect("distinct columns")
}

/// Build a POI record with the standard columns.
pub fn poi(
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

/// Build a dataset over [`poi_schema`].
pub fn dataset(records: Vec<Record>) -> Dataset {
    Dataset::new(poi_schema(), records).expect("valid dataset")
}

/// Assert two scores agree within [`SCORE_EPSILON`].
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= SCORE_EPSILON,
        "expected {expected}, got {actual}"
    );
}
