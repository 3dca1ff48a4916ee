//! Facade crate for the POI similarity pipeline.
//!
//! This crate re-exports the core comparison API and, behind the `data`
//! feature, CSV loading and WKT canonicalisation.

#![forbid(unsafe_code)]

pub use poisim_core::{
    CompareConfig, CompareError, Dataset, DatasetError, FieldNames, FieldValue, MatchEntry,
    MatchKey, MatchOutcome, Partition, PassReport, PenaltyWeights, Record, Schema, Scorer,
    SimilarityReport, compare, is_penalised, match_records, partition,
};

#[cfg(feature = "test-support")]
pub use poisim_core::test_support;

#[cfg(feature = "data")]
pub use poisim_data::{
    CanonicalizeError, CanonicalizeOptions, LoadError, LoadOptions, canonicalize_dataset,
    canonicalize_wkt, load_csv_dataset, read_dataset,
};
