//! Input handling for the POI similarity pipeline.
//!
//! Responsibilities:
//! - Load CSV files into validated [`poisim_core::Dataset`]s.
//! - Canonicalise WKT geometries so equal shapes compare as equal strings.
//!
//! Boundaries:
//! - Do not encode matching or scoring rules (live in `poisim-core`).

#![forbid(unsafe_code)]

mod canonical;
mod load;

pub use canonical::{
    CanonicalizeError, CanonicalizeOptions, DEFAULT_PRECISION, MAX_PRECISION,
    canonicalize_dataset, canonicalize_wkt,
};
pub use load::{DEFAULT_NA_VALUES, LoadError, LoadOptions, load_csv_dataset, read_dataset};
