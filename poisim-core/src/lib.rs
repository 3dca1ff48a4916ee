//! Core similarity pipeline for point-of-interest datasets.
//!
//! Responsibilities:
//! - Model records, schemas and datasets with validated invariants.
//! - Split datasets by geometry uniqueness, pair records across datasets and
//!   score attribute disagreement.
//! - Combine both matching passes into a normalised [`SimilarityReport`].
//!
//! Boundaries:
//! - No file or network I/O; loading and WKT canonicalisation live in
//!   `poisim-data`.
//!
//! Invariants:
//! - Insertion order drives every tie-break.
//! - Records move through the pipeline; no stage aliases another's output.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod compare;
mod config;
mod dataset;
mod error;
mod matcher;
mod partition;
mod record;
mod report;
mod scorer;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use compare::compare;
pub use config::{CompareConfig, FieldNames, PenaltyWeights};
pub use dataset::{Dataset, Schema};
pub use error::{CompareError, DatasetError};
pub use matcher::{MatchEntry, MatchKey, MatchOutcome, match_records};
pub use partition::{Partition, partition};
pub use record::{FieldValue, Record};
pub use report::{PassReport, SimilarityReport};
pub use scorer::{Scorer, is_penalised};
