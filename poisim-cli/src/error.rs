//! Error types emitted by the poisim CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use poisim_core::CompareError;
use poisim_data::{CanonicalizeError, LoadError};
use thiserror::Error;

/// Errors emitted by the poisim CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The field delimiter is not a single ASCII character.
    #[error("delimiter {value:?} must be a single ASCII character")]
    InvalidDelimiter {
        /// Character supplied.
        value: char,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag that named the path.
        field: &'static str,
        /// Path supplied.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Path supplied.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading a dataset failed.
    #[error("failed to load {path:?}: {source}")]
    Load {
        /// File being loaded.
        path: Utf8PathBuf,
        /// Loader failure.
        #[source]
        source: LoadError,
    },
    /// A dataset holds geometry that is not valid WKT.
    #[error("failed to canonicalise geometries in {path:?}: {source}")]
    Canonicalize {
        /// File being canonicalised.
        path: Utf8PathBuf,
        /// Canonicalisation failure.
        #[source]
        source: CanonicalizeError,
    },
    /// The datasets could not be compared.
    #[error("comparison failed: {0}")]
    Compare(#[from] CompareError),
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] tracing_subscriber::util::TryInitError),
    /// Serialising the report failed.
    #[error("failed to serialise the similarity report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write the similarity report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
