//! WKT canonicalisation.
//!
//! Geometries are parsed, their coordinates rounded to a fixed number of
//! decimal places and re-serialised, so two geometries equal up to
//! floating-point noise become identical strings.

use geo::{Coord, Geometry, MapCoords};
use log::debug;
use poisim_core::Dataset;
use thiserror::Error;
use wkt::{ToWkt, TryFromWkt};

/// Decimal places kept when no precision is configured.
pub const DEFAULT_PRECISION: u8 = 5;

/// Largest precision an `f64` can honour.
pub const MAX_PRECISION: u8 = 15;

/// Settings for [`canonicalize_wkt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalizeOptions {
    /// Decimal places kept on every coordinate.
    pub precision: u8,
}

impl Default for CanonicalizeOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl CanonicalizeOptions {
    /// Options keeping `precision` decimal places.
    #[must_use]
    pub const fn with_precision(precision: u8) -> Self {
        Self { precision }
    }

    fn scale(self) -> Result<f64, CanonicalizeError> {
        if self.precision > MAX_PRECISION {
            return Err(CanonicalizeError::Precision {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(10_f64.powi(i32::from(self.precision)))
    }
}

/// Errors raised while canonicalising geometries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// The text is not valid WKT.
    #[error("invalid WKT {text:?}: {message}")]
    InvalidWkt {
        /// Offending text.
        text: String,
        /// Parser diagnostic.
        message: String,
    },
    /// A record's geometry is not valid WKT.
    #[error("record {id:?} has invalid WKT {text:?}: {message}")]
    InvalidRecord {
        /// Identifier of the record.
        id: String,
        /// Offending text.
        text: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The requested precision cannot be represented.
    #[error("precision {precision} exceeds the supported maximum of {max}")]
    Precision {
        /// Requested decimal places.
        precision: u8,
        /// Supported maximum.
        max: u8,
    },
}

/// Parse `text` as WKT and re-serialise it with rounded coordinates.
///
/// # Errors
/// Returns [`CanonicalizeError::InvalidWkt`] when `text` does not parse and
/// [`CanonicalizeError::Precision`] when the precision exceeds
/// [`MAX_PRECISION`].
///
/// # Examples
/// ```
/// use poisim_data::{CanonicalizeOptions, canonicalize_wkt};
///
/// # fn main() -> Result<(), poisim_data::CanonicalizeError> {
/// let options = CanonicalizeOptions::default();
/// let noisy = canonicalize_wkt("POINT (1.0000001 2)", options)?;
/// let clean = canonicalize_wkt("POINT(1 2.000000004)", options)?;
/// assert_eq!(noisy, clean);
/// # Ok(())
/// # }
/// ```
pub fn canonicalize_wkt(
    text: &str,
    options: CanonicalizeOptions,
) -> Result<String, CanonicalizeError> {
    let scale = options.scale()?;
    let geometry = Geometry::<f64>::try_from_wkt_str(text.trim()).map_err(|err| {
        CanonicalizeError::InvalidWkt {
            text: text.to_owned(),
            message: err.to_string(),
        }
    })?;
    let rounded = geometry.map_coords(|coord| Coord {
        x: round_to(coord.x, scale),
        y: round_to(coord.y, scale),
    });
    Ok(rounded.wkt_string())
}

/// Canonicalise the geometry of every record in `dataset`.
///
/// # Errors
/// Returns [`CanonicalizeError::InvalidRecord`] naming the first record whose
/// geometry does not parse. Empty geometries are kept as they are.
pub fn canonicalize_dataset(
    dataset: Dataset,
    options: CanonicalizeOptions,
) -> Result<Dataset, CanonicalizeError> {
    let count = dataset.len();
    let canonical = dataset.try_map_geometry(|record| {
        if record.geometry.trim().is_empty() {
            return Ok(String::new());
        }
        canonicalize_wkt(&record.geometry, options).map_err(|err| match err {
            CanonicalizeError::InvalidWkt { text, message } => CanonicalizeError::InvalidRecord {
                id: record.id.clone(),
                text,
                message,
            },
            other => other,
        })
    })?;
    debug!(
        "canonicalised {count} geometries at {} decimal places",
        options.precision
    );
    Ok(canonical)
}

#[expect(
    clippy::float_arithmetic,
    reason = "rounding scales coordinates by a power of ten"
)]
fn round_to(value: f64, scale: f64) -> f64 {
    // Adding zero turns -0.0 into 0.0.
    (value * scale).round() / scale + 0.0
}
