//! Compare two datasets end to end.
//!
//! The driving dataset `a` and the reference dataset `b` are each split by
//! geometry uniqueness. Unique-geometry records are paired by geometry;
//! shared-geometry records are paired by geometry and name. Both passes feed
//! one running score, which is finally divided by twice the size of `a`.

use log::{debug, info, warn};

use crate::{
    CompareConfig, CompareError, Dataset, MatchKey, PassReport, Schema, Scorer,
    SimilarityReport, match_records, partition,
};

/// Score how closely `b` agrees with `a`.
///
/// # Errors
/// - [`CompareError::InvalidWeight`] when a configured weight is not finite.
/// - [`CompareError::Dataset`] wrapping
///   [`DatasetError::SchemaMismatch`](crate::DatasetError::SchemaMismatch)
///   when the datasets hold different column sets. Column order may differ;
///   `b` is re-projected onto `a`'s order.
/// - [`CompareError::UnknownField`] when the name column is absent.
/// - [`CompareError::EmptyDriving`] when `a` is empty, leaving nothing to
///   normalise by.
///
/// # Examples
/// ```
/// use poisim_core::{CompareConfig, Dataset, Record, Schema, compare};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = Schema::new(["name", "address", "phone"])?;
/// let a = Dataset::new(
///     schema.clone(),
///     vec![Record::new("1", "POINT (0 0)", vec!["Cafe X".into(), "1 Main St".into(), "555-1111".into()])],
/// )?;
/// let b = Dataset::new(
///     schema,
///     vec![Record::new("9", "POINT (0 0)", vec!["Cafe X".into(), "1 Main St".into(), "".into()])],
/// )?;
///
/// let report = compare(a, b, &CompareConfig::default())?;
/// assert_eq!(report.percentage(), 50.0);
/// # Ok(())
/// # }
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "normalisation divides the score by a record count"
)]
pub fn compare(
    a: Dataset,
    b: Dataset,
    config: &CompareConfig,
) -> Result<SimilarityReport, CompareError> {
    config.weights.validate()?;
    let schema = a.schema().clone();
    schema.ensure_same_columns(b.schema())?;
    let aligned_b = b.reproject(&schema)?;
    check_fields(&schema, config)?;
    if a.is_empty() {
        return Err(CompareError::EmptyDriving);
    }

    let records_a = a.len();
    let records_b = aligned_b.len();
    let scorer = Scorer::new(&schema, &config.fields, &config.weights);
    let halves_a = partition(a);
    let halves_b = partition(aligned_b);

    let (after_unique, unique_pass) = run_pass(
        0.0,
        halves_a.unique,
        halves_b.unique,
        MatchKey::Geometry,
        &scorer,
        config,
    )?;
    let (raw_score, duplicate_pass) = run_pass(
        after_unique,
        halves_a.duplicate,
        halves_b.duplicate,
        MatchKey::GeometryAndName,
        &scorer,
        config,
    )?;

    let normalized_score = raw_score / (2.0 * records_a as f64);
    info!("similarity {normalized_score:.4} (raw {raw_score:.2} over {records_a} records)");
    Ok(SimilarityReport {
        raw_score,
        normalized_score,
        records_a,
        records_b,
        unique_pass,
        duplicate_pass,
    })
}

fn check_fields(schema: &Schema, config: &CompareConfig) -> Result<(), CompareError> {
    let fields = &config.fields;
    if schema.position(&fields.name).is_none() {
        return Err(CompareError::UnknownField {
            role: "name",
            column: fields.name.clone(),
        });
    }
    for (role, column) in [("address", &fields.address), ("phone", &fields.phone)] {
        if schema.position(column).is_none() {
            warn!("{role} column {column:?} is absent; it will not be compared");
        }
    }
    Ok(())
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "each residual record costs a fixed floating-point penalty"
)]
fn run_pass(
    running: f64,
    a: Dataset,
    b: Dataset,
    key: MatchKey,
    scorer: &Scorer,
    config: &CompareConfig,
) -> Result<(f64, PassReport), CompareError> {
    let records_a = a.len();
    let records_b = b.len();
    let outcome = match_records(a, b, key, &config.fields)?;
    let after_pairs = scorer.score(running, outcome.pairs(), key);
    let residual_b = outcome.residual_b.len();
    let after = after_pairs - config.weights.unmatched_penalty * residual_b as f64;
    debug!("{key} pass moved the score from {running:.2} to {after:.2}");
    let report = PassReport {
        key,
        records_a,
        records_b,
        matched_pairs: outcome.pair_count(),
        residual_b,
        score_delta: after - running,
    };
    Ok((after, report))
}
