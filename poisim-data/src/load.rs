//! CSV loading into [`Dataset`]s.
//!
//! The identifier and geometry columns become [`Record::id`] and
//! [`Record::geometry`]; every other column becomes part of the attribute
//! schema, in file order. Cells matching one of the configured NA markers
//! load as [`FieldValue::Missing`]. A column whose present cells all parse as
//! numbers loads as [`FieldValue::Number`], so `007` and `7.0` agree.

use std::collections::HashSet;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use poisim_core::{Dataset, DatasetError, FieldNames, FieldValue, Record, Schema};
use poisim_fs::open_utf8_file;
use thiserror::Error;

/// Cell values read as missing unless configured otherwise.
///
/// These follow the markers common CSV tooling writes for absent data.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Settings for [`read_dataset`] and [`load_csv_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field separator.
    pub delimiter: u8,
    /// Column roles; only `id` and `geometry` are used while loading.
    pub fields: FieldNames,
    /// Cell values read as missing.
    pub na_values: Vec<String>,
    /// Load wholly numeric columns as numbers.
    pub infer_numbers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            fields: FieldNames::default(),
            na_values: DEFAULT_NA_VALUES
                .iter()
                .map(|value| (*value).to_owned())
                .collect(),
            infer_numbers: true,
        }
    }
}

/// Errors returned while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("failed to open {path}")]
    Open {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The CSV stream could not be decoded.
    #[error("failed to decode CSV data")]
    Csv(#[from] csv::Error),
    /// A role column is absent from the header.
    #[error("{role} column {column:?} is missing from the header")]
    MissingColumn {
        /// Role of the column (`id` or `geometry`).
        role: &'static str,
        /// Configured column name.
        column: String,
    },
    /// A row has no identifier.
    #[error("row on line {line} has no {column:?} value")]
    MissingId {
        /// Line of the row in the input.
        line: u64,
        /// Identifier column name.
        column: String,
    },
    /// The rows do not form a valid dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

struct Layout {
    id: usize,
    geometry: usize,
    attributes: Vec<usize>,
}

impl Layout {
    fn from_headers(headers: &StringRecord, fields: &FieldNames) -> Result<Self, LoadError> {
        let id = header_position(headers, &fields.id, "id")?;
        let geometry = header_position(headers, &fields.geometry, "geometry")?;
        let attributes = (0..headers.len())
            .filter(|&index| index != id && index != geometry)
            .collect();
        Ok(Self {
            id,
            geometry,
            attributes,
        })
    }

    fn schema(&self, headers: &StringRecord) -> Result<Schema, DatasetError> {
        Schema::new(
            self.attributes
                .iter()
                .filter_map(|&index| headers.get(index)),
        )
    }
}

fn header_position(
    headers: &StringRecord,
    column: &str,
    role: &'static str,
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| LoadError::MissingColumn {
            role,
            column: column.to_owned(),
        })
}

/// Read a dataset from CSV data.
///
/// # Errors
/// Returns [`LoadError::Csv`] for malformed input (including rows whose
/// length differs from the header), [`LoadError::MissingColumn`] when the
/// identifier or geometry column is absent, [`LoadError::MissingId`] for a
/// row without an identifier and [`LoadError::Dataset`] for duplicate
/// identifiers or attribute columns.
///
/// # Examples
/// ```
/// use poisim_core::FieldValue;
/// use poisim_data::{LoadOptions, read_dataset};
///
/// # fn main() -> Result<(), poisim_data::LoadError> {
/// let csv = "id,WKT,name,phone\n1,POINT (0 0),Cafe X,NA\n";
/// let dataset = read_dataset(csv.as_bytes(), &LoadOptions::default())?;
/// let record = dataset.get("1").expect("record loaded");
/// assert_eq!(record.values, vec![FieldValue::from("Cafe X"), FieldValue::Missing]);
/// # Ok(())
/// # }
/// ```
pub fn read_dataset<R: Read>(input: R, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let layout = Layout::from_headers(&headers, &options.fields)?;
    let schema = layout.schema(&headers)?;
    let missing: HashSet<&str> = options.na_values.iter().map(String::as_str).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, csv::Position::line);
        let id = row
            .get(layout.id)
            .filter(|id| !missing.contains(id))
            .ok_or_else(|| LoadError::MissingId {
                line,
                column: options.fields.id.clone(),
            })?;
        let geometry = row
            .get(layout.geometry)
            .filter(|geometry| !missing.contains(geometry))
            .unwrap_or_default();
        if geometry.is_empty() {
            warn!("record {id:?} on line {line} has no geometry");
        }
        let values = layout
            .attributes
            .iter()
            .map(|&index| match row.get(index) {
                Some(cell) if !missing.contains(cell) => FieldValue::from(cell),
                _ => FieldValue::Missing,
            })
            .collect();
        records.push(Record::new(id, geometry, values));
    }
    if options.infer_numbers {
        infer_numeric_columns(&schema, &mut records);
    }
    Ok(Dataset::new(schema, records)?)
}

fn parse_number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Text(text) => text.trim().parse().ok(),
        FieldValue::Missing | FieldValue::Number(_) => None,
    }
}

fn infer_numeric_columns(schema: &Schema, records: &mut [Record]) {
    for (column, name) in schema.columns().iter().enumerate() {
        let mut present = false;
        let numeric = records
            .iter()
            .filter_map(|record| record.values.get(column))
            .filter(|value| !value.is_missing())
            .all(|value| {
                present = true;
                parse_number(value).is_some()
            });
        if !(numeric && present) {
            continue;
        }
        debug!("column {name:?} holds only numbers");
        for record in &mut *records {
            if let Some(value) = record.values.get_mut(column)
                && let Some(number) = parse_number(value)
            {
                *value = FieldValue::Number(number);
            }
        }
    }
}

/// Load a dataset from the CSV file at `path`.
///
/// # Errors
/// Returns [`LoadError::Open`] when the file cannot be opened, otherwise
/// the errors of [`read_dataset`].
pub fn load_csv_dataset(path: &Utf8Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let file = open_utf8_file(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    let dataset = read_dataset(file, options)?;
    debug!(
        "loaded {} records with {} attribute columns from {path}",
        dataset.len(),
        dataset.schema().len()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn read(csv: &str) -> Result<Dataset, LoadError> {
        read_dataset(csv.as_bytes(), &LoadOptions::default())
    }

    #[rstest]
    fn role_columns_are_lifted_out_of_the_schema() {
        let dataset = read("name,WKT,id,address\nCafe X,POINT (0 0),1,1 Main St\n")
            .expect("valid CSV");
        assert_eq!(dataset.schema().columns(), ["name", "address"]);
        let record = dataset.get("1").expect("record loaded");
        assert_eq!(record.geometry, "POINT (0 0)");
        assert_eq!(
            record.values,
            vec![FieldValue::from("Cafe X"), FieldValue::from("1 Main St")]
        );
    }

    #[rstest]
    #[case("")]
    #[case("NA")]
    #[case("NULL")]
    #[case("nan")]
    #[case("<NA>")]
    fn na_markers_load_as_missing(#[case] marker: &str) {
        let dataset = read(&format!("id,WKT,phone\n1,POINT (0 0),{marker}\n")).expect("valid CSV");
        let record = dataset.get("1").expect("record loaded");
        assert_eq!(record.values, vec![FieldValue::Missing]);
    }

    #[rstest]
    fn na_markers_are_configurable() {
        let options = LoadOptions {
            na_values: vec!["-".to_owned()],
            ..LoadOptions::default()
        };
        let dataset = read_dataset("id,WKT,phone,fax\n1,POINT (0 0),-,NA\n".as_bytes(), &options)
            .expect("valid CSV");
        let record = dataset.get("1").expect("record loaded");
        assert_eq!(
            record.values,
            vec![FieldValue::Missing, FieldValue::from("NA")]
        );
    }

    #[rstest]
    fn numeric_columns_load_as_numbers() {
        let dataset = read("id,WKT,phone,name\n1,POINT (0 0),007,Cafe X\n2,POINT (1 1),,42\n")
            .expect("valid CSV");
        let first = dataset.get("1").expect("record loaded");
        let second = dataset.get("2").expect("record loaded");
        assert_eq!(first.values.first(), Some(&FieldValue::Number(7.0)));
        assert_eq!(second.values.first(), Some(&FieldValue::Missing));
        assert_eq!(second.values.get(1), Some(&FieldValue::from("42")));
    }

    #[rstest]
    fn inferred_numbers_compare_by_value() {
        let a = read("id,WKT,name,phone\n1,POINT (0 0),Cafe X,007\n").expect("valid CSV");
        let b = read("id,WKT,name,phone\n9,POINT (0 0),Cafe X,7.0\n").expect("valid CSV");
        let report = poisim_core::compare(a, b, &poisim_core::CompareConfig::default())
            .expect("comparable");
        assert_eq!(report.percentage(), 50.0);
    }

    #[rstest]
    fn number_inference_can_be_disabled() {
        let options = LoadOptions {
            infer_numbers: false,
            ..LoadOptions::default()
        };
        let dataset = read_dataset("id,WKT,phone\n1,POINT (0 0),007\n".as_bytes(), &options)
            .expect("valid CSV");
        let record = dataset.get("1").expect("record loaded");
        assert_eq!(record.values, vec![FieldValue::from("007")]);
    }

    #[rstest]
    fn custom_delimiter_and_role_names() {
        let options = LoadOptions {
            delimiter: b';',
            fields: FieldNames {
                id: "poi_id".to_owned(),
                geometry: "geom".to_owned(),
                ..FieldNames::default()
            },
            ..LoadOptions::default()
        };
        let dataset = read_dataset(
            "poi_id;geom;name\n7;POINT (1 1);Bar Y\n".as_bytes(),
            &options,
        )
        .expect("valid CSV");
        assert_eq!(
            dataset.get("7").map(|record| record.geometry.as_str()),
            Some("POINT (1 1)")
        );
    }

    #[rstest]
    #[case("name,WKT\nCafe X,POINT (0 0)\n", "id")]
    #[case("id,name\n1,Cafe X\n", "geometry")]
    fn missing_role_column_is_reported(#[case] csv: &str, #[case] expected_role: &str) {
        let err = read(csv).expect_err("missing column");
        assert!(
            matches!(&err, LoadError::MissingColumn { role, .. } if *role == expected_role),
            "{err:?}"
        );
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let err = read("id,WKT,name\n1,POINT (0 0),a\n1,POINT (1 1),b\n").expect_err("duplicate");
        assert!(
            matches!(err, LoadError::Dataset(DatasetError::DuplicateId { ref id }) if id == "1"),
            "{err:?}"
        );
    }

    #[rstest]
    fn rows_without_an_id_are_rejected() {
        let err = read("id,WKT,name\n1,POINT (0 0),a\n,POINT (1 1),b\n").expect_err("missing id");
        assert!(
            matches!(err, LoadError::MissingId { line: 3, .. }),
            "{err:?}"
        );
    }

    #[rstest]
    fn ragged_rows_are_rejected() {
        let err = read("id,WKT,name\n1,POINT (0 0)\n").expect_err("ragged row");
        assert!(matches!(err, LoadError::Csv(_)), "{err:?}");
    }

    #[rstest]
    fn missing_geometry_loads_as_empty_text() {
        let dataset = read("id,WKT,name\n1,,Cafe X\n").expect("valid CSV");
        assert_eq!(
            dataset.get("1").map(|record| record.geometry.as_str()),
            Some("")
        );
    }
}
