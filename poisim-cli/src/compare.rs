//! Compare command implementation for the poisim CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poisim_core::{CompareConfig, Dataset, FieldNames, SimilarityReport, compare};
use poisim_data::{CanonicalizeOptions, LoadOptions, canonicalize_dataset, load_csv_dataset};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{ARG_FILE_A, ARG_FILE_B, CliError, ENV_FILE_A, ENV_FILE_B};

/// How the similarity report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// File names followed by the score percentage.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compare a driving dataset against a reference dataset. \
                 Records are paired by canonical geometry, and by name \
                 where several records share one geometry. Every pair \
                 earns a bonus and loses weighted penalties for differing \
                 attributes; unmatched reference records cost a fixed \
                 penalty. Options can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Score the similarity of two POI datasets"
)]
#[ortho_config(prefix = "POISIM")]
pub(crate) struct CompareArgs {
    /// Path to the driving CSV dataset.
    #[arg(long = ARG_FILE_A, value_name = "path")]
    #[serde(default)]
    pub(crate) file_a: Option<Utf8PathBuf>,
    /// Path to the reference CSV dataset.
    #[arg(long = ARG_FILE_B, value_name = "path")]
    #[serde(default)]
    pub(crate) file_b: Option<Utf8PathBuf>,
    /// Identifier column (default `id`).
    #[arg(long, value_name = "column")]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Geometry column holding WKT (default `WKT`).
    #[arg(long, value_name = "column")]
    #[serde(default)]
    pub(crate) geometry: Option<String>,
    /// Name column (default `name`).
    #[arg(long, value_name = "column")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Address column (default `address`).
    #[arg(long, value_name = "column")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Phone column (default `phone`).
    #[arg(long, value_name = "column")]
    #[serde(default)]
    pub(crate) phone: Option<String>,
    /// CSV field separator (default `,`).
    #[arg(long = crate::ARG_DELIMITER, value_name = "char")]
    #[serde(default)]
    pub(crate) delimiter: Option<char>,
    /// Decimal places kept when canonicalising geometry (default 5).
    #[arg(long, value_name = "places")]
    #[serde(default)]
    pub(crate) precision: Option<u8>,
    /// Output format.
    #[arg(long, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl CompareArgs {
    pub(crate) fn into_settings(self) -> Result<CompareSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareSettings::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompareSettings {
    /// Driving dataset.
    pub(crate) file_a: Utf8PathBuf,
    /// Reference dataset.
    pub(crate) file_b: Utf8PathBuf,
    /// Column roles.
    pub(crate) fields: FieldNames,
    /// CSV field separator.
    pub(crate) delimiter: u8,
    /// Geometry rounding.
    pub(crate) canonicalize: CanonicalizeOptions,
    /// Output format.
    pub(crate) format: OutputFormat,
}

impl CompareSettings {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.file_a, ARG_FILE_A)?;
        Self::require_existing(&self.file_b, ARG_FILE_B)?;
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match poisim_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
            fields: self.fields.clone(),
            ..LoadOptions::default()
        }
    }

    fn compare_config(&self) -> CompareConfig {
        CompareConfig {
            fields: self.fields.clone(),
            ..CompareConfig::default()
        }
    }
}

impl TryFrom<CompareArgs> for CompareSettings {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let file_a = args.file_a.ok_or(CliError::MissingArgument {
            field: ARG_FILE_A,
            env: ENV_FILE_A,
        })?;
        let file_b = args.file_b.ok_or(CliError::MissingArgument {
            field: ARG_FILE_B,
            env: ENV_FILE_B,
        })?;

        let delimiter = match args.delimiter {
            None => b',',
            Some(value) if value.is_ascii() => {
                u8::try_from(value).map_err(|_| CliError::InvalidDelimiter { value })?
            }
            Some(value) => return Err(CliError::InvalidDelimiter { value }),
        };

        let defaults = FieldNames::default();
        let fields = FieldNames {
            id: args.id.unwrap_or(defaults.id),
            geometry: args.geometry.unwrap_or(defaults.geometry),
            name: args.name.unwrap_or(defaults.name),
            address: args.address.unwrap_or(defaults.address),
            phone: args.phone.unwrap_or(defaults.phone),
        };

        let canonicalize = args
            .precision
            .map_or_else(CanonicalizeOptions::default, CanonicalizeOptions::with_precision);

        Ok(Self {
            file_a,
            file_b,
            fields,
            delimiter,
            canonicalize,
            format: args.format.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    file_a: &'a Utf8Path,
    file_b: &'a Utf8Path,
    percentage: f64,
    #[serde(flatten)]
    report: &'a SimilarityReport,
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_compare_with(args, &mut stdout)
}

pub(crate) fn run_compare_with(
    args: CompareArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let settings = resolve_settings(args)?;
    let report = execute_compare(&settings)?;
    write_report(writer, &settings, &report)
}

fn resolve_settings(args: CompareArgs) -> Result<CompareSettings, CliError> {
    let settings = args.into_settings()?;
    settings.validate_sources()?;
    Ok(settings)
}

pub(crate) fn execute_compare(settings: &CompareSettings) -> Result<SimilarityReport, CliError> {
    let a = load_input(&settings.file_a, settings)?;
    let b = load_input(&settings.file_b, settings)?;
    Ok(compare(a, b, &settings.compare_config())?)
}

fn load_input(path: &Utf8Path, settings: &CompareSettings) -> Result<Dataset, CliError> {
    let dataset =
        load_csv_dataset(path, &settings.load_options()).map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        })?;
    canonicalize_dataset(dataset, settings.canonicalize).map_err(|source| {
        CliError::Canonicalize {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn write_report(
    writer: &mut dyn Write,
    settings: &CompareSettings,
    report: &SimilarityReport,
) -> Result<(), CliError> {
    let payload = match settings.format {
        OutputFormat::Text => format!(
            "{} - {}\nScore: {:.1}",
            settings.file_a,
            settings.file_b,
            report.percentage()
        ),
        OutputFormat::Json => serde_json::to_string_pretty(&ReportOutput {
            file_a: &settings.file_a,
            file_b: &settings.file_b,
            percentage: report.percentage(),
            report,
        })
        .map_err(CliError::SerialiseReport)?,
    };
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
