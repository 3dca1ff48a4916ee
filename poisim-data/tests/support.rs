//! Temporary CSV fixtures for the behaviour tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use tempfile::{Builder, TempPath};

/// Write `contents` to a temporary `.csv` file.
pub fn csv_fixture(contents: &str) -> TempPath {
    let mut file = Builder::new()
        .prefix("poisim")
        .suffix(".csv")
        .tempfile()
        .unwrap_or_else(|err| panic!("failed to create temporary CSV: {err}"));
    file.write_all(contents.as_bytes())
        .unwrap_or_else(|err| panic!("failed to write temporary CSV: {err}"));
    file.into_temp_path()
}

/// UTF-8 view of a temporary path.
pub fn utf8_path(path: &TempPath) -> Utf8PathBuf {
    Utf8Path::from_path(path)
        .unwrap_or_else(|| panic!("temporary path {path:?} is not UTF-8"))
        .to_owned()
}
