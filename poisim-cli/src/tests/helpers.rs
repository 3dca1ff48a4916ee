//! Test helpers for writing CSV inputs into a temporary workspace.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Header shared by the sample datasets.
pub(super) const HEADER: &str = "id,WKT,name,address,phone";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory holding the driving and reference CSV files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn file_a(&self) -> Utf8PathBuf {
        self.root.join("a.csv")
    }

    pub(super) fn file_b(&self) -> Utf8PathBuf {
        self.root.join("b.csv")
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `rows` below [`HEADER`] into the driving file.
    pub(super) fn write_a(&self, rows: &[&str]) {
        write_utf8(&self.file_a(), csv_body(rows).as_bytes());
    }

    /// Write `rows` below [`HEADER`] into the reference file.
    pub(super) fn write_b(&self, rows: &[&str]) {
        write_utf8(&self.file_b(), csv_body(rows).as_bytes());
    }
}

fn csv_body(rows: &[&str]) -> String {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body
}
