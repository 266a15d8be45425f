#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const SALES_CSV: &str = "\
Order ID,Product Name,Region,State,Sales,Quantity,Profit
CA-1,Canon imageCLASS Copier,West,California,3500,2,1100
CA-2,Staple Envelope,West,California,12.5,5,4
CA-3,Canon imageCLASS Copier,West,Washington,1750,1,560
CA-4,Bretford Table,East,New York,900,3,-120
CA-5,Staple Envelope,East,New York,25,10,8
CA-6,Logitech Mouse,Central,Texas,80,4,abc
CA-7,Hon Chair,South,Florida,640,2,35
CA-8,Logitech Mouse,West,Oregon,40,2,10
";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the shared sales fixture as `ventas.csv`.
    pub fn sales_csv(&self) -> PathBuf {
        self.write("ventas.csv", SALES_CSV)
    }
}
