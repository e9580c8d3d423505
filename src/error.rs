use std::path::PathBuf;

use thiserror::Error;

/// Run-level failures. Only `NoInputFiles`, `UnreadableDirectory` and
/// `WriteReport` stop a run; everything else is contained to one file.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no supported data files found in {}", dir.display())]
    NoInputFiles { dir: PathBuf },

    #[error("cannot read directory {}: {reason}", dir.display())]
    UnreadableDirectory { dir: PathBuf, reason: String },

    #[error("failed to decode {file}: {reason}")]
    Decode { file: String, reason: String },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("raster grid is {}×{} but metadata says {}×{}", found.0, found.1, expected.0, expected.1)]
    InvalidRaster {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("failed to write report to {}: {reason}", path.display())]
    WriteReport { path: PathBuf, reason: String },
}
