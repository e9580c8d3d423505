use std::path::Path;

use crate::config::Capabilities;
use crate::error::DashboardError;

use super::model::{DataSource, SourceKind};

/// Scan `dir` (non-recursively) for files this build can decode.
///
/// Files are returned in file-name order, which is the order of the report
/// sections. Formats whose capability is disabled are skipped silently.
pub fn discover(dir: &Path, caps: &Capabilities) -> Result<Vec<DataSource>, DashboardError> {
    let unreadable = |e: std::io::Error| DashboardError::UnreadableDirectory {
        dir: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        let Ok(meta) = entry.metadata() else {
            log::warn!("Cannot stat {}, skipping", path.display());
            continue;
        };
        if !meta.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let Some(kind) = SourceKind::from_extension(&ext) else {
            continue;
        };
        if !caps.supports(kind) {
            log::debug!("Skipping {} (no {kind} support)", path.display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        log::info!("Found {} file: {name}", kind.label().to_uppercase());
        sources.push(DataSource {
            name,
            kind,
            size: meta.len(),
            modified: meta.modified().ok(),
            path,
        });
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_discovery_order_and_filtering() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.csv", "a\n1\n");
        touch(dir.path(), "a.JSON", "[]");
        touch(dir.path(), "notes.txt", "ignored");
        touch(dir.path(), "report.html", "<html></html>");
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let found = discover(dir.path(), &Capabilities::all()).unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.JSON", "b.csv"]);
        assert_eq!(found[0].kind, SourceKind::Json);
        assert_eq!(found[1].size, 4);
        assert!(found[1].modified.is_some());
    }

    #[test]
    fn test_disabled_capability_skips_format() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "grid.tif", "");
        touch(dir.path(), "book.xlsx", "");
        touch(dir.path(), "table.parquet", "");

        let caps = Capabilities {
            excel: false,
            parquet: true,
            raster: false,
        };
        let found = discover(dir.path(), &caps).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SourceKind::Parquet);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover(&missing, &Capabilities::all()),
            Err(DashboardError::UnreadableDirectory { .. })
        ));
    }
}
