use std::path::PathBuf;

use crate::analysis::{self, AnalysisRecord};
use crate::config::{Args, Capabilities, VizConfig};
use crate::data::discovery::discover;
use crate::data::loader::load_source;
use crate::data::model::{DataSource, Dataset};
use crate::error::DashboardError;
use crate::report::html;
use crate::state::RunState;
use crate::viz;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the whole pipeline once: discover, analyze and chart every file,
/// then write the dashboard. Returns the path of the written document.
pub fn run(args: &Args) -> Result<PathBuf, DashboardError> {
    log::info!("Starting analysis of {}", args.data_dir.display());

    let caps = Capabilities::detect();
    caps.log_missing();

    let sources = discover(&args.data_dir, &caps)?;
    if sources.is_empty() {
        return Err(DashboardError::NoInputFiles {
            dir: args.data_dir.clone(),
        });
    }

    let config = VizConfig::from(args);
    let mut state = RunState::default();
    for source in sources {
        log::info!("Processing {}...", source.name);
        match process_source(&source, &config) {
            Ok(record) => state.record(source, record),
            Err(e) => state.record_failure(&source, e.to_string()),
        }
    }
    if !state.failures().is_empty() {
        log::warn!(
            "{} of {} files could not be read",
            state.failures().len(),
            state.failures().len() + state.processed()
        );
    }

    let report = state.into_report();
    log::info!(
        "Generating dashboard with {} total visualizations",
        report.stats().visualization_count
    );
    let document = html::render(&report, &args.title);

    std::fs::write(&args.output, document).map_err(|e| DashboardError::WriteReport {
        path: args.output.clone(),
        reason: e.to_string(),
    })?;
    log::info!("Dashboard generated: {}", args.output.display());
    Ok(args.output.clone())
}

/// Decode, analyze and chart one file. Only decoding can fail; analysis
/// degrades to partial summaries and chart failures are dropped.
pub fn process_source(source: &DataSource, config: &VizConfig) -> Result<AnalysisRecord, DashboardError> {
    let dataset = load_source(source).map_err(|e| DashboardError::Decode {
        file: source.name.clone(),
        reason: format!("{e:#}"),
    })?;

    let (record, nodata) = match &dataset {
        Dataset::Tabular(table) => (analysis::tabular::analyze(table), None),
        Dataset::Raster(raster) => analysis::raster::analyze(raster),
    };

    log::info!("Creating visualizations for {}...", source.name);
    let charts = viz::visualize(&dataset, nodata, config, &source.name);
    Ok(record.with_visualizations(charts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SummaryValue;
    use crate::data::model::SourceKind;
    use clap::Parser;

    fn args_for(dir: &std::path::Path, output: &std::path::Path) -> Args {
        Args::parse_from([
            "rusty-dashboard",
            dir.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
    }

    #[test]
    fn test_end_to_end() {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("people.csv"), "age,city\n25,A\n30,B\n25,A\n").unwrap();
        std::fs::write(
            data.path().join("scores.json"),
            r#"[{"x": 1.0, "y": 2.0}, {"x": 2.0, "y": 4.5}, {"x": 3.0, "y": 5.0}]"#,
        )
        .unwrap();
        std::fs::write(data.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(data.path().join("notes.txt"), "ignored").unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("dashboard.html");
        let written = run(&args_for(data.path(), &output)).unwrap();
        assert_eq!(written, output);

        let html = std::fs::read_to_string(&output).unwrap();
        let people = html.find("<section id=\"file-0-people_csv\"").unwrap();
        let scores = html.find("<section id=\"file-1-scores_json\"").unwrap();
        assert!(people < scores);
        assert!(!html.contains("broken_json"));
        assert!(!html.contains("notes_txt"));
        assert!(html.contains("Distribution of age"));
        assert!(html.contains("Top Values in city"));
        assert!(html.contains("Correlation Matrix"));
    }

    #[test]
    fn test_process_tabular_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "age,city\n25,A\n30,B\n25,A\n").unwrap();
        let source = DataSource {
            name: "people.csv".into(),
            path,
            kind: SourceKind::Csv,
            size: 25,
            modified: None,
        };

        let record = process_source(&source, &VizConfig::default()).unwrap();
        assert_eq!(record.get("row_count"), Some(&SummaryValue::Int(3)));
        assert_eq!(record.get("duplicates"), Some(&SummaryValue::Int(1)));
        // One histogram and one bar chart; a single numeric column has no matrix.
        assert_eq!(record.visualizations().len(), 2);
    }

    #[test]
    fn test_decode_failure_is_reported_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.h5");
        std::fs::write(&path, b"\x89HDF").unwrap();
        let source = DataSource {
            name: "data.h5".into(),
            path,
            kind: SourceKind::Hdf5,
            size: 4,
            modified: None,
        };
        let err = process_source(&source, &VizConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Decode { ref file, .. } if file == "data.h5"));
    }

    #[test]
    fn test_empty_directory_writes_nothing() {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("readme.md"), "nothing here").unwrap();
        let output = data.path().join("out.html");

        let err = run(&args_for(data.path(), &output)).unwrap_err();
        assert!(matches!(err, DashboardError::NoInputFiles { .. }));
        assert!(!output.exists());
    }
}
