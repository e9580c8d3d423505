use crate::analysis::AnalysisRecord;
use crate::data::model::DataSource;
use crate::report::{Report, ReportEntry};

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Results of one run, accumulated file by file in discovery order and
/// handed to the report assembler once every file has been processed.
#[derive(Debug, Default)]
pub struct RunState {
    /// Completed records, in the order files were processed.
    entries: Vec<ReportEntry>,

    /// Files that could not be decoded, with the reason.
    failures: Vec<(String, String)>,
}

impl RunState {
    /// Store the finished record of one file.
    pub fn record(&mut self, source: DataSource, record: AnalysisRecord) {
        log::info!(
            "{} processed successfully with {} visualizations",
            source.name,
            record.visualizations().len()
        );
        self.entries.push(ReportEntry { source, record });
    }

    /// Remember a file that was skipped.
    pub fn record_failure(&mut self, source: &DataSource, reason: String) {
        log::error!("Failed to read {}: {reason}", source.name);
        self.failures.push((source.name.clone(), reason));
    }

    pub fn processed(&self) -> usize {
        self.entries.len()
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// Close the run and build its report.
    pub fn into_report(self) -> Report {
        Report::assemble(self.entries)
    }
}
