//! Report assembly: per-file results plus run-wide totals.

pub mod html;

use std::collections::BTreeSet;

use crate::analysis::AnalysisRecord;
use crate::data::model::DataSource;

/// One file's section of the report.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub source: DataSource,
    pub record: AnalysisRecord,
}

/// Run-wide totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub file_count: usize,
    pub type_count: usize,
    pub total_bytes: u64,
    pub visualization_count: usize,
}

/// The finished, read-only result of a run.
#[derive(Debug, Clone)]
pub struct Report {
    entries: Vec<ReportEntry>,
    stats: AggregateStats,
}

impl Report {
    /// Compute the totals; `entries` keep their order.
    pub fn assemble(entries: Vec<ReportEntry>) -> Self {
        let kinds: BTreeSet<_> = entries.iter().map(|e| e.source.kind).collect();
        let stats = AggregateStats {
            file_count: entries.len(),
            type_count: kinds.len(),
            total_bytes: entries.iter().map(|e| e.source.size).sum(),
            visualization_count: entries
                .iter()
                .map(|e| e.record.visualizations().len())
                .sum(),
        };
        Report { entries, stats }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }
}
