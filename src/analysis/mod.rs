//! Per-file analysis: summaries and insights for tables and rasters.

pub mod nodata;
pub mod raster;
pub mod record;
pub mod stats;
pub mod tabular;

pub use record::{AnalysisRecord, Summary, SummaryValue};
