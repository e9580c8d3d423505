//! Chart generation. Every chart is attempted independently; a failed
//! attempt is logged and dropped without affecting its siblings.

pub mod figure;
pub mod raster;
pub mod tabular;

use std::fmt;

use thiserror::Error;

use crate::config::VizConfig;
use crate::data::filter::NoData;
use crate::data::model::Dataset;

pub use figure::Figure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizKind {
    Histogram,
    Correlation,
    Bar,
    Heatmap,
    Statistics,
}

impl fmt::Display for VizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VizKind::Histogram => "histogram",
            VizKind::Correlation => "correlation",
            VizKind::Bar => "bar",
            VizKind::Heatmap => "heatmap",
            VizKind::Statistics => "statistics",
        })
    }
}

/// One generated chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Visualization {
    pub kind: VizKind,
    pub title: String,
    pub figure: Figure,
}

/// Why a single chart could not be built.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("column '{0}' has no values")]
    EmptyColumn(String),
    #[error("need at least {needed} columns, found {found}")]
    TooFewColumns { needed: usize, found: usize },
    #[error("no valid cells to draw")]
    NoValidCells,
}

pub type ChartResult = Result<Visualization, ChartError>;

/// Charts for one decoded file. `nodata` is the rule the raster analyzer
/// settled on; it is ignored for tables.
pub fn visualize(
    dataset: &Dataset,
    nodata: Option<NoData>,
    config: &VizConfig,
    file_name: &str,
) -> Vec<Visualization> {
    let attempts = match dataset {
        Dataset::Tabular(table) => tabular::charts(table),
        Dataset::Raster(raster) => raster::charts(raster, nodata, config),
    };
    collect(file_name, attempts)
}

/// Keep successful charts in order; log and drop failures.
pub fn collect(file_name: &str, attempts: Vec<ChartResult>) -> Vec<Visualization> {
    attempts
        .into_iter()
        .filter_map(|attempt| match attempt {
            Ok(viz) => Some(viz),
            Err(e) => {
                log::warn!("Could not create chart for {file_name}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(title: &str) -> Visualization {
        Visualization {
            kind: VizKind::Histogram,
            title: title.to_string(),
            figure: Figure::histogram(&[1.0], None, "skyblue", title, "x"),
        }
    }

    #[test]
    fn test_failures_do_not_abort_siblings() {
        let attempts = vec![
            Ok(chart("first")),
            Err(ChartError::EmptyColumn("b".into())),
            Ok(chart("third")),
        ];
        let kept = collect("t.csv", attempts);
        let titles: Vec<&str> = kept.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "third"]);
    }
}
