use serde_json::json;

use super::{ChartError, ChartResult, Figure, VizKind, Visualization};
use crate::analysis::stats::pearson;
use crate::analysis::tabular::value_counts;
use crate::color::{generate_palette, HISTOGRAM_FILL};
use crate::data::model::{Column, ColumnKind, TabularDataset};

const MAX_HISTOGRAMS: usize = 3;
const MAX_BAR_CHARTS: usize = 2;
const BAR_TOP_VALUES: usize = 10;

/// Histograms for the first numeric columns, a correlation matrix when two
/// or more numeric columns exist, and top-value bars for the first
/// categorical columns.
pub fn charts(table: &TabularDataset) -> Vec<ChartResult> {
    let numeric: Vec<&Column> = table.columns_of(ColumnKind::Numeric).collect();
    let categorical: Vec<&Column> = table.columns_of(ColumnKind::Categorical).collect();

    let mut attempts: Vec<ChartResult> = numeric
        .iter()
        .take(MAX_HISTOGRAMS)
        .map(|col| histogram(col))
        .collect();
    if numeric.len() >= 2 {
        attempts.push(correlation(&numeric));
    }
    attempts.extend(categorical.iter().take(MAX_BAR_CHARTS).map(|col| top_values(col)));
    attempts
}

pub fn histogram(column: &Column) -> ChartResult {
    let values = column.numeric_values();
    if values.is_empty() {
        return Err(ChartError::EmptyColumn(column.name.clone()));
    }
    let title = format!("Distribution of {}", column.name);
    Ok(Visualization {
        kind: VizKind::Histogram,
        figure: Figure::histogram(&values, None, HISTOGRAM_FILL, &title, &column.name),
        title,
    })
}

/// Pairwise Pearson coefficients over rows where both columns are present.
/// Undefined pairs (constant or too few rows) render as gaps.
pub fn correlation(columns: &[&Column]) -> ChartResult {
    if columns.len() < 2 {
        return Err(ChartError::TooFewColumns {
            needed: 2,
            found: columns.len(),
        });
    }
    let matrix: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|a| columns.iter().map(|b| paired_correlation(a, b)).collect())
        .collect();
    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

    let title = "Correlation Matrix".to_string();
    Ok(Visualization {
        kind: VizKind::Correlation,
        figure: Figure::matrix(&matrix, &names, (-1.0, 1.0), "RdBu", &title),
        title,
    })
}

fn paired_correlation(a: &Column, b: &Column) -> Option<f64> {
    let (x, y): (Vec<f64>, Vec<f64>) = a
        .values
        .iter()
        .zip(&b.values)
        .filter(|(u, v)| !u.is_missing() && !v.is_missing())
        .filter_map(|(u, v)| Some((u.as_f64()?, v.as_f64()?)))
        .unzip();
    pearson(&x, &y)
}

pub fn top_values(column: &Column) -> ChartResult {
    let counts = value_counts(column);
    if counts.is_empty() {
        return Err(ChartError::EmptyColumn(column.name.clone()));
    }
    let (labels, values): (Vec<String>, Vec<f64>) = counts
        .into_iter()
        .take(BAR_TOP_VALUES)
        .map(|(label, n)| (label, n as f64))
        .unzip();

    let title = format!("Top Values in {}", column.name);
    Ok(Visualization {
        kind: VizKind::Bar,
        figure: Figure::bar(
            &labels,
            &values,
            json!(generate_palette(labels.len())),
            None,
            &title,
            &column.name,
            "Count",
        ),
        title,
    })
}
