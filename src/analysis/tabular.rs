use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::record::{AnalysisRecord, Summary, SummaryValue};
use super::stats::Describe;
use crate::data::model::{CellValue, Column, ColumnKind, TabularDataset};

/// Categorical values listed in the summary.
const TOP_VALUES: usize = 5;
/// Fixed overhead pandas reports for a default range index.
const INDEX_BYTES: usize = 128;

/// Shape, column kinds, data-quality counts and per-column summaries.
pub fn analyze(table: &TabularDataset) -> AnalysisRecord {
    let mut summary = Summary::new();
    let mut insights = Vec::new();

    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    let dtypes: Summary = table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.kind.label().into()))
        .collect();
    let missing: Summary = table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.missing_count().into()))
        .collect();
    let total_missing: usize = table.columns().iter().map(Column::missing_count).sum();
    let duplicates = duplicate_rows(table);

    summary.insert("row_count".into(), table.row_count().into());
    summary.insert("column_count".into(), table.column_count().into());
    summary.insert("columns".into(), names.join(", ").into());
    summary.insert("dtypes".into(), dtypes.into());
    summary.insert("memory_usage".into(), memory_usage(table).into());
    summary.insert("missing_values".into(), missing.into());
    summary.insert("duplicates".into(), duplicates.into());

    if total_missing > 0 {
        insights.push(format!("Found {total_missing} missing values"));
    }
    if duplicates > 0 {
        insights.push(format!("Found {duplicates} duplicate rows"));
    }

    let numeric: Vec<&Column> = table.columns_of(ColumnKind::Numeric).collect();
    if !numeric.is_empty() {
        let per_column: Summary = numeric
            .iter()
            .map(|c| (c.name.clone(), describe_summary(&Describe::of(&c.numeric_values())).into()))
            .collect();
        summary.insert("numeric_summary".into(), per_column.into());
        insights.push(format!("Found {} numeric columns for analysis", numeric.len()));
    }

    let categorical: Vec<&Column> = table.columns_of(ColumnKind::Categorical).collect();
    if !categorical.is_empty() {
        let per_column: Summary = categorical
            .iter()
            .map(|c| (c.name.clone(), categorical_summary(c).into()))
            .collect();
        summary.insert("categorical_summary".into(), per_column.into());
        insights.push(format!("Found {} categorical columns", categorical.len()));
    }

    AnalysisRecord::new(summary, insights)
}

/// Rows whose full value tuple equals an earlier row's.
pub fn duplicate_rows(table: &TabularDataset) -> usize {
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .filter(|&i| !seen.insert(table.row(i)))
        .count()
}

/// Estimated in-memory footprint in bytes.
pub fn memory_usage(table: &TabularDataset) -> usize {
    let cells: usize = table
        .columns()
        .iter()
        .flat_map(|c| c.values.iter())
        .map(CellValue::estimated_bytes)
        .sum();
    INDEX_BYTES + cells
}

/// Non-missing value counts in descending order; ties keep first-seen order.
///
/// Values are counted as typed cells. When two distinct cells print the
/// same (`1` and `"1"` in a mixed column), text cells are labelled quoted
/// so every label stays unique.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&CellValue, usize> = IndexMap::new();
    for v in column.values.iter().filter(|v| !v.is_missing()) {
        *counts.entry(v).or_default() += 1;
    }

    let mut printed: HashMap<String, usize> = HashMap::with_capacity(counts.len());
    for v in counts.keys() {
        *printed.entry(v.to_string()).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, n)| (value_label(v, &printed), n))
        .collect();
    // Stable sort keeps encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn value_label(v: &CellValue, printed: &HashMap<String, usize>) -> String {
    let text = v.to_string();
    let clashes = printed.get(&text).is_some_and(|&n| n > 1);
    match v {
        CellValue::String(_) | CellValue::Date(_) if clashes => format!("'{text}'"),
        _ => text,
    }
}

fn describe_summary(d: &Describe) -> Summary {
    let mut s = Summary::new();
    s.insert("count".into(), d.count.into());
    s.insert("mean".into(), d.mean.into());
    s.insert("std".into(), d.std.into());
    s.insert("min".into(), d.min.into());
    s.insert("25%".into(), d.q25.into());
    s.insert("50%".into(), d.q50.into());
    s.insert("75%".into(), d.q75.into());
    s.insert("max".into(), d.max.into());
    s
}

fn categorical_summary(column: &Column) -> Summary {
    let counts = value_counts(column);
    let top: Summary = counts
        .iter()
        .take(TOP_VALUES)
        .map(|(v, n)| (v.clone(), (*n).into()))
        .collect();
    let mut s = Summary::new();
    s.insert("unique_values".into(), counts.len().into());
    s.insert("top_values".into(), SummaryValue::Map(top));
    s
}
