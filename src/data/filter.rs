use ndarray::Array2;

/// Values beyond this magnitude are never drawn, whatever the sentinel says.
pub const DISPLAY_LIMIT: f64 = 1e10;

// ---------------------------------------------------------------------------
// No-data predicate: which raster cells count as missing
// ---------------------------------------------------------------------------

/// Effective no-data rule for one raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoData {
    /// Pixel code declared by the file; only exact matches are missing.
    Declared(f64),
    /// Threshold inferred from the value distribution; every value at or
    /// below it is missing.
    Inferred(f64),
}

impl NoData {
    pub fn value(&self) -> f64 {
        match self {
            NoData::Declared(v) | NoData::Inferred(v) => *v,
        }
    }

    pub fn matches(&self, v: f64) -> bool {
        match self {
            NoData::Declared(code) => v == *code,
            NoData::Inferred(threshold) => v <= *threshold,
        }
    }
}

/// A cell is valid when it is finite and not flagged by the no-data rule.
pub fn is_valid(v: f64, nodata: Option<NoData>) -> bool {
    v.is_finite() && !nodata.is_some_and(|n| n.matches(v))
}

/// Stricter filter used for charts: valid and inside `±DISPLAY_LIMIT`.
pub fn is_displayable(v: f64, nodata: Option<NoData>) -> bool {
    is_valid(v, nodata) && v > -DISPLAY_LIMIT && v < DISPLAY_LIMIT
}

/// Valid cells in row-major order.
pub fn valid_cells(grid: &Array2<f64>, nodata: Option<NoData>) -> Vec<f64> {
    grid.iter().copied().filter(|&v| is_valid(v, nodata)).collect()
}

/// Displayable cells in row-major order.
pub fn displayable_cells(grid: &Array2<f64>, nodata: Option<NoData>) -> Vec<f64> {
    grid.iter().copied().filter(|&v| is_displayable(v, nodata)).collect()
}
