use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::SystemTime;

use ndarray::Array2;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Rows are hashed whole for duplicate detection, so `CellValue` must be
/// `Eq + Hash` with a missing value equal to another missing value.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date / timestamp kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so rows can be compared and counted --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Missing cells: explicit nulls and float NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Rough in-memory size of the cell, in the spirit of pandas'
    /// `memory_usage(deep=True)`: 8 bytes per numeric slot, an object header
    /// plus payload for text.
    pub fn estimated_bytes(&self) -> usize {
        match self {
            CellValue::Bool(_) => 1,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null => 8,
            CellValue::String(s) | CellValue::Date(s) => 8 + 49 + s.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / TabularDataset
// ---------------------------------------------------------------------------

/// Scalar kind inferred for a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Boolean,
    Temporal,
    /// Every value is missing.
    Empty,
}

impl ColumnKind {
    /// Infer the kind from the non-missing values of a column.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut present = values.iter().filter(|v| !v.is_missing()).peekable();
        if present.peek().is_none() {
            // NaN-only float columns are still numeric in pandas.
            if values.iter().any(|v| matches!(v, CellValue::Float(_))) {
                return ColumnKind::Numeric;
            }
            return ColumnKind::Empty;
        }
        let mut numeric = true;
        let mut boolean = true;
        let mut temporal = true;
        for v in present {
            numeric &= matches!(v, CellValue::Integer(_) | CellValue::Float(_));
            boolean &= matches!(v, CellValue::Bool(_));
            temporal &= matches!(v, CellValue::Date(_));
        }
        if numeric {
            ColumnKind::Numeric
        } else if boolean {
            ColumnKind::Boolean
        } else if temporal {
            ColumnKind::Temporal
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Empty => "empty",
        }
    }
}

/// One named column with its inferred kind.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its kind. Mixed int/float numeric columns
    /// are widened to float the way pandas widens them.
    pub fn new(name: impl Into<String>, mut values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        if kind == ColumnKind::Numeric && values.iter().any(|v| matches!(v, CellValue::Float(_))) {
            for v in &mut values {
                if let CellValue::Integer(i) = v {
                    *v = CellValue::Float(*i as f64);
                }
            }
        }
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Non-missing numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter(|v| !v.is_missing())
            .filter_map(CellValue::as_f64)
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// A rectangular table: ordered columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct TabularDataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl TabularDataset {
    /// Build a table from columns; every column must have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, DashboardError> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != row_count) {
            return Err(DashboardError::RaggedTable {
                column: bad.name.clone(),
                expected: row_count,
                found: bad.values.len(),
            });
        }
        Ok(TabularDataset { columns, row_count })
    }

    /// Build a table from a header and row-major records. Short records are
    /// padded with nulls, long records are truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut buckets: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            let mut cells = row.into_iter();
            for bucket in &mut buckets {
                bucket.push(cells.next().unwrap_or(CellValue::Null));
            }
        }
        let row_count = buckets.first().map(Vec::len).unwrap_or(0);
        let columns = headers
            .into_iter()
            .zip(buckets)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        TabularDataset { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// The whole value tuple of one row.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }
}

// ---------------------------------------------------------------------------
// RasterDataset
// ---------------------------------------------------------------------------

/// Spatial extent of a raster in CRS units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

/// Metadata reported by the raster decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMeta {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub crs: String,
    pub bounds: Option<Bounds>,
    /// Declared no-data pixel code, if the file carries one.
    pub nodata: Option<f64>,
    /// Element type name as reported by the decoder (e.g. `Float32`).
    pub dtype: String,
}

/// First band of a raster plus its metadata.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    grid: Array2<f64>,
    meta: RasterMeta,
}

impl RasterDataset {
    /// The grid is `height × width` and must match the metadata.
    pub fn new(grid: Array2<f64>, meta: RasterMeta) -> Result<Self, DashboardError> {
        let (rows, cols) = grid.dim();
        if rows != meta.height || cols != meta.width {
            return Err(DashboardError::InvalidRaster {
                expected: (meta.width, meta.height),
                found: (cols, rows),
            });
        }
        Ok(RasterDataset { grid, meta })
    }

    pub fn grid(&self) -> &Array2<f64> {
        &self.grid
    }

    pub fn meta(&self) -> &RasterMeta {
        &self.meta
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The closed set of input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Csv,
    Excel,
    Json,
    Parquet,
    Pickle,
    Hdf5,
    Raster,
}

impl SourceKind {
    /// Format for a lower-cased file extension, ignoring capabilities.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(SourceKind::Csv),
            "xlsx" | "xls" => Some(SourceKind::Excel),
            "json" => Some(SourceKind::Json),
            "parquet" | "pq" => Some(SourceKind::Parquet),
            "pkl" | "pickle" => Some(SourceKind::Pickle),
            "h5" | "hdf5" => Some(SourceKind::Hdf5),
            "tif" | "tiff" => Some(SourceKind::Raster),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::Excel => "excel",
            SourceKind::Json => "json",
            SourceKind::Parquet => "parquet",
            SourceKind::Pickle => "pickle",
            SourceKind::Hdf5 => "hdf5",
            SourceKind::Raster => "raster",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One discovered input file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub name: String,
    pub path: PathBuf,
    pub kind: SourceKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Decoded content of one source.
#[derive(Debug, Clone)]
pub enum Dataset {
    Tabular(TabularDataset),
    Raster(RasterDataset),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inference() {
        let numeric = vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)];
        assert_eq!(ColumnKind::infer(&numeric), ColumnKind::Numeric);

        let mixed = vec![CellValue::Integer(1), CellValue::String("a".into())];
        assert_eq!(ColumnKind::infer(&mixed), ColumnKind::Categorical);

        let empty = vec![CellValue::Null, CellValue::Null];
        assert_eq!(ColumnKind::infer(&empty), ColumnKind::Empty);

        let flags = vec![CellValue::Bool(true), CellValue::Null];
        assert_eq!(ColumnKind::infer(&flags), ColumnKind::Boolean);
    }

    #[test]
    fn test_mixed_numeric_widened_to_float() {
        let col = Column::new("x", vec![CellValue::Integer(1), CellValue::Float(2.5)]);
        assert!(matches!(col.values[0], CellValue::Float(v) if v == 1.0));
    }

    #[test]
    fn test_missing_values_compare_equal() {
        assert_eq!(CellValue::Null, CellValue::Null);
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Integer(1), CellValue::Float(1.0));
    }

    #[test]
    fn test_ragged_table_rejected() {
        let cols = vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            Column::new("b", vec![CellValue::Integer(1)]),
        ];
        assert!(TabularDataset::new(cols).is_err());
    }

    #[test]
    fn test_from_rows_pads_short_records() {
        let table = TabularDataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Integer(1)], vec![CellValue::Integer(2), CellValue::Integer(3)]],
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns()[1].values[0], CellValue::Null);
    }

    #[test]
    fn test_raster_dimensions_checked() {
        let meta = RasterMeta {
            width: 3,
            height: 2,
            bands: 1,
            crs: "unknown".into(),
            bounds: None,
            nodata: None,
            dtype: "Float64".into(),
        };
        assert!(RasterDataset::new(Array2::zeros((2, 3)), meta.clone()).is_ok());
        assert!(RasterDataset::new(Array2::zeros((3, 2)), meta).is_err());
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(SourceKind::from_extension("tiff"), Some(SourceKind::Raster));
        assert_eq!(SourceKind::from_extension("pq"), Some(SourceKind::Parquet));
        assert_eq!(SourceKind::from_extension("html"), None);
    }
}
