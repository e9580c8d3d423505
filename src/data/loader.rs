use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, DataSource, Dataset, SourceKind, TabularDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode one discovered source. Dispatch by detected format.
///
/// Supported formats:
/// * `csv`     – header row plus records, cell types guessed per cell
/// * `json`    – records (`[{..}]`), columns (`{col: [..]}`) or index (`{col: {idx: v}}`)
/// * `pickle`  – a pickled records list or column dict of plain values
/// * `parquet` – any flat Arrow schema (feature `parquet`)
/// * `excel`   – first worksheet, first row as header (feature `excel`)
/// * `raster`  – band 1 of a GDAL-readable raster (feature `raster`)
pub fn load_source(source: &DataSource) -> Result<Dataset> {
    let path = source.path.as_path();
    match source.kind {
        SourceKind::Csv => load_csv(path).map(Dataset::Tabular),
        SourceKind::Json => load_json(path).map(Dataset::Tabular),
        SourceKind::Pickle => load_pickle(path).map(Dataset::Tabular),
        SourceKind::Parquet => load_parquet(path).map(Dataset::Tabular),
        SourceKind::Excel => load_excel(path).map(Dataset::Tabular),
        SourceKind::Hdf5 => bail!("HDF5 decoding is not available in this build"),
        SourceKind::Raster => load_raster(path).map(Dataset::Raster),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Ragged records are padded with nulls.
pub fn load_csv(path: &Path) -> Result<TabularDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(TabularDataset::from_rows(headers, rows))
}

/// Mirror the missing-value and boolean spellings pandas recognises.
fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if matches!(s, "" | "NA" | "N/A" | "NaN" | "nan" | "null" | "NULL" | "None") {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON / pickle loaders
// ---------------------------------------------------------------------------

pub fn load_json(path: &Path) -> Result<TabularDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    table_from_json(&root)
}

/// Pickles are decoded into the same JSON tree as `.json` input, so only
/// plain containers (lists, string-keyed dicts, scalars) are readable.
pub fn load_pickle(path: &Path) -> Result<TabularDataset> {
    let file = std::fs::File::open(path).context("opening pickle file")?;
    let root: JsonValue =
        serde_pickle::from_reader(std::io::BufReader::new(file), serde_pickle::DeOptions::new())
            .context("unpickling (only plain lists and dicts are supported)")?;
    table_from_json(&root)
}

/// Accepted layouts:
///
/// ```json
/// [ {"age": 25, "city": "A"}, {"age": 30, "city": "B"} ]   // records
/// { "age": [25, 30], "city": ["A", "B"] }                 // columns
/// { "age": {"0": 25, "1": 30}, "city": {"0": "A"} }        // index
/// ```
pub fn table_from_json(root: &JsonValue) -> Result<TabularDataset> {
    match root {
        JsonValue::Array(records) => {
            let mut columns: IndexMap<String, Vec<CellValue>> = IndexMap::new();
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .with_context(|| format!("Row {i} is not a JSON object"))?;
                for (key, val) in obj {
                    let values = columns
                        .entry(key.clone())
                        .or_insert_with(|| vec![CellValue::Null; i]);
                    values.push(json_to_cell(val));
                }
                // Keys absent from this record stay missing.
                for values in columns.values_mut() {
                    values.resize(i + 1, CellValue::Null);
                }
            }
            finish_columns(columns)
        }
        JsonValue::Object(map) => {
            if map.values().all(JsonValue::is_array) {
                let columns = map
                    .iter()
                    .map(|(key, val)| {
                        let values = val
                            .as_array()
                            .map(|arr| arr.iter().map(json_to_cell).collect())
                            .unwrap_or_default();
                        (key.clone(), values)
                    })
                    .collect();
                return finish_columns(columns);
            }

            let mut index: IndexMap<&str, ()> = IndexMap::new();
            for (key, val) in map {
                let inner = val
                    .as_object()
                    .with_context(|| format!("Column '{key}' is neither an array nor an object"))?;
                for label in inner.keys() {
                    index.insert(label.as_str(), ());
                }
            }
            let columns = map
                .iter()
                .map(|(key, val)| {
                    let values = index
                        .keys()
                        .map(|label| val.get(*label).map(json_to_cell).unwrap_or(CellValue::Null))
                        .collect();
                    (key.clone(), values)
                })
                .collect();
            finish_columns(columns)
        }
        _ => bail!("Expected a JSON array of records or an object of columns"),
    }
}

fn finish_columns(columns: IndexMap<String, Vec<CellValue>>) -> Result<TabularDataset> {
    let columns = columns
        .into_iter()
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(TabularDataset::new(columns)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every column of a Parquet file. Works with files written by both
/// Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
#[cfg(feature = "parquet")]
pub fn load_parquet(path: &Path) -> Result<TabularDataset> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut buckets: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, bucket) in buckets.iter_mut().enumerate() {
            let col_array = batch.column(col_idx);
            bucket.extend((0..batch.num_rows()).map(|row| extract_cell_value(col_array, row)));
        }
    }

    let columns = names
        .into_iter()
        .zip(buckets)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(TabularDataset::new(columns)?)
}

#[cfg(not(feature = "parquet"))]
pub fn load_parquet(_path: &Path) -> Result<TabularDataset> {
    bail!("Parquet support not compiled in")
}

/// Extract a single cell from an Arrow column at a given row.
#[cfg(feature = "parquet")]
fn extract_cell_value(col: &arrow::array::ArrayRef, row: usize) -> CellValue {
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::{
        DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
        UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    };
    use arrow::util::display::array_value_to_string;

    if col.is_null(row) {
        return CellValue::Null;
    }
    let display = || array_value_to_string(col, row).unwrap_or_else(|_| format!("{:?}", col.data_type()));
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            CellValue::Date(display())
        }
        _ => CellValue::String(display()),
    }
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

#[cfg(feature = "excel")]
pub fn load_excel(path: &Path) -> Result<TabularDataset> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| anyhow::anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow::anyhow!("reading first worksheet: {e}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let records = rows
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Int(i) => CellValue::Integer(*i),
                    Data::Float(f) => CellValue::Float(*f),
                    Data::String(s) if s.trim().is_empty() => CellValue::Null,
                    Data::String(s) => CellValue::String(s.clone()),
                    Data::Bool(b) => CellValue::Bool(*b),
                    Data::DateTime(_) | Data::DateTimeIso(_) => CellValue::Date(cell.to_string()),
                    _ => CellValue::Null,
                })
                .collect()
        })
        .collect();

    Ok(TabularDataset::from_rows(headers, records))
}

#[cfg(not(feature = "excel"))]
pub fn load_excel(_path: &Path) -> Result<TabularDataset> {
    bail!("Excel support not compiled in")
}

// ---------------------------------------------------------------------------
// Raster loader
// ---------------------------------------------------------------------------

/// Read band 1 and the spatial metadata of a GDAL-readable raster.
#[cfg(feature = "raster")]
pub fn load_raster(path: &Path) -> Result<super::model::RasterDataset> {
    use gdal::raster::Buffer;
    use gdal::Dataset as GdalDataset;
    use ndarray::Array2;

    use super::model::{Bounds, RasterDataset, RasterMeta};

    let ds = GdalDataset::open(path).context("opening raster")?;
    let (width, height) = ds.raster_size();
    let band = ds.rasterband(1).context("reading band 1")?;

    let buffer: Buffer<f64> = band
        .read_as((0, 0), (width, height), (width, height), None)
        .context("reading band 1 pixels")?;
    let grid = Array2::from_shape_vec((height, width), buffer.data().to_vec())
        .context("reshaping band 1")?;

    let crs = ds
        .spatial_ref()
        .ok()
        .and_then(|srs| srs.to_wkt().ok())
        .filter(|wkt| !wkt.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let bounds = ds.geo_transform().ok().map(|gt| Bounds {
        left: gt[0],
        top: gt[3],
        right: gt[0] + gt[1] * width as f64,
        bottom: gt[3] + gt[5] * height as f64,
    });

    let meta = RasterMeta {
        width,
        height,
        bands: ds.raster_count() as usize,
        crs,
        bounds,
        nodata: band.no_data_value(),
        dtype: format!("{:?}", band.band_type()),
    };
    Ok(RasterDataset::new(grid, meta)?)
}

#[cfg(not(feature = "raster"))]
pub fn load_raster(_path: &Path) -> Result<super::model::RasterDataset> {
    bail!("Raster support not compiled in")
}
