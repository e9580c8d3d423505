use super::nodata::detect;
use super::record::{AnalysisRecord, Summary};
use super::stats::Spread;
use crate::data::filter::{valid_cells, NoData};
use crate::data::model::RasterDataset;

/// Dimensions, validity counts and value spread of a raster's first band.
///
/// Returns the record together with the effective no-data rule so the
/// chart generator partitions cells the same way.
pub fn analyze(raster: &RasterDataset) -> (AnalysisRecord, Option<NoData>) {
    let meta = raster.meta();
    let detection = detect(raster.grid(), meta.nodata);
    let nodata = detection.nodata;

    let valid = valid_cells(raster.grid(), nodata);
    let total = raster.grid().len();

    let mut summary = Summary::new();
    summary.insert("dimensions".into(), format!("{} × {}", meta.width, meta.height).into());
    summary.insert("bands".into(), meta.bands.into());
    summary.insert("crs".into(), meta.crs.as_str().into());
    summary.insert("data_type".into(), meta.dtype.as_str().into());
    summary.insert("valid_pixels".into(), valid.len().into());
    summary.insert("total_pixels".into(), total.into());

    let mut insights: Vec<String> = detection.note.into_iter().collect();
    if nodata.is_some() {
        insights.push(format!("Spatial data with {} no-data pixels", total - valid.len()));
    } else {
        insights.push("Spatial raster data".to_string());
    }

    if let Some(spread) = Spread::of(&valid) {
        let mut numeric = Summary::new();
        numeric.insert("min".into(), spread.min.into());
        numeric.insert("max".into(), spread.max.into());
        numeric.insert("mean".into(), spread.mean.into());
        numeric.insert("median".into(), spread.median.into());
        numeric.insert("std".into(), spread.std.into());
        summary.insert("numeric_summary".into(), numeric.into());
        insights.push(format!("Data range: {:.4} to {:.4}", spread.min, spread.max));
    }

    (AnalysisRecord::new(summary, insights), nodata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::record::SummaryValue;
    use crate::data::model::RasterMeta;
    use ndarray::{array, Array2};

    fn raster(grid: Array2<f64>, nodata: Option<f64>) -> RasterDataset {
        let (height, width) = grid.dim();
        let meta = RasterMeta {
            width,
            height,
            bands: 1,
            crs: "EPSG:4326".into(),
            bounds: None,
            nodata,
            dtype: "Float32".into(),
        };
        RasterDataset::new(grid, meta).unwrap()
    }

    #[test]
    fn test_declared_sentinel_grid() {
        let grid = array![
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, -9999.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0]
        ];
        let (record, nodata) = analyze(&raster(grid, Some(-9999.0)));
        assert_eq!(nodata, Some(NoData::Declared(-9999.0)));
        assert_eq!(record.get("valid_pixels").and_then(SummaryValue::as_int), Some(15));
        assert_eq!(record.get("total_pixels").and_then(SummaryValue::as_int), Some(16));
        assert_eq!(record.get("dimensions"), Some(&SummaryValue::Text("4 × 4".into())));

        let numeric = record.get("numeric_summary").and_then(SummaryValue::as_map).unwrap();
        assert_eq!(numeric["min"].as_float(), Some(1.0));
        assert_eq!(numeric["max"].as_float(), Some(16.0));
        assert_eq!(record.insights[0], "Spatial data with 1 no-data pixels");
        assert_eq!(record.insights[1], "Data range: 1.0000 to 16.0000");
    }

    #[test]
    fn test_all_invalid_omits_numeric_summary() {
        let grid = Array2::from_elem((2, 3), -9999.0);
        let (record, _) = analyze(&raster(grid, Some(-9999.0)));
        assert_eq!(record.get("valid_pixels").and_then(SummaryValue::as_int), Some(0));
        assert!(record.get("numeric_summary").is_none());
        assert_eq!(record.insights, vec!["Spatial data with 6 no-data pixels".to_string()]);
    }

    #[test]
    fn test_empty_raster() {
        let (record, nodata) = analyze(&raster(Array2::zeros((0, 0)), None));
        assert!(nodata.is_none());
        assert_eq!(record.get("total_pixels").and_then(SummaryValue::as_int), Some(0));
        assert!(record.get("numeric_summary").is_none());
        assert_eq!(record.insights, vec!["Spatial raster data".to_string()]);
    }

    #[test]
    fn test_inferred_sentinel_reaches_insights_and_counts() {
        let mut grid = Array2::from_shape_fn((40, 40), |(r, c)| (r * 40 + c) as f64 / 16.0);
        grid[[5, 7]] = -1e9;

        let (record, nodata) = analyze(&raster(grid, None));
        let Some(NoData::Inferred(threshold)) = nodata else {
            panic!("expected an inferred threshold, got {nodata:?}");
        };
        assert!(threshold > -1e9 && threshold < 0.0);
        assert!(record.insights[0].starts_with("Detected likely no-data values below"));
        assert_eq!(record.insights[1], "Spatial data with 1 no-data pixels");
        assert_eq!(record.get("valid_pixels").and_then(SummaryValue::as_int), Some(1599));
        assert_eq!(record.get("total_pixels").and_then(SummaryValue::as_int), Some(1600));

        let numeric = record.get("numeric_summary").and_then(SummaryValue::as_map).unwrap();
        assert!(numeric["min"].as_float().unwrap() >= 0.0);
    }
}
