use ndarray::s;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use super::{ChartError, ChartResult, Figure, VizKind, Visualization};
use crate::analysis::stats::Spread;
use crate::color::{HISTOGRAM_FILL, STATISTICS_FILL};
use crate::config::VizConfig;
use crate::data::filter::{displayable_cells, is_displayable, NoData};
use crate::data::model::RasterDataset;

/// Heatmap, statistics bars and value distribution of a raster's first band.
///
/// Cells pass the analyzer's no-data rule and the `±1e10` display filter.
/// A raster with no such cells yields no charts at all.
pub fn charts(raster: &RasterDataset, nodata: Option<NoData>, config: &VizConfig) -> Vec<ChartResult> {
    let cells = displayable_cells(raster.grid(), nodata);
    if cells.is_empty() {
        log::info!("No valid raster cells to chart");
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    vec![
        heatmap(raster, nodata, config),
        statistics(&cells),
        distribution(&cells, config, &mut rng),
    ]
}

/// Nearest-neighbour decimation: every `heatmap_step`-th row and column.
pub fn heatmap(raster: &RasterDataset, nodata: Option<NoData>, config: &VizConfig) -> ChartResult {
    let step = config.heatmap_step.max(1);
    let sampled = raster.grid().slice(s![..;step, ..;step]);

    let z: Vec<Vec<Option<f64>>> = sampled
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|&v| is_displayable(v, nodata).then_some(v))
                .collect()
        })
        .collect();
    if !z.iter().flatten().any(Option::is_some) {
        return Err(ChartError::NoValidCells);
    }

    let (rows, cols) = sampled.dim();
    let x: Vec<f64> = (0..cols).map(|c| (c * step) as f64).collect();
    let y: Vec<f64> = (0..rows).map(|r| (r * step) as f64).collect();

    let title = "Spatial Heatmap".to_string();
    Ok(Visualization {
        kind: VizKind::Heatmap,
        figure: Figure::heatmap(&z, &x, &y, config.heatmap_range, "Viridis", &title),
        title,
    })
}

pub fn statistics(cells: &[f64]) -> ChartResult {
    let spread = Spread::of(cells).ok_or(ChartError::NoValidCells)?;
    let labels: Vec<String> = ["Min", "Max", "Mean", "Median", "Std Dev"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let values = [spread.min, spread.max, spread.mean, spread.median, spread.std];
    let text = values.iter().map(|v| format!("{v:.4}")).collect();

    let title = "Raster Value Statistics".to_string();
    Ok(Visualization {
        kind: VizKind::Statistics,
        figure: Figure::bar(
            &labels,
            &values,
            json!(STATISTICS_FILL),
            Some(text),
            &title,
            "Statistic",
            "Value",
        ),
        title,
    })
}

pub fn distribution<R: Rng>(cells: &[f64], config: &VizConfig, rng: &mut R) -> ChartResult {
    if cells.is_empty() {
        return Err(ChartError::NoValidCells);
    }
    let sample = sample_cells(cells, config.sample_limit, rng);

    let title = "Value Distribution".to_string();
    Ok(Visualization {
        kind: VizKind::Histogram,
        figure: Figure::histogram(&sample, Some(config.histogram_bins), HISTOGRAM_FILL, &title, "Value"),
        title,
    })
}

/// Uniform sample of exactly `limit` cells without replacement, or every
/// cell when there are no more than `limit`.
pub fn sample_cells<R: Rng>(cells: &[f64], limit: usize, rng: &mut R) -> Vec<f64> {
    if cells.len() <= limit {
        return cells.to_vec();
    }
    rand::seq::index::sample(rng, cells.len(), limit)
        .into_iter()
        .map(|i| cells[i])
        .collect()
}
