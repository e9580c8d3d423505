//! No-data detection for raster grids

use ndarray::Array2;

use super::stats::{percentile, sorted};
use crate::data::filter::NoData;

/// A minimum this many inter-percentile ranges below `q1` marks a sentinel.
const OUTLIER_SPANS: f64 = 100.0;
/// The inferred threshold sits this many ranges below `q1`.
const THRESHOLD_SPANS: f64 = 10.0;

/// Outcome of no-data detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub nodata: Option<NoData>,
    /// Human-readable note when the rule was inferred rather than declared.
    pub note: Option<String>,
}

/// Decide which raster cells count as missing.
///
/// A declared pixel code is trusted as-is. Otherwise the finite values are
/// inspected: if the minimum lies more than 100 × (q99 − q1) below q1, a long
/// negative tail is assumed to be fill values and everything at or below
/// q1 − 10 × (q99 − q1) is treated as missing. Never fails; degenerate grids
/// (empty, constant, all non-finite) yield no rule.
pub fn detect(grid: &Array2<f64>, declared: Option<f64>) -> Detection {
    if let Some(code) = declared {
        return Detection {
            nodata: Some(NoData::Declared(code)),
            note: None,
        };
    }

    let finite: Vec<f64> = grid.iter().copied().filter(|v| v.is_finite()).collect();
    let finite = sorted(&finite);
    let (Some(q1), Some(q99), Some(&min)) =
        (percentile(&finite, 1.0), percentile(&finite, 99.0), finite.first())
    else {
        return Detection {
            nodata: None,
            note: None,
        };
    };

    let span = q99 - q1;
    if min < q1 - OUTLIER_SPANS * span {
        let threshold = q1 - THRESHOLD_SPANS * span;
        log::info!("Detected likely no-data values below {threshold:.2}");
        return Detection {
            nodata: Some(NoData::Inferred(threshold)),
            note: Some(format!("Detected likely no-data values below {threshold:.2}")),
        };
    }

    Detection {
        nodata: None,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::valid_cells;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn uniform_grid(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::from_shape_simple_fn((rows, cols), || rng.gen_range(0.0..=100.0))
    }

    #[test]
    fn test_declared_sentinel_trusted() {
        let grid = uniform_grid(4, 4, 1);
        let d = detect(&grid, Some(-9999.0));
        assert_eq!(d.nodata, Some(NoData::Declared(-9999.0)));
        assert!(d.note.is_none());
    }

    #[test]
    fn test_injected_outlier_is_detected() {
        let mut grid = uniform_grid(50, 50, 7);
        grid[[10, 20]] = -1e9;

        let d = detect(&grid, None);
        let Some(NoData::Inferred(threshold)) = d.nodata else {
            panic!("expected an inferred threshold, got {:?}", d.nodata);
        };
        assert!(threshold > -1e9 && threshold < 0.0);
        assert!(d.note.is_some());

        let valid = valid_cells(&grid, d.nodata);
        assert_eq!(valid.len(), 50 * 50 - 1);
        assert!(valid.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_no_outliers_means_no_sentinel() {
        let grid = uniform_grid(50, 50, 11);
        assert_eq!(detect(&grid, None).nodata, None);
    }

    #[test]
    fn test_degenerate_grids() {
        assert_eq!(detect(&Array2::zeros((0, 0)), None).nodata, None);
        assert_eq!(detect(&Array2::from_elem((3, 3), 5.0), None).nodata, None);
        assert_eq!(detect(&Array2::from_elem((2, 2), f64::NAN), None).nodata, None);
        let mixed = ndarray::array![[f64::NEG_INFINITY, 1.0], [f64::INFINITY, 1.0]];
        assert_eq!(detect(&mixed, None).nodata, None);
    }
}
