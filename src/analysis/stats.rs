//! Descriptive statistics shared by the analyzers and chart generators

/// Sort a copy of `values` in ascending order (total order, NaN last).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Percentile `p` in `[0, 100]` of pre-sorted data using linear
/// interpolation between closest ranks. `None` for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (sorted.len() - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    Some(interpolate(sorted, idx))
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom
/// (0 = population, 1 = sample). `None` when `len <= ddof`.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((sum_sq / (values.len() - ddof) as f64).sqrt())
}

/// Pearson correlation of paired samples. `None` for fewer than two pairs
/// or a constant input.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        None
    } else {
        Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// The `describe()` set for one numeric column. Sample standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// NaN fields where the statistic is undefined (empty input, or `std`
    /// of a single value).
    pub fn of(values: &[f64]) -> Self {
        let sorted = sorted(values);
        let pct = |p| percentile(&sorted, p).unwrap_or(f64::NAN);
        Describe {
            count: values.len(),
            mean: mean(values).unwrap_or(f64::NAN),
            std: std_dev(values, 1).unwrap_or(f64::NAN),
            min: pct(0.0),
            q25: pct(25.0),
            q50: pct(50.0),
            q75: pct(75.0),
            max: pct(100.0),
        }
    }
}

/// Min / max / mean / median / population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

impl Spread {
    pub fn of(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        Some(Spread {
            min: *sorted.first()?,
            max: *sorted.last()?,
            mean: mean(values)?,
            median: percentile(&sorted, 50.0)?,
            std: std_dev(values, 0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let data = sorted(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 50.0), Some(2.5));
        assert_eq!(percentile(&data, 100.0), Some(4.0));
        assert!((percentile(&data, 25.0).unwrap() - 1.75).abs() < 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_std_dev_ddof() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&data, 0).unwrap() - 2.0).abs() < 1e-12);
        assert!((std_dev(&data, 1).unwrap() - 2.138089935299395).abs() < 1e-12);
        assert_eq!(std_dev(&[1.0], 1), None);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&x, &[2.0, 4.0, 6.0, 8.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &[8.0, 6.0, 4.0, 2.0]).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]), None);
    }

    #[test]
    fn test_describe_single_value() {
        let d = Describe::of(&[3.0]);
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, 3.0);
        assert!(d.std.is_nan());
        assert_eq!(d.q75, 3.0);
    }

    #[test]
    fn test_spread_empty() {
        assert!(Spread::of(&[]).is_none());
        let s = Spread::of(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert_eq!(s.median, 2.5);
        assert_eq!(s.max, 10.0);
    }
}
