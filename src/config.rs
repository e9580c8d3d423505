use std::path::PathBuf;

use clap::Parser;

use crate::data::model::SourceKind;

/// Parse a colour-scale range in the form "min,max".
fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Range must be in format 'min,max'".to_string());
    }

    let min = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid range minimum".to_string())?;
    let max = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid range maximum".to_string())?;

    if !(min < max) {
        return Err("Range minimum must be below its maximum".to_string());
    }
    Ok((min, max))
}

/// Analyze every supported data file in a folder and write one HTML dashboard.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Folder to scan for data files
    #[arg(default_value = ".")]
    pub data_dir: PathBuf,

    /// Path of the generated dashboard
    #[arg(short, long, default_value = "universal_dashboard.html")]
    pub output: PathBuf,

    /// Dashboard page title
    #[arg(long, default_value = "Universal Data Analyzer Dashboard")]
    pub title: String,

    /// Maximum number of raster cells drawn into the distribution histogram
    #[arg(long, default_value_t = 100_000)]
    pub sample_limit: usize,

    /// Bin count of the raster distribution histogram
    #[arg(long, default_value_t = 50)]
    pub histogram_bins: usize,

    /// Keep every n-th row and column of a raster in its heatmap
    #[arg(long, default_value_t = 4)]
    pub heatmap_step: usize,

    /// Fixed heatmap colour-scale range (format: "min,max")
    #[arg(long, default_value = "6.0,12.0", value_parser = parse_range)]
    pub heatmap_range: (f64, f64),

    /// Seed for the raster histogram sampler
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Chart tuning shared by every visualization generator.
#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    pub sample_limit: usize,
    pub histogram_bins: usize,
    pub heatmap_step: usize,
    pub heatmap_range: (f64, f64),
    pub seed: u64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            sample_limit: 100_000,
            histogram_bins: 50,
            heatmap_step: 4,
            heatmap_range: (6.0, 12.0),
            seed: 42,
        }
    }
}

impl From<&Args> for VizConfig {
    fn from(args: &Args) -> Self {
        Self {
            sample_limit: args.sample_limit,
            histogram_bins: args.histogram_bins.max(1),
            heatmap_step: args.heatmap_step.max(1),
            heatmap_range: args.heatmap_range,
            seed: args.seed,
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Optional decoders compiled into this build. Determined once at startup
/// and handed to discovery; formats whose decoder is missing are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub excel: bool,
    pub parquet: bool,
    pub raster: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Self {
            excel: cfg!(feature = "excel"),
            parquet: cfg!(feature = "parquet"),
            raster: cfg!(feature = "raster"),
        }
    }

    pub fn all() -> Self {
        Self {
            excel: true,
            parquet: true,
            raster: true,
        }
    }

    pub fn supports(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Excel => self.excel,
            SourceKind::Parquet => self.parquet,
            SourceKind::Raster => self.raster,
            SourceKind::Csv | SourceKind::Json | SourceKind::Pickle | SourceKind::Hdf5 => true,
        }
    }

    /// Log each missing capability once.
    pub fn log_missing(&self) {
        if !self.excel {
            log::warn!("Excel support not compiled in - Excel files will be skipped");
        }
        if !self.parquet {
            log::warn!("Parquet support not compiled in - Parquet files will be skipped");
        }
        if !self.raster {
            log::warn!("Raster support not compiled in - TIF files will be skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("6.0, 12.0"), Ok((6.0, 12.0)));
        assert!(parse_range("12,6").is_err());
        assert!(parse_range("1").is_err());
        assert!(parse_range("a,b").is_err());
    }

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["rusty-dashboard"]);
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert_eq!(args.output, PathBuf::from("universal_dashboard.html"));
        assert_eq!(VizConfig::from(&args), VizConfig::default());
    }

    #[test]
    fn test_capability_gating() {
        let caps = Capabilities {
            excel: false,
            parquet: true,
            raster: false,
        };
        assert!(!caps.supports(SourceKind::Excel));
        assert!(!caps.supports(SourceKind::Raster));
        assert!(caps.supports(SourceKind::Parquet));
        assert!(caps.supports(SourceKind::Csv));
    }
}
