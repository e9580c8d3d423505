use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(1e-15);
    let u2 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

const STATIONS: [&str; 4] = ["North", "South", "East", "West"];
const CATEGORIES: [&str; 3] = ["tools", "parts", "supplies"];
const SENSOR_STATES: [&str; 3] = ["ok", "degraded", "offline"];

/// Weather readings with a few blanks and one repeated row.
fn write_weather_csv(path: &Path, rng: &mut StdRng) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "day,station,temperature,humidity,wind_speed")?;

    let mut rows = Vec::new();
    for day in 1..=60 {
        let station = pick(rng, &STATIONS);
        let temperature = format!("{:.1}", gauss(rng, 18.0, 6.0));
        // Every 11th humidity reading is missing.
        let humidity = if day % 11 == 0 {
            String::new()
        } else {
            format!("{:.1}", gauss(rng, 65.0, 12.0).clamp(0.0, 100.0))
        };
        let wind = format!("{:.2}", gauss(rng, 4.0, 1.5).abs());
        rows.push(format!("{day},{station},{temperature},{humidity},{wind}"));
    }
    if let Some(first) = rows.first().cloned() {
        rows.push(first);
    }

    for row in &rows {
        writeln!(out, "{row}")?;
    }
    out.flush()?;
    Ok(rows.len())
}

/// Inventory as JSON records.
fn write_inventory_json(path: &Path, rng: &mut StdRng) -> Result<usize> {
    let records: Vec<_> = (0..40)
        .map(|i| {
            json!({
                "sku": format!("SKU-{i:03}"),
                "category": pick(rng, &CATEGORIES),
                "quantity": (rng.gen::<f64>() * 500.0) as i64,
                "unit_price": (gauss(rng, 25.0, 8.0).abs() * 100.0).round() / 100.0,
                "discontinued": i % 9 == 0,
            })
        })
        .collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
    Ok(records.len())
}

/// Sensor log written through Arrow.
fn write_sensor_parquet(path: &Path, rng: &mut StdRng) -> Result<usize> {
    let n = 200;
    let ids: Vec<i64> = (0..n).collect();
    let voltage: Vec<f64> = (0..n).map(|_| gauss(rng, 3.3, 0.05)).collect();
    let current: Vec<f64> = voltage.iter().map(|v| v * 0.2 + gauss(rng, 0.0, 0.01)).collect();
    let states: Vec<&str> = (0..n).map(|_| pick(rng, &SENSOR_STATES)).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("reading_id", DataType::Int64, false),
        Field::new("voltage", DataType::Float64, false),
        Field::new("current", DataType::Float64, false),
        Field::new("state", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(Float64Array::from(voltage)),
            Arc::new(Float64Array::from(current)),
            Arc::new(StringArray::from(states)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(n as usize)
}

fn main() -> Result<()> {
    let target: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data".to_string())
        .into();
    std::fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let written = [
        ("weather.csv", write_weather_csv(&target.join("weather.csv"), &mut rng)?),
        ("inventory.json", write_inventory_json(&target.join("inventory.json"), &mut rng)?),
        ("sensors.parquet", write_sensor_parquet(&target.join("sensors.parquet"), &mut rng)?),
    ];

    for (name, rows) in written {
        println!("Wrote {rows} rows to {}", target.join(name).display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        assert_eq!(write_weather_csv(&first, &mut StdRng::seed_from_u64(42)).unwrap(), 61);
        write_weather_csv(&second, &mut StdRng::seed_from_u64(42)).unwrap();

        let text = std::fs::read_to_string(&first).unwrap();
        assert_eq!(text, std::fs::read_to_string(&second).unwrap());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], lines[61]);
        assert!(lines[11].contains(",,"));
    }

    #[test]
    fn test_gauss_and_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<f64> = (0..2000).map(|_| gauss(&mut rng, 10.0, 2.0)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 10.0).abs() < 0.3);
        assert!(STATIONS.contains(&pick(&mut rng, &STATIONS)));
    }
}
