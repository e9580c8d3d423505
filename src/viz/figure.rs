//! Plotly figure specifications

use serde::Serialize;
use serde_json::{json, Value};

/// A renderable chart: Plotly traces plus layout, serialized as JSON into
/// the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    data: Vec<Value>,
    layout: Value,
}

impl Figure {
    fn new(trace: Value, title: &str, x_title: &str, y_title: &str) -> Self {
        Figure {
            data: vec![trace],
            layout: json!({
                "title": { "text": title },
                "xaxis": { "title": { "text": x_title } },
                "yaxis": { "title": { "text": y_title } },
                "autosize": true,
                "margin": { "t": 60, "r": 30, "b": 60, "l": 60 },
            }),
        }
    }

    pub fn traces(&self) -> &[Value] {
        &self.data
    }

    pub fn layout(&self) -> &Value {
        &self.layout
    }

    /// Raw-value histogram; Plotly bins it, `bins` caps the bin count.
    pub fn histogram(
        values: &[f64],
        bins: Option<usize>,
        color: &str,
        title: &str,
        x_title: &str,
    ) -> Self {
        let mut trace = json!({
            "type": "histogram",
            "x": values,
            "marker": { "color": color },
            "opacity": 0.75,
        });
        if let Some(bins) = bins {
            trace["nbinsx"] = json!(bins);
        }
        Figure::new(trace, title, x_title, "Frequency")
    }

    /// Bar chart with per-bar colours and optional value labels.
    pub fn bar(
        labels: &[String],
        values: &[f64],
        colors: Value,
        text: Option<Vec<String>>,
        title: &str,
        x_title: &str,
        y_title: &str,
    ) -> Self {
        let mut trace = json!({
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": { "color": colors },
        });
        if let Some(text) = text {
            trace["text"] = json!(text);
            trace["textposition"] = json!("auto");
        }
        Figure::new(trace, title, x_title, y_title)
    }

    /// Heatmap over a row-major grid; `None` cells render as gaps.
    pub fn heatmap(
        z: &[Vec<Option<f64>>],
        x: &[f64],
        y: &[f64],
        range: (f64, f64),
        colorscale: &str,
        title: &str,
    ) -> Self {
        let trace = json!({
            "type": "heatmap",
            "z": z,
            "x": x,
            "y": y,
            "zmin": range.0,
            "zmax": range.1,
            "colorscale": colorscale,
            "hoverongaps": false,
        });
        let mut figure = Figure::new(trace, title, "X Coordinate (Pixels)", "Y Coordinate (Pixels)");
        // Row 0 is the top of the raster.
        figure.layout["yaxis"]["autorange"] = json!("reversed");
        figure
    }

    /// Annotated square matrix over `names`.
    pub fn matrix(
        z: &[Vec<Option<f64>>],
        names: &[String],
        range: (f64, f64),
        colorscale: &str,
        title: &str,
    ) -> Self {
        let text: Vec<Vec<String>> = z
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| v.map(|v| format!("{v:.2}")).unwrap_or_default())
                    .collect()
            })
            .collect();
        let trace = json!({
            "type": "heatmap",
            "z": z,
            "x": names,
            "y": names,
            "zmin": range.0,
            "zmax": range.1,
            "colorscale": colorscale,
            "text": text,
            "texttemplate": "%{text}",
            "hoverongaps": false,
        });
        let mut figure = Figure::new(trace, title, "", "");
        figure.layout["yaxis"]["autorange"] = json!("reversed");
        figure
    }
}
