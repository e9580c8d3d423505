use std::fmt;

use indexmap::IndexMap;

use crate::viz::Visualization;

/// Ordered key → value summary of one file.
pub type Summary = IndexMap<String, SummaryValue>;

/// One summary entry: a scalar or a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
    Int(i64),
    Float(f64),
    Text(String),
    Map(Summary),
}

impl From<usize> for SummaryValue {
    fn from(v: usize) -> Self {
        SummaryValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<u64> for SummaryValue {
    fn from(v: u64) -> Self {
        SummaryValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<i64> for SummaryValue {
    fn from(v: i64) -> Self {
        SummaryValue::Int(v)
    }
}

impl From<f64> for SummaryValue {
    fn from(v: f64) -> Self {
        SummaryValue::Float(v)
    }
}

impl From<&str> for SummaryValue {
    fn from(v: &str) -> Self {
        SummaryValue::Text(v.to_string())
    }
}

impl From<String> for SummaryValue {
    fn from(v: String) -> Self {
        SummaryValue::Text(v)
    }
}

impl From<Summary> for SummaryValue {
    fn from(v: Summary) -> Self {
        SummaryValue::Map(v)
    }
}

impl SummaryValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SummaryValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SummaryValue::Float(v) => Some(*v),
            SummaryValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Summary> {
        match self {
            SummaryValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Display rules of the dashboard: integers get thousands separators,
/// floats four decimals, nested maps render as `{key: value, ..}`.
impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Int(v) => f.write_str(&group_thousands(*v)),
            SummaryValue::Float(v) if v.is_nan() => f.write_str("NaN"),
            SummaryValue::Float(v) => write!(f, "{v:.4}"),
            SummaryValue::Text(s) => f.write_str(s),
            SummaryValue::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// AnalysisRecord
// ---------------------------------------------------------------------------

/// Everything the report shows about one file.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRecord {
    pub summary: Summary,
    pub insights: Vec<String>,
    visualizations: Vec<Visualization>,
}

impl AnalysisRecord {
    pub fn new(summary: Summary, insights: Vec<String>) -> Self {
        Self {
            summary,
            insights,
            visualizations: Vec::new(),
        }
    }

    /// Attach the charts generated for this file. Consumes the record so
    /// charts are attached exactly once.
    pub fn with_visualizations(mut self, visualizations: Vec<Visualization>) -> Self {
        self.visualizations = visualizations;
        self
    }

    pub fn visualizations(&self) -> &[Visualization] {
        &self.visualizations
    }

    pub fn get(&self, key: &str) -> Option<&SummaryValue> {
        self.summary.get(key)
    }
}
