//! Single-page HTML rendering of a [`Report`].
//!
//! The page is self-contained apart from the Plotly script loaded from its
//! CDN. Rendering only reads the report, so the same report always yields
//! the same bytes.

use super::Report;
use crate::analysis::{Summary, SummaryValue};
use crate::viz::Visualization;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const THEME_KEY: &str = "universal_dashboard_theme";
const NO_CHARTS: &str = "No visualizations available for this file type.";

/// Render the whole dashboard.
pub fn render(report: &Report, title: &str) -> String {
    let title = escape(title);
    let mut out = String::with_capacity(64 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str(&format!("<style>{STYLE}</style>\n"));
    out.push_str(&format!("<script src=\"{PLOTLY_CDN}\"></script>\n"));
    out.push_str("</head>\n<body>\n");

    render_nav(&mut out, report);

    out.push_str("<div class=\"header\">\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));
    out.push_str("<p>Automatic analysis of tabular and raster data files</p>\n</div>\n");

    out.push_str("<div class=\"container\">\n");
    render_overview(&mut out, report);
    for (index, entry) in report.entries().iter().enumerate() {
        render_section(
            &mut out,
            index,
            &entry.source.name,
            &entry.record.insights,
            &entry.record.summary,
            entry.record.visualizations(),
        );
    }
    out.push_str("<footer>Generated by rusty-dashboard</footer>\n</div>\n");

    out.push_str(&format!("<script>{}</script>\n", theme_script()));
    out.push_str("</body>\n</html>\n");
    out
}

fn render_nav(out: &mut String, report: &Report) {
    out.push_str("<nav class=\"navbar\">\n<div class=\"container nav-inner\">\n");
    out.push_str("<div class=\"brand\">Universal Data Analyzer</div>\n<div class=\"links\">");
    for (index, entry) in report.entries().iter().enumerate() {
        let name = &entry.source.name;
        out.push_str(&format!(
            "<a href=\"#{}\">{}</a>",
            escape(&section_id(index, name)),
            escape(name)
        ));
    }
    out.push_str("</div>\n");
    out.push_str(
        "<button id=\"themeToggle\" class=\"toggle\" aria-label=\"Toggle theme\">Dark</button>\n",
    );
    out.push_str("</div>\n</nav>\n");
}

fn render_overview(out: &mut String, report: &Report) {
    let stats = report.stats();
    let megabytes = stats.total_bytes as f64 / 1024.0 / 1024.0;

    out.push_str("<div class=\"overview\">\n<h2>Analysis Overview</h2>\n<div class=\"stats-grid\">\n");
    stat_tile(out, "Files Analyzed", &stats.file_count.to_string());
    stat_tile(out, "File Types", &stats.type_count.to_string());
    stat_tile(out, "Total Size", &format!("{megabytes:.1} MB"));
    stat_tile(out, "Visualizations", &stats.visualization_count.to_string());
    out.push_str("</div>\n</div>\n");
}

fn stat_tile(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<div class=\"stat\"><h3>{}</h3><div class=\"value\">{}</div></div>\n",
        escape(label),
        escape(value)
    ));
}

fn render_section(
    out: &mut String,
    index: usize,
    name: &str,
    insights: &[String],
    summary: &Summary,
    charts: &[Visualization],
) {
    out.push_str(&format!(
        "<section id=\"{}\" class=\"section\">\n<h2>{}</h2>\n",
        escape(&section_id(index, name)),
        escape(name)
    ));

    if !insights.is_empty() {
        out.push_str("<ul class=\"insights\">\n");
        for insight in insights {
            out.push_str(&format!("<li>{}</li>\n", escape(insight)));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("<div class=\"file-summary\">\n<h3>File Summary</h3>\n<div class=\"summary-grid\">\n");
    for (label, value) in summary_tiles(summary) {
        out.push_str(&format!(
            "<div class=\"summary-item\"><h4>{}</h4><div class=\"value\">{}</div></div>\n",
            escape(&label),
            escape(&value)
        ));
    }
    out.push_str("</div>\n</div>\n");

    if charts.is_empty() {
        out.push_str(&format!("<div class=\"no-viz\"><p>{NO_CHARTS}</p></div>\n"));
    }
    for (position, viz) in charts.iter().enumerate() {
        render_chart(out, &chart_id(index, position), viz);
    }
    out.push_str("</section>\n");
}

fn render_chart(out: &mut String, id: &str, viz: &Visualization) {
    out.push_str(&format!("<div class=\"chart\">\n<h3>{}</h3>\n", escape(&viz.title)));
    out.push_str(&format!(
        "<div class=\"chart-container\"><div id=\"{id}\" class=\"plotly-graph-div\"></div></div>\n"
    ));

    let data = serde_json::to_string(viz.figure.traces());
    let layout = serde_json::to_string(viz.figure.layout());
    match (data, layout) {
        (Ok(data), Ok(layout)) => {
            out.push_str(&format!(
                "<script>Plotly.newPlot(\"{id}\", {}, {}, {{\"responsive\": true}});</script>\n",
                script_safe(&data),
                script_safe(&layout)
            ));
        }
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("Could not serialize chart '{}': {e}", viz.title);
        }
    }
    out.push_str("</div>\n");
}

/// Summary entries as (label, value) tiles. Nested mappings are flattened
/// one level; each nested entry gets its own tile labelled by its key.
pub fn summary_tiles(summary: &Summary) -> Vec<(String, String)> {
    let mut tiles = Vec::with_capacity(summary.len());
    for (key, value) in summary {
        match value {
            SummaryValue::Map(nested) => {
                for (sub_key, sub_value) in nested {
                    tiles.push((label(sub_key), sub_value.to_string()));
                }
            }
            other => tiles.push((label(key), other.to_string())),
        }
    }
    tiles
}

/// `"missing_values"` → `"Missing Values"`.
pub fn label(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut word_start = true;
    for ch in key.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

/// Anchor of a file's section. The position keeps names that only differ
/// by `.` versus `_` apart.
pub fn section_id(index: usize, name: &str) -> String {
    format!("file-{index}-{}", name.replace('.', "_"))
}

fn chart_id(section: usize, position: usize) -> String {
    format!("chart-{section}-{position}")
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON embedded in a `<script>` block must not close it early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn theme_script() -> String {
    format!(
        r#"(function(){{
  const key = '{THEME_KEY}';
  const body = document.body;
  const btn = document.getElementById('themeToggle');
  if (localStorage.getItem(key) === 'dark') {{ body.classList.add('dark'); btn.textContent = 'Light'; }}
  btn.addEventListener('click', function(){{
    body.classList.toggle('dark');
    const isDark = body.classList.contains('dark');
    btn.textContent = isDark ? 'Light' : 'Dark';
    localStorage.setItem(key, isDark ? 'dark' : 'light');
  }});
}})();"#
    )
}

const STYLE: &str = r#"
:root {
  --bg: #f8fafc; --text: #1e293b; --muted: #64748b; --card: #ffffff;
  --accent: #3b82f6; --shadow: 0 10px 25px rgba(0,0,0,0.1); --border: #e2e8f0;
}
body.dark {
  --bg: #0f172a; --text: #f1f5f9; --muted: #94a3b8; --card: #1e293b;
  --accent: #60a5fa; --shadow: 0 10px 25px rgba(0,0,0,0.3); --border: #334155;
}
body {
  margin: 0; background: var(--bg); color: var(--text); line-height: 1.6;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
}
.container { max-width: 1400px; margin: 0 auto; padding: 0 20px; }
.navbar {
  position: sticky; top: 0; z-index: 50; backdrop-filter: blur(20px);
  background: rgba(255,255,255,0.8); border-bottom: 1px solid var(--border);
}
body.dark .navbar { background: rgba(30,41,59,0.8); }
.nav-inner { display: flex; align-items: center; justify-content: space-between; padding: 15px 20px; }
.brand { font-weight: 800; font-size: 1.2rem; color: var(--accent); }
.links { display: flex; gap: 15px; flex-wrap: wrap; }
.links a {
  color: var(--text); text-decoration: none; padding: 8px 16px; border-radius: 20px;
  background: var(--card); border: 1px solid var(--border); font-size: 0.9rem;
}
.links a:hover { background: var(--accent); color: white; }
.toggle {
  border: 1px solid var(--border); background: var(--card); color: var(--text);
  border-radius: 25px; padding: 8px 16px; cursor: pointer;
}
.header {
  text-align: center; color: white; padding: 80px 20px; margin-bottom: 40px;
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); border-radius: 0 0 30px 30px;
}
.header h1 { margin: 0; font-size: 3rem; font-weight: 800; }
.header p { margin: 15px 0 0 0; font-size: 1.3rem; opacity: 0.9; }
.overview, .section {
  background: var(--card); border-radius: 20px; padding: 30px; margin-bottom: 40px;
  box-shadow: var(--shadow); border: 1px solid var(--border);
}
.section { scroll-margin-top: 100px; }
.overview h2, .section h2 { margin: 0 0 25px 0; border-bottom: 3px solid var(--accent); padding-bottom: 15px; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 25px; }
.stat { text-align: center; padding: 25px; background: var(--bg); border-radius: 15px; border: 1px solid var(--border); }
.stat h3 { margin: 0 0 15px 0; font-size: 1rem; color: var(--muted); }
.stat .value { font-size: 2rem; font-weight: 800; color: var(--accent); }
.insights { margin: 0 0 25px 0; color: var(--muted); }
.file-summary { background: var(--bg); border-radius: 15px; padding: 25px; margin-bottom: 30px; border: 1px solid var(--border); }
.file-summary h3 { margin: 0 0 20px 0; color: var(--accent); }
.summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 20px; }
.summary-item { background: var(--card); padding: 20px; border-radius: 12px; border-left: 4px solid var(--accent); }
.summary-item h4 { margin: 0 0 10px 0; font-size: 0.9rem; color: var(--muted); text-transform: uppercase; }
.summary-item .value { font-size: 1.2rem; font-weight: 600; word-break: break-word; }
.chart { margin: 30px 0; padding: 25px; background: var(--bg); border-radius: 15px; border: 1px solid var(--border); }
.chart h3 { margin: 0 0 20px 0; border-bottom: 2px solid var(--accent); padding-bottom: 10px; }
.chart-container { min-height: 400px; background: var(--card); border-radius: 10px; padding: 20px; border: 1px solid var(--border); }
.no-viz {
  text-align: center; padding: 60px 20px; color: var(--muted); font-style: italic;
  background: var(--card); border-radius: 10px; border: 2px dashed var(--border);
}
footer { color: var(--muted); text-align: center; padding: 60px 0; border-top: 1px solid var(--border); }
@media (max-width: 768px) {
  .header h1 { font-size: 2rem; }
  .stats-grid, .summary-grid { grid-template-columns: 1fr; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisRecord;
    use crate::data::model::{DataSource, SourceKind};
    use crate::report::ReportEntry;
    use crate::viz::{Figure, VizKind};

    fn entry(name: &str, summary: Summary, charts: usize) -> ReportEntry {
        let visualizations = (0..charts)
            .map(|i| Visualization {
                kind: VizKind::Histogram,
                title: format!("Distribution of c{i}"),
                figure: Figure::histogram(&[1.0, 2.0], None, "skyblue", "t", "x"),
            })
            .collect();
        ReportEntry {
            source: DataSource {
                name: name.to_string(),
                path: name.into(),
                kind: SourceKind::Csv,
                size: 3 * 1024 * 1024 / 2,
                modified: None,
            },
            record: AnalysisRecord::new(summary, vec!["Found 2 numeric columns for analysis".into()])
                .with_visualizations(visualizations),
        }
    }

    fn sample_report() -> Report {
        let mut nested = Summary::new();
        nested.insert("mean".into(), SummaryValue::from(26.666_666));
        let mut summary = Summary::new();
        summary.insert("row_count".into(), SummaryValue::from(1_234_567usize));
        summary.insert("numeric_summary".into(), SummaryValue::Map(nested));
        Report::assemble(vec![
            entry("sales.data.csv", summary, 2),
            entry("<b>.csv", Summary::new(), 0),
        ])
    }

    #[test]
    fn test_render_is_idempotent() {
        let report = sample_report();
        assert_eq!(render(&report, "Dashboard"), render(&report, "Dashboard"));
    }

    #[test]
    fn test_sections_and_nav_follow_report_order() {
        let html = render(&sample_report(), "Dashboard");
        let first = html.find("<section id=\"file-0-sales_data_csv\"").unwrap();
        let second = html.find("<section id=\"file-1-&lt;b&gt;_csv\"").unwrap();
        assert!(first < second);
        let nav_first = html.find("href=\"#file-0-sales_data_csv\"").unwrap();
        let nav_second = html.find("href=\"#file-1-&lt;b&gt;_csv\"").unwrap();
        assert!(nav_first < nav_second);
        assert!(!html.contains("<b>.csv"));
    }

    #[test]
    fn test_dotted_and_underscored_names_get_distinct_anchors() {
        let report = Report::assemble(vec![
            entry("a.b.csv", Summary::new(), 0),
            entry("a_b.csv", Summary::new(), 0),
        ]);
        let html = render(&report, "Dashboard");
        assert_eq!(html.matches("<section id=\"file-0-a_b_csv\"").count(), 1);
        assert_eq!(html.matches("<section id=\"file-1-a_b_csv\"").count(), 1);
        assert_eq!(html.matches("href=\"#file-0-a_b_csv\"").count(), 1);
        assert_eq!(html.matches("href=\"#file-1-a_b_csv\"").count(), 1);
        assert_ne!(section_id(0, "a.b.csv"), section_id(1, "a_b.csv"));
    }

    #[test]
    fn test_summary_formatting_and_flattening() {
        let html = render(&sample_report(), "Dashboard");
        assert!(html.contains("<h4>Row Count</h4><div class=\"value\">1,234,567</div>"));
        assert!(html.contains("<h4>Mean</h4><div class=\"value\">26.6667</div>"));
        assert!(!html.contains("Numeric Summary"));
        assert!(html.contains("<div class=\"value\">3.0 MB</div>"));
        assert!(html.contains("<div class=\"value\">2</div>"));
    }

    #[test]
    fn test_charts_and_placeholder() {
        let html = render(&sample_report(), "Dashboard");
        assert!(html.contains("<div id=\"chart-0-0\" class=\"plotly-graph-div\"></div>"));
        assert!(html.contains("Plotly.newPlot(\"chart-0-1\""));
        assert!(!html.contains("chart-1-0"));
        assert_eq!(html.matches(NO_CHARTS).count(), 1);
        assert_eq!(html.matches("<script src=").count(), 1);
        assert!(html.contains(PLOTLY_CDN));
    }

    #[test]
    fn test_label_title_cases_keys() {
        assert_eq!(label("missing_values"), "Missing Values");
        assert_eq!(label("25%"), "25%");
        assert_eq!(label("unique_values"), "Unique Values");
        assert_eq!(label("CRS"), "Crs");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
        assert_eq!(script_safe("{\"t\":\"</script>\"}"), "{\"t\":\"<\\/script>\"}");
    }
}
