use crate::config::Config;
use crate::report::pages::{Cell, ChartSpec, PagePayload, Section, Table, format_percentage};
use crate::report::quality::DataQuality;
use std::fs;
use std::io;

/// Constants for dashboard styling and layout
mod dashboard_constants {
    /// Chart.js CDN URL for bar charts
    pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

    /// Plotly CDN URL for the geographic bubble chart
    pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

    /// Largest bubble diameter in pixels, reached at 100%
    pub const MAX_BUBBLE_PX: f64 = 40.0;
}

/// Data structure containing all information needed for dashboard generation
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// The rendered page
    pub payload: PagePayload,
    /// Survey file the page was computed from
    pub source: String,
    /// Number of records loaded
    pub records: usize,
    /// Coerced-code tally for the loaded file
    pub quality: DataQuality,
    /// Configuration used for the report
    pub config: Config,
    /// Timestamp when the dashboard was generated
    pub timestamp: String,
}

/// Error type for dashboard generation
#[derive(Debug)]
pub enum DashboardError {
    FileWrite(io::Error),
    Serialization(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::FileWrite(e) => write!(f, "Failed to write dashboard file: {e}"),
            DashboardError::Serialization(e) => write!(f, "Failed to serialize data: {e}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::FileWrite(e) => Some(e),
            DashboardError::Serialization(_) => None,
        }
    }
}

impl From<io::Error> for DashboardError {
    fn from(e: io::Error) -> Self {
        DashboardError::FileWrite(e)
    }
}

/// HTML dashboard generator for a report page
pub struct HtmlDashboard;

impl HtmlDashboard {
    /// Generate and write an HTML dashboard to the specified path
    pub fn generate_dashboard(
        data: &DashboardData,
        output_path: &str,
    ) -> Result<(), DashboardError> {
        let html_content = Self::generate_html_content(data)?;
        fs::write(output_path, html_content)?;
        Ok(())
    }

    /// Generate the complete HTML document content
    fn generate_html_content(data: &DashboardData) -> Result<String, DashboardError> {
        let body_content = Self::generate_body_content(data)?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - findex</title>
    <script src="{}"></script>
    <script src="{}"></script>
    <style>{}</style>
</head>
<body>
    {}
    <script>{}</script>
</body>
</html>"#,
            escape_html(&data.payload.page.label(data.config.economy())),
            dashboard_constants::CHART_JS_CDN,
            dashboard_constants::PLOTLY_CDN,
            Self::generate_css(),
            body_content,
            Self::generate_javascript()
        ))
    }

    fn generate_css() -> &'static str {
        r#"
        :root {
            --primary-color: #2563eb;
            --warning-color: #d97706;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
            --text-secondary: #64748b;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }

        .header { text-align: center; margin-bottom: 2rem; }
        .header h1 { font-size: 2rem; margin-bottom: 0.5rem; }
        .header p { color: var(--text-secondary); }
        .subheader { white-space: pre-line; color: var(--text-secondary); margin-top: 1rem; }

        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }

        .stat-card, .chart-container, .table-container, .text-block {
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }

        .stat-card { text-align: center; margin-bottom: 0; }
        .stat-value { font-size: 2rem; font-weight: bold; color: var(--primary-color); }
        .stat-value.warning { color: var(--warning-color); }
        .stat-label { color: var(--text-secondary); }

        .chart-title { margin-bottom: 1rem; }
        .geo-chart { width: 100%; height: 520px; }

        .table-container { overflow-x: auto; }
        table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
        th, td { padding: 0.5rem; border-bottom: 1px solid var(--border-color); text-align: left; }
        td.number { text-align: right; font-variant-numeric: tabular-nums; }

        .footer { text-align: center; color: var(--text-secondary); margin-top: 2rem; }
        "#
    }

    /// Generate the main body content of the dashboard
    fn generate_body_content(data: &DashboardData) -> Result<String, DashboardError> {
        let header_section = Self::generate_header_section(data);
        let stats_section = Self::generate_stats_section(data);
        let sections = Self::generate_sections(&data.payload);
        let charts_data = Self::generate_chart_data(&data.payload)?;

        Ok(format!(
            r#"
            <div class="container">
                {}
                {}
                {}
                <div class="footer">Generated on {} by findex from {}</div>
            </div>
            {}
            "#,
            header_section,
            stats_section,
            sections,
            escape_html(&data.timestamp),
            escape_html(&data.source),
            charts_data
        ))
    }

    /// Generate the dashboard header section
    fn generate_header_section(data: &DashboardData) -> String {
        let subheader = data
            .payload
            .subheader
            .as_deref()
            .map(|text| format!(r#"<p class="subheader">{}</p>"#, escape_html(text)))
            .unwrap_or_default();
        format!(
            r#"
            <div class="header">
                <h1>{}</h1>
                <p>{}</p>
                {}
            </div>
            "#,
            escape_html(&data.payload.title),
            escape_html(&data.payload.page.label(data.config.economy())),
            subheader
        )
    }

    /// Generate the statistics cards section
    fn generate_stats_section(data: &DashboardData) -> String {
        let mut cards = vec![Self::generate_stat_card(
            &data.records.to_string(),
            "Records Loaded",
            "",
        )];
        for (label, value) in data.payload.metrics() {
            cards.push(Self::generate_stat_card(
                &format_percentage(value),
                label,
                "",
            ));
        }
        if !data.quality.is_clean() {
            cards.push(Self::generate_stat_card(
                &data.quality.fin2_unexpected.to_string(),
                "fin2 answers counted as not owning",
                "warning",
            ));
            cards.push(Self::generate_stat_card(
                &data.quality.female_unexpected.to_string(),
                "female codes counted as male",
                "warning",
            ));
        }

        format!(
            r#"
            <div class="stats-grid">
                {}
            </div>
            "#,
            cards.join("\n")
        )
    }

    /// Generate a single statistics card
    fn generate_stat_card(value: &str, label: &str, style_class: &str) -> String {
        format!(
            r#"
            <div class="stat-card">
                <div class="stat-value {}">{}</div>
                <div class="stat-label">{}</div>
            </div>
            "#,
            style_class,
            escape_html(value),
            escape_html(label)
        )
    }

    /// Page sections in order; charts get a placeholder filled in by the script
    fn generate_sections(payload: &PagePayload) -> String {
        let mut html = String::new();
        let mut chart_index = 0;

        for section in &payload.sections {
            match section {
                Section::Heading { text } => {
                    html.push_str(&format!("<h2>{}</h2>\n", escape_html(text)));
                }
                Section::Text { body } => {
                    let body = body.trim_matches('*');
                    html.push_str(&format!(
                        "<div class=\"text-block\">{}</div>\n",
                        escape_html(body)
                    ));
                }
                // metrics are shown as stat cards
                Section::Metric { .. } => {}
                Section::Table { table } => html.push_str(&Self::generate_table(table)),
                Section::Chart { chart } => {
                    html.push_str(&Self::generate_chart_container(chart, chart_index));
                    chart_index += 1;
                }
            }
        }
        html
    }

    fn generate_chart_container(chart: &ChartSpec, index: usize) -> String {
        match chart {
            ChartSpec::Bar(bar) => format!(
                r#"
                <div class="chart-container">
                    <h3 class="chart-title">{}</h3>
                    <canvas id="chart-{}" width="400" height="200"></canvas>
                </div>
                "#,
                escape_html(&bar.title),
                index
            ),
            ChartSpec::BubbleMap(map) => format!(
                r#"
                <div class="chart-container">
                    <h3 class="chart-title">{}</h3>
                    <div id="chart-{}" class="geo-chart"></div>
                </div>
                "#,
                escape_html(&map.title),
                index
            ),
        }
    }

    fn generate_table(table: &Table) -> String {
        let header: String = table
            .columns
            .iter()
            .map(|column| format!("<th>{}</th>", escape_html(column)))
            .collect();
        let rows: String = table
            .rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|cell| match cell {
                        Cell::Integer(_) | Cell::Number(_) => {
                            format!("<td class=\"number\">{cell}</td>")
                        }
                        _ => format!("<td>{}</td>", escape_html(&cell.to_string())),
                    })
                    .collect();
                format!("<tr>{cells}</tr>\n")
            })
            .collect();

        format!(
            r#"
            <div class="table-container">
                <table>
                    <thead><tr>{header}</tr></thead>
                    <tbody>
{rows}                    </tbody>
                </table>
            </div>
            "#
        )
    }

    /// Chart specifications embedded as JSON for the rendering script
    fn generate_chart_data(payload: &PagePayload) -> Result<String, DashboardError> {
        let charts: Vec<&ChartSpec> = payload.charts().collect();
        let chart_data_json = serde_json::to_string(&charts)
            .map_err(|e| DashboardError::Serialization(e.to_string()))?
            .replace("</", "<\\/");

        Ok(format!(
            r#"
            <script>
                window.findexCharts = {};
                window.maxBubblePx = {};
            </script>
            "#,
            chart_data_json,
            dashboard_constants::MAX_BUBBLE_PX
        ))
    }

    fn generate_javascript() -> &'static str {
        r#"
        document.addEventListener('DOMContentLoaded', function() {
            const palette = ['#2563eb', '#db2777', '#059669', '#d97706', '#7c3aed', '#dc2626', '#0891b2'];
            (window.findexCharts || []).forEach(function(spec, index) {
                const target = document.getElementById('chart-' + index);
                if (!target) {
                    return;
                }
                if (spec.chart === 'bar' && typeof Chart !== 'undefined') {
                    new Chart(target, {
                        type: 'bar',
                        data: {
                            labels: spec.bars.map(function(b) { return b.category; }),
                            datasets: [{
                                label: spec.y_label,
                                data: spec.bars.map(function(b) { return b.value; }),
                                backgroundColor: spec.bars.map(function(_, i) { return palette[i % palette.length]; })
                            }]
                        },
                        options: {
                            responsive: true,
                            plugins: { legend: { display: false } },
                            scales: {
                                x: { title: { display: true, text: spec.x_label } },
                                y: { title: { display: true, text: spec.y_label }, beginAtZero: true, max: 100 }
                            }
                        }
                    });
                } else if (spec.chart === 'bubble_map' && typeof Plotly !== 'undefined') {
                    const groups = {};
                    spec.points.forEach(function(p) {
                        (groups[p.color] = groups[p.color] || []).push(p);
                    });
                    const traces = Object.keys(groups).sort().map(function(region, i) {
                        const points = groups[region];
                        return {
                            type: 'scattergeo',
                            name: region,
                            locationmode: 'ISO-3',
                            locations: points.map(function(p) { return p.location; }),
                            text: points.map(function(p) { return p.hover_name; }),
                            customdata: points.map(function(p) { return p.size; }),
                            hovertemplate: '%{text}: %{customdata:.2f}%<extra></extra>',
                            marker: {
                                color: palette[i % palette.length],
                                size: points.map(function(p) { return (p.size || 0) / 100 * window.maxBubblePx; }),
                                sizemode: 'diameter',
                                line: { width: 0.5, color: '#ffffff' }
                            }
                        };
                    });
                    Plotly.newPlot(target, traces, {
                        geo: { projection: { type: spec.projection }, showcountries: true },
                        margin: { t: 10, b: 10, l: 10, r: 10 },
                        legend: { orientation: 'h' }
                    }, { responsive: true });
                }
            });
        });
        "#
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SurveyRecord;
    use crate::data::Dataset;
    use crate::report::pages::{Page, ReportGenerator};
    use std::error::Error;
    use tempfile::NamedTempFile;

    fn create_test_dataset() -> Dataset {
        let record = |economy: &str, code: &str, region: &str, fin2: i64, female: i64| {
            SurveyRecord::builder()
                .economy(economy)
                .economy_code(code)
                .region(region)
                .fin2(fin2)
                .female(female)
                .build()
        };
        Dataset::from_records(vec![
            record("Philippines", "PHL", "East Asia & Pacific", 1, 1),
            record("Philippines", "PHL", "East Asia & Pacific", 2, 0),
            record("Kenya", "KEN", "Sub-Saharan Africa", 1, 0),
            record("Kenya", "KEN", "Sub-Saharan Africa", 4, 1),
        ])
    }

    fn create_test_dashboard_data(page: Page) -> DashboardData {
        let dataset = create_test_dataset();
        DashboardData {
            payload: ReportGenerator::default().generate(page, &dataset),
            source: "micro_world.csv".to_string(),
            records: dataset.len(),
            quality: dataset.quality().clone(),
            config: Config::default(),
            timestamp: "2024-01-01 00:00:00 UTC".to_string(),
        }
    }

    #[test]
    fn test_generate_html_content() {
        let data = create_test_dashboard_data(Page::Philippines);
        let html = HtmlDashboard::generate_html_content(&data).unwrap();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>FI Status of the Philippines - findex</title>"));
        assert!(html.contains("chart.js"));
        assert!(html.contains("plotly"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn test_header_follows_configured_economy() {
        let dataset = create_test_dataset();
        let data = DashboardData {
            payload: ReportGenerator::new("Kenya", 10).generate(Page::Philippines, &dataset),
            source: "micro_world.csv".to_string(),
            records: dataset.len(),
            quality: dataset.quality().clone(),
            config: Config {
                economy: Some("Kenya".to_string()),
                ..Config::default()
            },
            timestamp: String::new(),
        };
        let header = HtmlDashboard::generate_header_section(&data);

        assert!(header.contains("<p>FI Status of Kenya</p>"));
        assert!(!header.contains("Philippines"));
    }

    #[test]
    fn test_bar_chart_section() {
        let data = create_test_dashboard_data(Page::Philippines);
        let html = HtmlDashboard::generate_html_content(&data).unwrap();

        assert!(html.contains(r#"<canvas id="chart-0""#));
        assert!(html.contains(r#""chart":"bar""#));
        assert!(html.contains(r#""category":"female","value":100.0"#));
    }

    #[test]
    fn test_bubble_map_section() {
        let data = create_test_dashboard_data(Page::Worldwide);
        let html = HtmlDashboard::generate_html_content(&data).unwrap();

        assert!(html.contains(r#"<div id="chart-0" class="geo-chart">"#));
        assert!(html.contains(r#""chart":"bubble_map""#));
        assert!(html.contains(r#""projection":"natural earth""#));
        assert!(html.contains("<td>KEN</td>"));
    }

    #[test]
    fn test_stats_section_shows_metric_and_quality() {
        let data = create_test_dashboard_data(Page::Philippines);
        let stats = HtmlDashboard::generate_stats_section(&data);

        assert!(stats.contains("Records Loaded"));
        assert!(stats.contains("% of Population with Debit Card"));
        assert!(stats.contains("50.00"));
        assert!(stats.contains("fin2 answers counted as not owning"));
    }

    #[test]
    fn test_title_only_page_has_no_charts() -> Result<(), DashboardError> {
        let data = create_test_dashboard_data(Page::Team);
        let charts = HtmlDashboard::generate_chart_data(&data.payload)?;
        assert!(charts.contains("window.findexCharts = [];"));
        Ok(())
    }

    #[test]
    fn test_nan_metric_serializes_as_null() -> Result<(), DashboardError> {
        let dataset = create_test_dataset();
        let payload = ReportGenerator::new("Atlantis", 10).generate(Page::Philippines, &dataset);
        let charts = HtmlDashboard::generate_chart_data(&payload)?;
        assert!(charts.contains(r#""bars":[]"#));

        let stats = HtmlDashboard::generate_stats_section(&DashboardData {
            payload,
            source: String::new(),
            records: dataset.len(),
            quality: DataQuality::default(),
            config: Config::default(),
            timestamp: String::new(),
        });
        assert!(stats.contains("NaN"));
        Ok(())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<Côte d'Ivoire & "friends">"#),
            "&lt;Côte d&#39;Ivoire &amp; &quot;friends&quot;&gt;"
        );
        let table = Table {
            columns: vec!["economy".to_string()],
            rows: vec![vec![Cell::Text("<script>".to_string())]],
        };
        assert!(HtmlDashboard::generate_table(&table).contains("&lt;script&gt;"));
    }

    #[test]
    fn test_generate_dashboard_file_creation() -> Result<(), Box<dyn Error>> {
        let data = create_test_dashboard_data(Page::Worldwide);
        let temp_file = NamedTempFile::new()?;
        let temp_path = temp_file.path().to_str().unwrap();

        HtmlDashboard::generate_dashboard(&data, temp_path)?;

        let content = std::fs::read_to_string(temp_path)?;
        assert!(content.contains("<!DOCTYPE html>"));
        assert!(content.contains("FI Status Worldwide"));

        Ok(())
    }

    #[test]
    fn test_dashboard_error_display() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let dashboard_error = DashboardError::FileWrite(io_error);
        let display_str = format!("{dashboard_error}");
        assert!(display_str.contains("Failed to write dashboard file"));
        assert!(display_str.contains("Permission denied"));

        let serialization_error = DashboardError::Serialization("Invalid JSON".to_string());
        assert!(
            serialization_error
                .to_string()
                .contains("Failed to serialize data")
        );
        assert!(serialization_error.source().is_none());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let data = create_test_dashboard_data(Page::Team);
        let result = HtmlDashboard::generate_dashboard(&data, "/no/such/dir/dashboard.html");
        assert!(matches!(result, Err(DashboardError::FileWrite(_))));
    }
}
