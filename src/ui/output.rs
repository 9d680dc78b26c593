//! Output formatting and display logic for findex

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::config::Config;
use crate::core::constants::{display, output_formats};
use crate::core::error::Result;
use crate::data::Dataset;
use crate::report::pages::{
    BarChart, BubbleMap, BubblePoint, Cell, ChartSpec, Page, PagePayload, Section, Table,
    format_percentage,
};
use crate::report::quality::DataQuality;
use crate::ui::color::{Colors, colorize, emphasize, palette};

/// JSON document written for `--format json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    source: String,
    records: usize,
    data_quality: &'a DataQuality,
    #[serde(flatten)]
    payload: &'a PagePayload,
}

#[derive(Debug, Serialize)]
struct PageEntry {
    id: &'static str,
    title: String,
}

/// Display the resolved configuration
pub fn display_config_info(config: &Config) {
    let rows = [
        ("Data file", config.data_path().display().to_string()),
        (
            "Encoding",
            config.encoding.clone().unwrap_or_default(),
        ),
        (
            "Delimiter",
            config.delimiter.map(|d| format!("{d:?}")).unwrap_or_default(),
        ),
        ("Economy", config.economy().to_string()),
        ("Preview rows", config.preview_rows().to_string()),
    ];
    for (label, value) in rows {
        println!(
            "{}: {}",
            emphasize(label, Colors::BRIGHT_CYAN),
            colorize(&value, Colors::BRIGHT_WHITE)
        );
    }
    println!();
}

/// Display how many records were loaded and from where
pub fn display_dataset_summary(dataset: &Dataset) {
    println!(
        "{} Loaded {} record(s) from {}\n",
        display::TABLE_EMOJI,
        colorize(&dataset.len().to_string(), Colors::BRIGHT_WHITE),
        colorize(&dataset.source().display().to_string(), Colors::CYAN)
    );
}

/// Display the list of pages for the `pages` subcommand
pub fn display_pages(output_format: &str, economy: &str) -> Result<()> {
    print!("{}", render_page_list(output_format, economy)?);
    Ok(())
}

pub fn render_page_list(output_format: &str, economy: &str) -> Result<String> {
    let mut out = String::new();
    match output_format {
        output_formats::JSON => {
            let entries: Vec<PageEntry> = Page::ALL
                .iter()
                .map(|page| PageEntry {
                    id: page.id(),
                    title: page.label(economy),
                })
                .collect();
            out.push_str(&serde_json::to_string_pretty(&entries)?);
            out.push('\n');
        }
        output_formats::MINIMAL => {
            for page in Page::ALL {
                let _ = writeln!(out, "{}\t{}", page.id(), page.label(economy));
            }
        }
        _ => {
            let _ = writeln!(out, "{}", emphasize("Pages", Colors::BRIGHT_CYAN));
            for (i, page) in Page::ALL.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "   {}. {} {}",
                    i + 1,
                    colorize(&format!("{:<16}", page.id()), Colors::BRIGHT_WHITE),
                    page.label(economy)
                );
            }
        }
    }
    Ok(out)
}

/// Display a page payload based on output format
pub fn display_payload(
    payload: &PagePayload,
    dataset: &Dataset,
    output_format: &str,
    quiet: bool,
) -> Result<()> {
    match output_format {
        output_formats::JSON => println!("{}", render_json(payload, dataset)?),
        output_formats::MINIMAL => print!("{}", render_minimal(payload)),
        _ => {
            if !quiet {
                print!("{}", render_text(payload));
            }
        }
    }
    Ok(())
}

/// Pretty JSON with the dataset summary alongside the payload
pub fn render_json(payload: &PagePayload, dataset: &Dataset) -> Result<String> {
    let report = JsonReport {
        source: dataset.source().display().to_string(),
        records: dataset.len(),
        data_quality: dataset.quality(),
        payload,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Tab-separated lines, no colors, emojis, or grouping
pub fn render_minimal(payload: &PagePayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "page\t{}", payload.page);
    let _ = writeln!(out, "title\t{}", payload.title);

    for section in &payload.sections {
        match section {
            Section::Heading { text } => {
                let _ = writeln!(out, "heading\t{text}");
            }
            Section::Text { body } => {
                let _ = writeln!(out, "text\t{}", body.replace('\n', " "));
            }
            Section::Metric { label, value } => {
                let _ = writeln!(out, "metric\t{label}\t{}", format_percentage(*value));
            }
            Section::Table { table } => {
                let _ = writeln!(out, "columns\t{}", table.columns.join("\t"));
                for row in &table.rows {
                    let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
                    let _ = writeln!(out, "row\t{}", cells.join("\t"));
                }
            }
            Section::Chart {
                chart: ChartSpec::Bar(bar),
            } => {
                for point in &bar.bars {
                    let _ = writeln!(
                        out,
                        "bar\t{}\t{}",
                        point.category,
                        format_percentage(point.value)
                    );
                }
            }
            Section::Chart {
                chart: ChartSpec::BubbleMap(map),
            } => {
                for point in &map.points {
                    let _ = writeln!(
                        out,
                        "bubble\t{}\t{}\t{}\t{}",
                        point.location,
                        point.hover_name,
                        point.color,
                        format_percentage(point.size)
                    );
                }
            }
        }
    }
    out
}

/// Colored terminal rendering of a page
pub fn render_text(payload: &PagePayload) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        display::PAGE_EMOJI,
        emphasize(&payload.title, Colors::BRIGHT_CYAN)
    );
    if let Some(ref subheader) = payload.subheader {
        for line in subheader.lines() {
            let _ = writeln!(out, "   {}", colorize(line, Colors::DIM));
        }
    }
    out.push('\n');

    for section in &payload.sections {
        match section {
            Section::Heading { text } => {
                let _ = writeln!(out, "{}\n", emphasize(text, Colors::BRIGHT_WHITE));
            }
            Section::Text { body } => {
                let _ = writeln!(out, "{}\n", render_body(body));
            }
            Section::Metric { label, value } => {
                let _ = writeln!(
                    out,
                    "   {} {}: {}\n",
                    display::METRIC_EMOJI,
                    colorize(label, Colors::BRIGHT_CYAN),
                    emphasize(&format_percentage(*value), Colors::BRIGHT_GREEN)
                );
            }
            Section::Table { table } => {
                out.push_str(&render_table(table));
                out.push('\n');
            }
            Section::Chart {
                chart: ChartSpec::Bar(bar),
            } => {
                out.push_str(&render_bar_chart(bar));
                out.push('\n');
            }
            Section::Chart {
                chart: ChartSpec::BubbleMap(map),
            } => {
                out.push_str(&render_bubble_map(map));
                out.push('\n');
            }
        }
    }
    out
}

// `**bold**` paragraphs are emphasized, everything else is plain
fn render_body(body: &str) -> String {
    match body
        .strip_prefix("**")
        .and_then(|inner| inner.strip_suffix("**"))
    {
        Some(inner) => emphasize(inner, Colors::BRIGHT_WHITE),
        None => body.to_string(),
    }
}

fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(Cell::to_string).collect())
        .collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{column:<width$}"))
        .collect();
    let _ = writeln!(
        out,
        "   {}",
        emphasize(&header.join("  "), Colors::BRIGHT_BLUE)
    );
    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "   {}", colorize(&"─".repeat(rule_width), Colors::DIM));

    for (row, cells) in table.rows.iter().zip(&rendered) {
        let line: Vec<String> = row
            .iter()
            .zip(cells)
            .zip(&widths)
            .map(|((cell, text), &width)| match cell {
                Cell::Integer(_) | Cell::Number(_) => format!("{text:>width$}"),
                _ => format!("{text:<width$}"),
            })
            .collect();
        let _ = writeln!(out, "   {}", line.join("  ").trim_end());
    }
    out
}

// Percentages are drawn on a fixed 0..100 scale
fn bar(value: f64, width: usize) -> String {
    if !value.is_finite() {
        return "░".repeat(width);
    }
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_bar_chart(chart: &BarChart) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        display::CHART_EMOJI,
        emphasize(&chart.title, Colors::BRIGHT_WHITE)
    );
    let _ = writeln!(
        out,
        "   {}",
        colorize(&format!("{} by {}", chart.y_label, chart.x_label), Colors::DIM)
    );

    if chart.bars.is_empty() {
        let _ = writeln!(out, "   {}", colorize("(no data)", Colors::DIM));
        return out;
    }

    let label_width = chart
        .bars
        .iter()
        .map(|p| p.category.chars().count())
        .max()
        .unwrap_or(0);
    for (i, point) in chart.bars.iter().enumerate() {
        let _ = writeln!(
            out,
            "   {:<label_width$} {} {}",
            point.category,
            colorize(&bar(point.value, display::BAR_WIDTH), palette(i)),
            format_percentage(point.value)
        );
    }
    out
}

fn render_bubble_map(map: &BubbleMap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        display::MAP_EMOJI,
        emphasize(&map.title, Colors::BRIGHT_WHITE),
        colorize(&format!("({} projection)", map.projection), Colors::DIM)
    );

    let mut regions: BTreeMap<&str, Vec<&BubblePoint>> = BTreeMap::new();
    for point in &map.points {
        regions.entry(point.color.as_str()).or_default().push(point);
    }

    let name_width = map
        .points
        .iter()
        .map(|p| p.hover_name.chars().count())
        .max()
        .unwrap_or(0);
    for (i, (region, points)) in regions.iter().enumerate() {
        let _ = writeln!(out, "\n   {}", emphasize(region, palette(i)));
        for point in points {
            let _ = writeln!(
                out,
                "     {:<4} {:<name_width$} {} {}",
                point.location,
                point.hover_name,
                colorize(&bar(point.size, display::BAR_WIDTH / 2), palette(i)),
                format_percentage(point.size)
            );
        }
    }
    out
}
