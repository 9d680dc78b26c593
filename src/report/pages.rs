//! Page definitions and the report generator
//!
//! A page request is answered by [`ReportGenerator::generate`], which takes
//! the page identifier and the loaded dataset and returns a [`PagePayload`]:
//! headings, text, metrics, tables and chart specifications ready for any
//! renderer.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use log::debug;
use serde::Serialize;

use crate::core::constants::{columns, defaults, labels};
use crate::core::error::FindexError;
use crate::core::types::{AggregateRow, CountryRow, Gender, SurveyRecord, serialize_percentage};
use crate::data::Dataset;
use crate::report::aggregate::{filter_by_economy, gender_breakdown, ownership_rate, worldwide_summary};

/// The five navigable pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Introduction,
    Philippines,
    Worldwide,
    Recommendations,
    Team,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Introduction,
        Page::Philippines,
        Page::Worldwide,
        Page::Recommendations,
        Page::Team,
    ];

    /// Identifier used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Page::Introduction => "introduction",
            Page::Philippines => "philippines",
            Page::Worldwide => "worldwide",
            Page::Recommendations => "recommendations",
            Page::Team => "team",
        }
    }

    /// Navigation label
    pub fn title(&self) -> &'static str {
        match self {
            Page::Introduction => "Towards Financial Inclusion",
            Page::Philippines => "FI Status of the Philippines",
            Page::Worldwide => "FI Status Worldwide",
            Page::Recommendations => "What We Can Do",
            Page::Team => "The Team",
        }
    }

    /// Navigation label for a report focused on `economy`
    pub fn label(&self, economy: &str) -> String {
        match self {
            Page::Philippines => format!("FI Status of {}", display_name(economy)),
            _ => self.title().to_string(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = FindexError;

    /// Accepts either the identifier or the navigation label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Page::ALL
            .into_iter()
            .find(|page| page.id().eq_ignore_ascii_case(wanted) || page.title() == wanted)
            .ok_or_else(|| {
                FindexError::InvalidArgument(format!(
                    "Unknown page '{wanted}'. Expected one of: {}.",
                    Page::ALL.map(|p| p.id()).join(", ")
                ))
            })
    }
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Number(#[serde(serialize_with = "serialize_percentage")] f64),
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Integer(value) => write!(f, "{value}"),
            Cell::Number(value) => f.write_str(&format_percentage(*value)),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cell::Missing, Cell::Integer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub category: String,
    #[serde(serialize_with = "serialize_percentage")]
    pub value: f64,
}

/// Categorical bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<BarPoint>,
}

/// One bubble on the geographic chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    /// Economy code used to place the bubble
    pub location: String,
    /// Economy name shown on hover
    pub hover_name: String,
    /// Region, used as the colour group
    pub color: String,
    /// Ownership percentage, used as the bubble size
    #[serde(serialize_with = "serialize_percentage")]
    pub size: f64,
}

/// Geographic bubble chart, one bubble per country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleMap {
    pub title: String,
    pub projection: String,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarChart),
    BubbleMap(BubbleMap),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    Heading {
        text: String,
    },
    Text {
        body: String,
    },
    Metric {
        label: String,
        #[serde(serialize_with = "serialize_percentage")]
        value: f64,
    },
    Table {
        table: Table,
    },
    Chart {
        chart: ChartSpec,
    },
}

/// Everything a renderer needs to draw one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePayload {
    pub page: Page,
    pub title: String,
    pub subheader: Option<String>,
    pub sections: Vec<Section>,
}

impl PagePayload {
    fn new(page: Page, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
            subheader: None,
            sections: Vec::new(),
        }
    }

    fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().filter_map(|section| match section {
            Section::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = (&str, f64)> {
        self.sections.iter().filter_map(|section| match section {
            Section::Metric { label, value } => Some((label.as_str(), *value)),
            _ => None,
        })
    }
}

/// Produces page payloads from a dataset
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    economy: String,
    preview_rows: usize,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(defaults::ECONOMY, defaults::PREVIEW_ROWS)
    }
}

impl ReportGenerator {
    pub fn new(economy: impl Into<String>, preview_rows: usize) -> Self {
        Self {
            economy: economy.into(),
            preview_rows,
        }
    }

    pub fn economy(&self) -> &str {
        &self.economy
    }

    pub fn generate(&self, page: Page, dataset: &Dataset) -> PagePayload {
        let payload = match page {
            Page::Introduction => self.introduction(dataset),
            Page::Philippines => self.economy_status(dataset),
            Page::Worldwide => self.worldwide_status(dataset),
            Page::Recommendations => PagePayload::new(page, "What We Can Do"),
            Page::Team => PagePayload::new(page, "The Team"),
        };
        debug!(
            "Generated page '{}' with {} section(s)",
            page,
            payload.sections.len()
        );
        payload
    }

    fn introduction(&self, dataset: &Dataset) -> PagePayload {
        let mut payload = PagePayload::new(
            Page::Introduction,
            format!(
                "Towards Financial Inclusion (FI): using survey data to assess FI status of {}",
                display_name(&self.economy)
            ),
        );
        payload.subheader = Some(format!(
            "{}, this sprint aims to:\n\
             1. Profile financial inclusion (FI) metrics in {} using survey data from World Bank.\n\
             2. Formulate policy recommendations to further improve access to financial services \
             particularly to vulnerable sectors.",
            strategy_preamble(&self.economy),
            display_name(&self.economy)
        ));

        payload.push(Section::Heading {
            text: "The Data".to_string(),
        });
        let shown = dataset.len().min(self.preview_rows);
        payload.push(Section::Table {
            table: preview_table(&dataset.records()[..shown]),
        });
        payload.push(Section::Text {
            body: format!("Showing {shown} of {} records.", dataset.len()),
        });
        payload.push(Section::Text {
            body: labels::DATA_SOURCE.to_string(),
        });
        payload
    }

    fn economy_status(&self, dataset: &Dataset) -> PagePayload {
        let name = display_name(&self.economy);
        let mut payload = PagePayload::new(
            Page::Philippines,
            format!("This is the current state of FI in {name}."),
        );

        let records = filter_by_economy(dataset.records(), &self.economy);
        let rate = ownership_rate(records.iter().copied());
        let breakdown = gender_breakdown(records.iter().copied());
        debug!(
            "{} record(s) for '{}', ownership rate {}",
            records.len(),
            self.economy,
            format_percentage(rate)
        );

        payload.push(Section::Text {
            body: format!(
                "In {name}, there is still an opportunity to expand access to financial services: "
            ),
        });
        payload.push(Section::Metric {
            label: labels::OWNERSHIP_METRIC.to_string(),
            value: rate,
        });
        payload.push(Section::Text {
            body: "In terms of gender breakdown:".to_string(),
        });
        payload.push(Section::Table {
            table: gender_table(&breakdown),
        });
        payload.push(Section::Chart {
            chart: ChartSpec::Bar(BarChart {
                title: format!("Debit card ownership by gender in {name}"),
                x_label: labels::GENDER_AXIS.to_string(),
                y_label: labels::OWNERSHIP_AXIS.to_string(),
                bars: breakdown
                    .iter()
                    .map(|(gender, row)| BarPoint {
                        category: gender.label().to_string(),
                        value: row.percentage,
                    })
                    .collect(),
            }),
        });
        payload
    }

    fn worldwide_status(&self, dataset: &Dataset) -> PagePayload {
        let mut payload = PagePayload::new(Page::Worldwide, "This is the current state of FI worldwide.");
        let summary = worldwide_summary(dataset.records());

        payload.push(Section::Text {
            body: "**Here is a bubble map presenting the % of debit card ownership per country:**"
                .to_string(),
        });
        payload.push(Section::Chart {
            chart: ChartSpec::BubbleMap(BubbleMap {
                title: "Debit card ownership per country".to_string(),
                projection: labels::PROJECTION.to_string(),
                points: summary
                    .iter()
                    .map(|country| BubblePoint {
                        location: country.key.economy_code.clone(),
                        hover_name: country.key.economy.clone(),
                        color: country.key.region.clone(),
                        size: country.row.percentage,
                    })
                    .collect(),
            }),
        });
        payload.push(Section::Table {
            table: country_table(&summary),
        });
        payload
    }
}

fn preview_table(records: &[SurveyRecord]) -> Table {
    Table {
        columns: columns::REQUIRED.iter().map(|c| c.to_string()).collect(),
        rows: records
            .iter()
            .map(|record| {
                vec![
                    Cell::Text(record.economy.clone()),
                    Cell::Text(record.economy_code.clone()),
                    Cell::Text(record.region.clone()),
                    Cell::from(record.fin2),
                    Cell::from(record.female),
                    Cell::Text(record.wpid_random.clone()),
                ]
            })
            .collect(),
    }
}

fn count_cell(count: u64) -> Cell {
    Cell::Integer(i64::try_from(count).unwrap_or(i64::MAX))
}

fn gender_table(breakdown: &std::collections::BTreeMap<Gender, AggregateRow>) -> Table {
    Table {
        columns: vec![
            "gender".to_string(),
            labels::OWNERS_COLUMN.to_string(),
            labels::POPULATION_COLUMN.to_string(),
            labels::GENDER_PCT_COLUMN.to_string(),
        ],
        rows: breakdown
            .iter()
            .map(|(gender, row)| {
                vec![
                    Cell::Text(gender.label().to_string()),
                    count_cell(row.owners),
                    count_cell(row.total),
                    Cell::Number(row.percentage),
                ]
            })
            .collect(),
    }
}

fn country_table(summary: &[CountryRow]) -> Table {
    Table {
        columns: vec![
            columns::ECONOMY.to_string(),
            columns::ECONOMY_CODE.to_string(),
            columns::REGION.to_string(),
            labels::OWNERS_COLUMN.to_string(),
            labels::POPULATION_COLUMN.to_string(),
            labels::WORLD_SIZE_COLUMN.to_string(),
        ],
        rows: summary
            .iter()
            .map(|country| {
                vec![
                    Cell::Text(country.key.economy.clone()),
                    Cell::Text(country.key.economy_code.clone()),
                    Cell::Text(country.key.region.clone()),
                    count_cell(country.row.owners),
                    count_cell(country.row.total),
                    Cell::Number(country.row.percentage),
                ]
            })
            .collect(),
    }
}

/// Opening of the introduction subheader. The BSP strategy only applies to
/// the Philippines.
fn strategy_preamble(economy: &str) -> &'static str {
    if economy == defaults::ECONOMY {
        "In line with the National Strategy for Financial Inclusion (NSFI) 2022-2028 by \
         Bangko Sentral ng Pilipinas (BSP)"
    } else {
        "In line with national financial inclusion strategies"
    }
}

/// Economies whose English name takes a definite article in running text.
const ARTICLE_ECONOMIES: [&str; 6] = [
    "Philippines",
    "Netherlands",
    "United States",
    "United Kingdom",
    "United Arab Emirates",
    "Dominican Republic",
];

/// Economy name as it reads mid-sentence ("the Philippines").
pub fn display_name(economy: &str) -> String {
    if ARTICLE_ECONOMIES.contains(&economy) {
        format!("the {economy}")
    } else {
        economy.to_string()
    }
}

/// Two decimals, or `NaN` for an undefined percentage.
pub fn format_percentage(value: f64) -> String {
    if value.is_nan() {
        crate::core::constants::display::NAN_TEXT.to_string()
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(economy: &str, code: &str, region: &str, fin2: i64, female: i64) -> SurveyRecord {
        SurveyRecord::builder()
            .economy(economy)
            .economy_code(code)
            .region(region)
            .fin2(fin2)
            .female(female)
            .wpid_random("1")
            .build()
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Philippines", "PHL", "East Asia & Pacific", 1, 1),
            record("Philippines", "PHL", "East Asia & Pacific", 2, 0),
            record("Kenya", "KEN", "Sub-Saharan Africa", 1, 0),
            record("Kenya", "KEN", "Sub-Saharan Africa", 1, 1),
            record("Chile", "CHL", "Latin America & Caribbean", 2, 1),
        ])
    }

    #[test]
    fn test_page_ids_and_titles() {
        assert_eq!(Page::ALL.len(), 5);
        assert_eq!(Page::Philippines.id(), "philippines");
        assert_eq!(Page::Worldwide.title(), "FI Status Worldwide");
        assert_eq!(Page::default(), Page::Introduction);
    }

    #[test]
    fn test_page_label_follows_economy() {
        assert_eq!(
            Page::Philippines.label("Philippines"),
            "FI Status of the Philippines"
        );
        assert_eq!(Page::Philippines.label("Kenya"), "FI Status of Kenya");
        assert_eq!(Page::Team.label("Kenya"), "The Team");
    }

    #[test]
    fn test_introduction_subheader_names_bsp_only_for_philippines() {
        let dataset = sample_dataset();

        let home = ReportGenerator::default().generate(Page::Introduction, &dataset);
        let subheader = home.subheader.unwrap_or_default();
        assert!(subheader.contains("Bangko Sentral ng Pilipinas"));

        let other = ReportGenerator::new("Kenya", 10).generate(Page::Introduction, &dataset);
        let subheader = other.subheader.unwrap_or_default();
        assert!(subheader.starts_with("In line with national financial inclusion strategies"));
        assert!(subheader.contains("metrics in Kenya"));
        assert!(!subheader.contains("BSP"));
        assert!(!subheader.contains("NSFI"));
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("team".parse::<Page>().unwrap(), Page::Team);
        assert_eq!("WORLDWIDE".parse::<Page>().unwrap(), Page::Worldwide);
        assert_eq!(
            "What We Can Do".parse::<Page>().unwrap(),
            Page::Recommendations
        );
        assert!("sidebar".parse::<Page>().is_err());
    }

    #[test]
    fn test_every_page_generates() {
        let dataset = sample_dataset();
        let generator = ReportGenerator::default();
        for page in Page::ALL {
            let payload = generator.generate(page, &dataset);
            assert_eq!(payload.page, page);
            assert!(!payload.title.is_empty());
        }
    }

    #[test]
    fn test_introduction_preview_is_limited() {
        let dataset = sample_dataset();
        let payload = ReportGenerator::new("Philippines", 2).generate(Page::Introduction, &dataset);

        assert!(payload.title.contains("the Philippines"));
        assert!(payload.subheader.is_some());
        let table = payload
            .sections
            .iter()
            .find_map(|s| match s {
                Section::Table { table } => Some(table),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.rows.len(), 2);
        assert!(payload.sections.contains(&Section::Text {
            body: "Showing 2 of 5 records.".to_string()
        }));
    }

    #[test]
    fn test_economy_page_scenario() {
        let dataset = sample_dataset();
        let payload = ReportGenerator::default().generate(Page::Philippines, &dataset);

        let metrics: Vec<_> = payload.metrics().collect();
        assert_eq!(metrics, vec![(labels::OWNERSHIP_METRIC, 50.0)]);

        match payload.charts().next() {
            Some(ChartSpec::Bar(bar)) => {
                assert_eq!(bar.x_label, "Gender");
                assert_eq!(bar.y_label, "% Debit Card Ownership");
                assert_eq!(
                    bar.bars,
                    vec![
                        BarPoint {
                            category: "female".to_string(),
                            value: 100.0
                        },
                        BarPoint {
                            category: "male".to_string(),
                            value: 0.0
                        },
                    ]
                );
            }
            other => panic!("Expected bar chart, got {other:?}"),
        }
    }

    #[test]
    fn test_economy_page_without_records_is_nan() {
        let dataset = sample_dataset();
        let payload = ReportGenerator::new("Atlantis", 10).generate(Page::Philippines, &dataset);

        let (_, value) = payload.metrics().next().unwrap();
        assert!(value.is_nan());
        match payload.charts().next() {
            Some(ChartSpec::Bar(bar)) => assert!(bar.bars.is_empty()),
            other => panic!("Expected bar chart, got {other:?}"),
        }
    }

    #[test]
    fn test_worldwide_page_bubbles() {
        let dataset = sample_dataset();
        let payload = ReportGenerator::default().generate(Page::Worldwide, &dataset);

        match payload.charts().next() {
            Some(ChartSpec::BubbleMap(map)) => {
                assert_eq!(map.projection, "natural earth");
                assert_eq!(map.points.len(), 3);
                let kenya = map.points.iter().find(|p| p.location == "KEN").unwrap();
                assert_eq!(kenya.hover_name, "Kenya");
                assert_eq!(kenya.color, "Sub-Saharan Africa");
                assert_eq!(kenya.size, 100.0);
                let chile = map.points.iter().find(|p| p.location == "CHL").unwrap();
                assert_eq!(chile.size, 0.0);
            }
            other => panic!("Expected bubble map, got {other:?}"),
        }
    }

    #[test]
    fn test_title_only_pages() {
        let dataset = sample_dataset();
        let generator = ReportGenerator::default();
        assert!(generator.generate(Page::Recommendations, &dataset).sections.is_empty());
        assert_eq!(generator.generate(Page::Team, &dataset).title, "The Team");
    }

    #[test]
    fn test_payload_json_shape() {
        let dataset = sample_dataset();
        let payload = ReportGenerator::default().generate(Page::Philippines, &dataset);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["page"], "philippines");
        assert_eq!(json["sections"][1]["section"], "metric");
        assert_eq!(json["sections"][1]["value"], 50.0);
        assert_eq!(json["sections"][4]["chart"]["chart"], "bar");
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let section = Section::Metric {
            label: "x".to_string(),
            value: f64::NAN,
        };
        let json = serde_json::to_value(&section).unwrap();
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Text("PHL".to_string()).to_string(), "PHL");
        assert_eq!(Cell::Integer(42).to_string(), "42");
        assert_eq!(Cell::Number(33.3333).to_string(), "33.33");
        assert_eq!(Cell::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Cell::from(None).to_string(), "");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Philippines"), "the Philippines");
        assert_eq!(display_name("Kenya"), "Kenya");
    }
}
