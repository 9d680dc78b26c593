//! findex reports debit card ownership from the World Bank Global Findex
//! survey microdata.
//!
//! The survey file is loaded once into an immutable [`Dataset`], a
//! [`ReportGenerator`] turns it into a [`PagePayload`] for one of the five
//! pages, and the `ui` and `reporting` modules render that payload as text,
//! JSON, minimal lines or an HTML dashboard.

pub mod config;
pub mod core;
pub mod data;
pub mod report;
pub mod reporting;
pub mod ui;

// Re-export commonly used items
pub use crate::config::{CliConfig, Config};
pub use crate::core::{AggregateRow, CountryKey, CountryRow, FindexError, Gender, Result, SurveyRecord};
pub use crate::data::{CsvLoader, Dataset, DatasetCache, Encoding, LoadOptions, SurveySource};
pub use crate::report::{
    ChartSpec, DataQuality, Page, PagePayload, ReportGenerator, Section, aggregate_by,
    derive_debit_flag, derive_gender_label, filter_by_economy, gender_breakdown, ownership_rate,
    worldwide_summary,
};
