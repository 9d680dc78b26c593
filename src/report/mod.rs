//! Report generation
//!
//! Aggregations over survey records, the data-quality scan, and the page
//! dispatcher that turns a dataset into a renderable payload.

pub mod aggregate;
pub mod pages;
pub mod quality;

// Re-export commonly used items
pub use aggregate::{
    aggregate_by, derive_debit_flag, derive_gender_label, filter_by_economy, gender_breakdown,
    ownership_rate, worldwide_summary,
};
pub use pages::{ChartSpec, Page, PagePayload, ReportGenerator, Section};
pub use quality::DataQuality;
