use crate::config::Config;
use crate::report::pages::{Page, PagePayload};
use crate::report::quality::DataQuality;
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::Duration;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn // Data-quality warnings are always worth seeing
    };

    // try_init: browse sessions and tests may call this more than once
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    info!(
        "Configuration: data={}, encoding={}, delimiter={:?}",
        config.data_path().display(),
        config.encoding.as_deref().unwrap_or_default(),
        config.delimiter.unwrap_or_default()
    );
    info!(
        "Report: economy={}, preview_rows={}, format={}",
        config.economy(),
        config.preview_rows(),
        config.output_format()
    );
    if let Some(ref path) = config.html_dashboard_path {
        info!("Dashboard: {path}");
    }
}

/// Log survey loading
pub fn log_load_start(path: &Path) {
    info!("Loading survey data from {}", path.display());
}

pub fn log_load_complete(path: &Path, records: usize, duration: Duration) {
    info!(
        "Loaded {records} record(s) from {} ({}ms)",
        path.display(),
        duration.as_millis()
    );
}

/// Warn about answer codes the aggregations coerce
pub fn log_data_quality(quality: &DataQuality) {
    if quality.fin2_unexpected > 0 {
        warn!(
            "{} of {} record(s) have a fin2 answer other than yes (1) or no (2); counted as not owning a debit card",
            quality.fin2_unexpected, quality.records
        );
    }
    if quality.female_unexpected > 0 {
        warn!(
            "{} of {} record(s) have a missing or unknown female code; counted as male",
            quality.female_unexpected, quality.records
        );
    }
    if quality.is_clean() {
        debug!("Data quality: all {} record(s) use known codes", quality.records);
    }
}

/// Log the page that was rendered
pub fn log_page_generated(page: Page, payload: &PagePayload) {
    info!(
        "Rendered page '{}' ({} section(s), {} chart(s))",
        page,
        payload.sections.len(),
        payload.charts().count()
    );
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
