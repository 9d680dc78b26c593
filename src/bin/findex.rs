use clap::{CommandFactory, Parser};
use findex::config::{CliConfig, Config};
use findex::core::constants::output_formats;
use findex::core::error::Result;
use findex::data::{CsvLoader, Dataset, SurveySource};
use findex::report::{Page, PagePayload};
use findex::reporting::logging;
use findex::reporting::{DashboardData, HtmlDashboard};
use findex::ui::completion::print_completions;
use findex::ui::output;
use findex::ui::{Browser, Cli, Commands, ProgressReporter, cli_to_config};

use std::path::Path;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    match run_findex_logic(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle completion commands and return exit code if a completion command was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::CompletionGenerate { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        _ => None,
    }
}

/// Main report logic extracted from main() for testing
pub fn run_findex_logic(cli: &Cli) -> Result<i32> {
    let cli_config = cli_to_config(cli)?;
    let config = load_and_merge_config(&cli_config)?;
    let output_settings = setup_output_settings(&cli_config, &config);

    logging::init_logger(output_settings.verbose, output_settings.quiet);
    logging::log_config_info(&config);

    match cli.command {
        Some(Commands::Pages) => {
            output::display_pages(&output_settings.output_format, config.economy())?;
            Ok(0)
        }
        Some(Commands::Browse) => run_browse(cli.page, &config, &output_settings),
        _ => run_page(cli.page, &config, &output_settings),
    }
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_config_info(&self) -> bool {
        self.verbose && !self.quiet && self.output_format == output_formats::TEXT
    }

    pub fn should_show_load_info(&self) -> bool {
        !self.quiet && self.output_format == output_formats::TEXT
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config.output_format().to_string();
    // Spinners would interleave with machine-readable output
    let show_progress = !quiet && output_format == output_formats::TEXT;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Read the survey file behind a spinner
pub fn load_dataset<S: SurveySource>(
    source: &S,
    path: &Path,
    output_settings: &OutputSettings,
) -> Result<Dataset> {
    let mut progress = ProgressReporter::new(output_settings.show_progress);
    progress.start_loading(path);
    logging::log_load_start(path);
    let started = Instant::now();

    match source.load(path) {
        Ok(dataset) => {
            progress.finish_loading(dataset.len());
            logging::log_load_complete(path, dataset.len(), started.elapsed());
            Ok(dataset)
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

/// Render a single page and exit
pub fn run_page(page: Page, config: &Config, output_settings: &OutputSettings) -> Result<i32> {
    if output_settings.should_show_config_info() {
        output::display_config_info(config);
    }

    let loader = CsvLoader::new(config.load_options()?);
    let dataset = load_dataset(&loader, &config.data_path(), output_settings)?;
    logging::log_data_quality(dataset.quality());

    if output_settings.should_show_load_info() {
        output::display_dataset_summary(&dataset);
    }

    let payload = config.report_generator().generate(page, &dataset);
    logging::log_page_generated(page, &payload);
    output::display_payload(
        &payload,
        &dataset,
        &output_settings.output_format,
        output_settings.quiet,
    )?;

    if let Some(ref dashboard_path) = config.html_dashboard_path {
        write_dashboard(dashboard_path, payload, &dataset, config, output_settings);
    }

    Ok(0)
}

/// Write the HTML dashboard; a failure is reported but does not fail the run
pub fn write_dashboard(
    dashboard_path: &str,
    payload: PagePayload,
    dataset: &Dataset,
    config: &Config,
    output_settings: &OutputSettings,
) {
    let dashboard_data = DashboardData {
        payload,
        source: dataset.source().display().to_string(),
        records: dataset.len(),
        quality: dataset.quality().clone(),
        config: config.clone(),
        timestamp: chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    };

    if let Err(e) = HtmlDashboard::generate_dashboard(&dashboard_data, dashboard_path) {
        logging::log_warning(&format!("Failed to generate HTML dashboard: {e}"));
    } else if output_settings.should_show_load_info() {
        println!("📊 HTML dashboard generated: {dashboard_path}");
    } else {
        log::info!("HTML dashboard generated: {dashboard_path}");
    }
}

/// Interactive page selection until the user quits
pub fn run_browse(start: Page, config: &Config, output_settings: &OutputSettings) -> Result<i32> {
    let loader = CsvLoader::new(config.load_options()?);
    let mut browser = Browser::new(
        loader,
        config.report_generator(),
        config.data_path(),
        output_settings.output_format.clone(),
    );
    browser.run(start)?;
    Ok(0)
}
