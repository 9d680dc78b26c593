// Command-line interface definitions and parsing for findex

use crate::config::CliConfig;
use crate::core::constants::{data, defaults, output_formats};
use crate::core::error::{FindexError, Result};
use crate::report::pages::Page;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Report
    /// Page to render
    #[arg(short = 'p', long, value_enum, default_value_t = Page::Introduction, help_heading = "Report")]
    pub page: Page,

    /// Economy featured on the country page (default: Philippines)
    #[arg(short = 'e', long, value_name = "NAME", help_heading = "Report")]
    pub economy: Option<String>,

    /// Rows shown in the data preview (default: 10)
    #[arg(long, value_name = "COUNT", help_heading = "Report")]
    pub rows: Option<usize>,

    // Data Source
    /// Survey microdata file (default: micro_world.csv)
    #[arg(short = 'd', long, value_name = "FILE", help_heading = "Data Source")]
    pub data: Option<String>,

    /// Text encoding of the survey file (default: latin1)
    #[arg(long, value_name = "ENCODING", value_parser = data::encodings::ALL, help_heading = "Data Source")]
    pub encoding: Option<String>,

    /// Field delimiter of the survey file (default: ',')
    #[arg(long, value_name = "CHAR", help_heading = "Data Source")]
    pub delimiter: Option<char>,

    // Output & Verbosity
    /// Suppress all output except errors
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Write an HTML dashboard with the page's charts
    #[arg(long, value_name = "PATH", help_heading = "Output & Verbosity")]
    pub html_dashboard: Option<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available pages
    Pages,
    /// Pick pages interactively until you quit
    Browse,
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Convert derive-based CLI arguments to a CliConfig structure
pub fn cli_to_config(cli: &Cli) -> Result<CliConfig> {
    if let Some(rows) = cli.rows {
        if rows == 0 {
            return Err(FindexError::InvalidArgument(
                "Rows cannot be 0. Expected a positive integer.".to_string(),
            ));
        }
        if rows > defaults::MAX_PREVIEW_ROWS {
            return Err(FindexError::InvalidArgument(format!(
                "Rows of {rows} is too large. Expected at most {}.",
                defaults::MAX_PREVIEW_ROWS
            )));
        }
    }

    if let Some(delimiter) = cli.delimiter {
        if !delimiter.is_ascii() {
            return Err(FindexError::InvalidArgument(format!(
                "Delimiter '{delimiter}' must be a single ASCII character."
            )));
        }
    }

    if let Some(ref economy) = cli.economy {
        if economy.trim().is_empty() {
            return Err(FindexError::InvalidArgument(
                "Economy cannot be empty.".to_string(),
            ));
        }
    }

    Ok(CliConfig {
        data_path: cli.data.clone(),
        encoding: cli.encoding.clone(),
        delimiter: cli.delimiter,
        economy: cli.economy.clone(),
        preview_rows: cli.rows,
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        html_dashboard_path: cli.html_dashboard.clone(),
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("findex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.page, Page::Introduction);
        assert!(cli.command.is_none());
        assert!(cli.format.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_page_values() {
        assert_eq!(parse(&["--page", "philippines"]).page, Page::Philippines);
        assert_eq!(parse(&["-p", "worldwide"]).page, Page::Worldwide);
        assert_eq!(parse(&["-p", "team"]).page, Page::Team);
        assert!(Cli::try_parse_from(["findex", "--page", "sidebar"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_format_and_encoding() {
        assert!(Cli::try_parse_from(["findex", "--format", "yaml"]).is_err());
        assert!(Cli::try_parse_from(["findex", "--encoding", "ebcdic"]).is_err());
    }

    #[test]
    fn test_subcommands() {
        assert!(matches!(parse(&["pages"]).command, Some(Commands::Pages)));
        assert!(matches!(parse(&["browse"]).command, Some(Commands::Browse)));
        assert!(matches!(
            parse(&["completion-generate", "bash"]).command,
            Some(Commands::CompletionGenerate { .. })
        ));
    }

    #[test]
    fn test_cli_to_config() -> Result<()> {
        let cli = parse(&[
            "--data",
            "survey.csv",
            "--economy",
            "Kenya",
            "--rows",
            "5",
            "--delimiter",
            ";",
            "--format",
            "json",
            "--html-dashboard",
            "out.html",
            "-v",
        ]);
        let config = cli_to_config(&cli)?;

        assert_eq!(config.data_path, Some("survey.csv".to_string()));
        assert_eq!(config.economy, Some("Kenya".to_string()));
        assert_eq!(config.preview_rows, Some(5));
        assert_eq!(config.delimiter, Some(';'));
        assert_eq!(config.output_format, Some("json".to_string()));
        assert_eq!(config.html_dashboard_path, Some("out.html".to_string()));
        assert!(config.verbose);
        assert!(!config.no_config);
        Ok(())
    }

    #[test]
    fn test_cli_to_config_rejects_zero_rows() {
        let cli = parse(&["--rows", "0"]);
        assert!(matches!(
            cli_to_config(&cli),
            Err(FindexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cli_to_config_rejects_non_ascii_delimiter() {
        let cli = parse(&["--delimiter", "§"]);
        assert!(cli_to_config(&cli).is_err());
    }

    #[test]
    fn test_cli_to_config_rejects_blank_economy() {
        let cli = parse(&["--economy", "  "]);
        assert!(cli_to_config(&cli).is_err());
    }
}
