//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::constants::{data, defaults, output_formats};
use crate::core::error::{FindexError, Result};
use crate::data::loader::{Encoding, LoadOptions};
use crate::report::pages::ReportGenerator;

/// Name of the config file looked up in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = ".findex.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the survey microdata
    pub data_path: Option<String>,

    /// Text encoding of the survey file (latin1, utf-8)
    pub encoding: Option<String>,

    /// Field delimiter of the survey file
    pub delimiter: Option<char>,

    /// Economy featured on the country page
    pub economy: Option<String>,

    /// Rows shown in the data preview
    pub preview_rows: Option<usize>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Write an HTML dashboard for the rendered page
    pub html_dashboard_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: Some(data::DEFAULT_PATH.to_string()),
            encoding: Some(data::DEFAULT_ENCODING.to_string()),
            delimiter: Some(data::DEFAULT_DELIMITER),
            economy: Some(defaults::ECONOMY.to_string()),
            preview_rows: Some(defaults::PREVIEW_ROWS),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            html_dashboard_path: None, // No dashboard by default
        }
    }
}

impl Config {
    /// Load configuration from file; keys left out keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FindexError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            FindexError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        for path in Self::standard_locations() {
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => warn!("Ignoring config file '{}': {e}", path.display()),
            }
        }

        // Fall back to defaults
        Self::default()
    }

    /// `.findex.toml` in the current directory, then up to three parents
    pub fn standard_locations() -> Vec<PathBuf> {
        (0..=3)
            .map(|i| PathBuf::from(format!("{}{}", "../".repeat(i), CONFIG_FILE_NAME)))
            .collect()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref data_path) = cli_config.data_path {
            self.data_path = Some(data_path.clone());
        }
        if let Some(ref encoding) = cli_config.encoding {
            self.encoding = Some(encoding.clone());
        }
        if let Some(delimiter) = cli_config.delimiter {
            self.delimiter = Some(delimiter);
        }
        if let Some(ref economy) = cli_config.economy {
            self.economy = Some(economy.clone());
        }
        if let Some(rows) = cli_config.preview_rows {
            self.preview_rows = Some(rows);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(ref dashboard_path) = cli_config.html_dashboard_path {
            self.html_dashboard_path = Some(dashboard_path.clone());
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(self.data_path.as_deref().unwrap_or(data::DEFAULT_PATH))
    }

    pub fn economy(&self) -> &str {
        self.economy.as_deref().unwrap_or(defaults::ECONOMY)
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows.unwrap_or(defaults::PREVIEW_ROWS)
    }

    pub fn output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    /// Parsing options for the survey loader
    pub fn load_options(&self) -> Result<LoadOptions> {
        let encoding = match self.encoding.as_deref() {
            Some(name) => name.parse::<Encoding>()?,
            None => Encoding::default(),
        };
        let delimiter = self.delimiter.unwrap_or(data::DEFAULT_DELIMITER);
        if !delimiter.is_ascii() {
            return Err(FindexError::Config(format!(
                "Delimiter '{delimiter}' must be a single ASCII character."
            )));
        }

        Ok(LoadOptions {
            delimiter: delimiter as u8,
            encoding,
        })
    }

    /// Report generator configured with this economy and preview size
    pub fn report_generator(&self) -> ReportGenerator {
        ReportGenerator::new(self.economy(), self.preview_rows())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(ref economy) = self.economy {
            if economy.trim().is_empty() {
                return Err(FindexError::Config(
                    "Economy cannot be empty. Expected a country name such as 'Philippines'."
                        .to_string(),
                ));
            }
        }

        if let Some(rows) = self.preview_rows {
            if rows == 0 {
                return Err(FindexError::Config(
                    "Preview rows cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if rows > defaults::MAX_PREVIEW_ROWS {
                return Err(FindexError::Config(format!(
                    "Preview rows of {rows} is too large. Expected at most {}.",
                    defaults::MAX_PREVIEW_ROWS
                )));
            }
        }

        if let Some(ref format) = self.output_format {
            if !output_formats::ALL.contains(&format.as_str()) {
                return Err(FindexError::Config(format!(
                    "Invalid output format '{format}'. Expected one of: {}.",
                    output_formats::ALL.join(", ")
                )));
            }
        }

        if let Some(ref path) = self.data_path {
            if path.trim().is_empty() {
                return Err(FindexError::Config(
                    "Data path cannot be empty.".to_string(),
                ));
            }
        }

        // Encoding and delimiter are checked by building the loader options
        self.load_options()
            .map_err(|e| FindexError::Config(e.to_string()))?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Data source
    pub data_path: Option<String>, // --data
    pub encoding: Option<String>,  // --encoding
    pub delimiter: Option<char>,   // --delimiter

    // Report
    pub economy: Option<String>,     // --economy
    pub preview_rows: Option<usize>, // --rows

    // Output & format
    pub quiet: bool,                         // --quiet
    pub verbose: bool,                       // --verbose
    pub output_format: Option<String>,       // --format
    pub html_dashboard_path: Option<String>, // --html-dashboard

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data_path, Some("micro_world.csv".to_string()));
        assert_eq!(config.economy(), "Philippines");
        assert_eq!(config.preview_rows(), defaults::PREVIEW_ROWS);
        assert_eq!(config.output_format(), output_formats::DEFAULT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(
            b"data_path = \"survey.csv\"\neconomy = \"Kenya\"\npreview_rows = 25\nencoding = \"utf-8\"",
        )?;

        let config = Config::load_from_file(file.path())?;
        assert_eq!(config.data_path(), PathBuf::from("survey.csv"));
        assert_eq!(config.economy(), "Kenya");
        assert_eq!(config.preview_rows(), 25);
        assert_eq!(config.load_options()?.encoding, Encoding::Utf8);
        // keys not present keep their defaults
        assert_eq!(config.output_format(), output_formats::DEFAULT);

        Ok(())
    }

    #[test]
    fn test_config_load_invalid_toml() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"economy = [unclosed")?;

        match Config::load_from_file(file.path()) {
            Err(FindexError::Config(msg)) => assert!(msg.contains("Invalid TOML")),
            other => panic!("Expected Config error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = Config::load_from_file("/no/such/.findex.toml");
        assert!(matches!(result, Err(FindexError::Config(_))));
    }

    #[test]
    fn test_merge_with_cli() {
        let mut config = Config::default();
        let cli_config = CliConfig {
            data_path: Some("other.csv".to_string()),
            economy: Some("Chile".to_string()),
            preview_rows: Some(3),
            delimiter: Some(';'),
            verbose: true,
            output_format: Some("json".to_string()),
            html_dashboard_path: Some("out.html".to_string()),
            ..Default::default()
        };

        config.merge_with_cli(&cli_config);

        assert_eq!(config.data_path(), PathBuf::from("other.csv"));
        assert_eq!(config.economy(), "Chile");
        assert_eq!(config.preview_rows(), 3);
        assert_eq!(config.delimiter, Some(';'));
        assert_eq!(config.verbose, Some(true));
        assert_eq!(config.output_format(), "json");
        assert_eq!(config.html_dashboard_path, Some("out.html".to_string()));
    }

    #[test]
    fn test_merge_keeps_file_values_when_cli_is_silent() {
        let mut config = Config {
            economy: Some("Peru".to_string()),
            verbose: Some(true),
            ..Default::default()
        };
        config.merge_with_cli(&CliConfig::default());

        assert_eq!(config.economy(), "Peru");
        assert_eq!(config.verbose, Some(true));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = vec![
            Config {
                economy: Some("  ".to_string()),
                ..Default::default()
            },
            Config {
                preview_rows: Some(0),
                ..Default::default()
            },
            Config {
                preview_rows: Some(defaults::MAX_PREVIEW_ROWS + 1),
                ..Default::default()
            },
            Config {
                output_format: Some("yaml".to_string()),
                ..Default::default()
            },
            Config {
                encoding: Some("ebcdic".to_string()),
                ..Default::default()
            },
            Config {
                delimiter: Some('§'),
                ..Default::default()
            },
            Config {
                data_path: Some(String::new()),
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(FindexError::Config(_))),
                "expected {config:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_load_options() -> Result<()> {
        let config = Config {
            delimiter: Some('\t'),
            ..Default::default()
        };
        let options = config.load_options()?;
        assert_eq!(options.delimiter, b'\t');
        assert_eq!(options.encoding, Encoding::Latin1);
        Ok(())
    }

    #[test]
    fn test_report_generator_from_config() {
        let config = Config {
            economy: Some("Kenya".to_string()),
            ..Default::default()
        };
        assert_eq!(config.report_generator().economy(), "Kenya");
    }

    #[test]
    fn test_standard_locations() {
        let locations = Config::standard_locations();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0], PathBuf::from(".findex.toml"));
        assert_eq!(locations[3], PathBuf::from("../../../.findex.toml"));
    }
}
