use std::fmt;

/// Comprehensive error types for findex operations
#[derive(Debug)]
pub enum FindexError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// CSV reader error
    Csv(csv::Error),

    /// Survey file not found
    FileNotFound(String),

    /// A required column is absent from the survey header
    MissingColumn(String),

    /// Survey bytes are not valid in the configured encoding
    Encoding(String),

    /// A numeric cell could not be read as an integer code
    DataFormat {
        line: u64,
        column: String,
        value: String,
    },

    /// Configuration error
    Config(String),

    /// Invalid argument error
    InvalidArgument(String),

    /// JSON serialization error
    Json(serde_json::Error),

    /// Interactive prompt error
    Dialog(dialoguer::Error),
}

impl fmt::Display for FindexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindexError::Io(err) => write!(f, "IO error: {err}"),
            FindexError::Csv(err) => write!(f, "CSV error: {err}"),
            FindexError::FileNotFound(path) => write!(f, "File not found: {path}"),
            FindexError::MissingColumn(column) => {
                write!(f, "Missing column: '{column}' is required in the survey file")
            }
            FindexError::Encoding(msg) => write!(f, "Encoding error: {msg}"),
            FindexError::DataFormat {
                line,
                column,
                value,
            } => write!(
                f,
                "Data format error: line {line}, column '{column}': '{value}' is not an integer code"
            ),
            FindexError::Config(msg) => write!(f, "Configuration error: {msg}"),
            FindexError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            FindexError::Json(err) => write!(f, "JSON error: {err}"),
            FindexError::Dialog(err) => write!(f, "Dialog error: {err}"),
        }
    }
}

impl std::error::Error for FindexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FindexError::Io(err) => Some(err),
            FindexError::Csv(err) => Some(err),
            FindexError::Json(err) => Some(err),
            FindexError::Dialog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FindexError {
    fn from(err: std::io::Error) -> Self {
        FindexError::Io(err)
    }
}

impl From<csv::Error> for FindexError {
    fn from(err: csv::Error) -> Self {
        FindexError::Csv(err)
    }
}

impl From<serde_json::Error> for FindexError {
    fn from(err: serde_json::Error) -> Self {
        FindexError::Json(err)
    }
}

impl From<dialoguer::Error> for FindexError {
    fn from(err: dialoguer::Error) -> Self {
        FindexError::Dialog(err)
    }
}

/// Type alias for Results using FindexError
pub type Result<T> = std::result::Result<T, FindexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let config_error = FindexError::Config("Invalid economy".to_string());
        assert_eq!(
            format!("{config_error}"),
            "Configuration error: Invalid economy"
        );

        let file_error = FindexError::FileNotFound("/path/to/micro_world.csv".to_string());
        assert_eq!(
            format!("{file_error}"),
            "File not found: /path/to/micro_world.csv"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let err = FindexError::MissingColumn("fin2".to_string());
        assert_eq!(
            err.to_string(),
            "Missing column: 'fin2' is required in the survey file"
        );
    }

    #[test]
    fn test_data_format_display() {
        let err = FindexError::DataFormat {
            line: 7,
            column: "female".to_string(),
            value: "yes".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("'female'"));
        assert!(text.contains("'yes'"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let findex_error = FindexError::from(io_error);

        match findex_error {
            FindexError::Io(_) => {} // Expected
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let findex_error = FindexError::from(json_error);

        assert!(matches!(findex_error, FindexError::Json(_)));
    }

    #[test]
    fn test_string_error_variants_display() {
        let errors = vec![
            FindexError::Config("Bad config".to_string()),
            FindexError::FileNotFound("/missing".to_string()),
            FindexError::MissingColumn("economy".to_string()),
            FindexError::Encoding("line 3 is not valid utf-8".to_string()),
            FindexError::InvalidArgument("Bad arg".to_string()),
        ];

        for error in errors {
            let display_str = format!("{error}");
            assert!(!display_str.is_empty());
            assert!(display_str.contains(":"));
        }
    }

    #[test]
    fn test_error_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let findex_error = FindexError::Io(io_error);

        assert!(findex_error.source().is_some());

        let config_error = FindexError::Config("test".to_string());
        assert!(config_error.source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FindexError>();
    }
}
