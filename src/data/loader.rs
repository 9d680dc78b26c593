use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use csv::{ByteRecord, ReaderBuilder};
use log::debug;

use crate::core::constants::{columns, data};
use crate::core::error::{FindexError, Result};
use crate::core::types::SurveyRecord;
use crate::data::Dataset;

/// Text encoding of the survey file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// ISO-8859-1: every byte is the code point of the same value
    #[default]
    Latin1,
    Utf8,
}

impl FromStr for Encoding {
    type Err = FindexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            other => Err(FindexError::InvalidArgument(format!(
                "Unknown encoding '{other}'. Expected one of: {}.",
                data::encodings::ALL.join(", ")
            ))),
        }
    }
}

impl Encoding {
    fn decode(&self, bytes: &[u8]) -> std::result::Result<String, std::str::Utf8Error> {
        match self {
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Utf8 => std::str::from_utf8(bytes).map(str::to_string),
        }
    }
}

/// How the survey file is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: data::DEFAULT_DELIMITER as u8,
            encoding: Encoding::default(),
        }
    }
}

pub trait SurveySource {
    fn load(&self, path: &Path) -> Result<Dataset>;
}

/// Reads the survey microdata from a delimited text file
#[derive(Default, Debug, Clone)]
pub struct CsvLoader {
    options: LoadOptions,
}

impl SurveySource for CsvLoader {
    fn load(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FindexError::FileNotFound(path.display().to_string()),
            _ => FindexError::Io(e),
        })?;
        let modified = file.metadata().and_then(|m| m.modified()).ok();
        let records = self.read_records(file)?;
        debug!("Read {} survey records from {}", records.len(), path.display());

        Ok(Dataset::new(records, path.to_path_buf(), modified))
    }
}

/// Positions of the required columns in the header row
#[derive(Debug)]
struct ColumnIndex {
    economy: usize,
    economy_code: usize,
    region: usize,
    fin2: usize,
    female: usize,
    wpid: usize,
}

impl CsvLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Parse survey records from any reader; the first row is the header.
    pub fn read_records<R: io::Read>(&self, reader: R) -> Result<Vec<SurveyRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .from_reader(reader);

        let headers = reader.byte_headers()?.clone();
        let index = self.resolve_columns(&headers)?;

        let mut records = Vec::new();
        let mut row = ByteRecord::new();
        while reader.read_byte_record(&mut row)? {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            records.push(self.parse_row(&row, &index, line)?);
        }

        Ok(records)
    }

    fn resolve_columns(&self, headers: &ByteRecord) -> Result<ColumnIndex> {
        let names: Vec<String> = headers
            .iter()
            .map(|raw| {
                self.options
                    .encoding
                    .decode(raw)
                    .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
                    .map_err(|e| FindexError::Encoding(format!("header row: {e}")))
            })
            .collect::<Result<_>>()?;

        let position = |column: &str| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| FindexError::MissingColumn(column.to_string()))
        };

        Ok(ColumnIndex {
            economy: position(columns::ECONOMY)?,
            economy_code: position(columns::ECONOMY_CODE)?,
            region: position(columns::REGION)?,
            fin2: position(columns::FIN2)?,
            female: position(columns::FEMALE)?,
            wpid: position(columns::WPID)?,
        })
    }

    fn parse_row(&self, row: &ByteRecord, index: &ColumnIndex, line: u64) -> Result<SurveyRecord> {
        let text = |position: usize, column: &str| -> Result<String> {
            let raw = row.get(position).unwrap_or_default();
            self.options
                .encoding
                .decode(raw)
                .map_err(|e| FindexError::Encoding(format!("line {line}, column '{column}': {e}")))
        };

        Ok(SurveyRecord {
            economy: text(index.economy, columns::ECONOMY)?,
            economy_code: text(index.economy_code, columns::ECONOMY_CODE)?,
            region: text(index.region, columns::REGION)?,
            fin2: parse_code(&text(index.fin2, columns::FIN2)?, columns::FIN2, line)?,
            female: parse_code(&text(index.female, columns::FEMALE)?, columns::FEMALE, line)?,
            wpid_random: text(index.wpid, columns::WPID)?,
        })
    }
}

/// Read an integer answer code.
///
/// Empty cells are missing answers. Integral floats (`"1.0"`) are accepted
/// because exports that pass through a dataframe often write codes that way.
pub fn parse_code(cell: &str, column: &str, line: u64) -> Result<Option<i64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    if let Ok(code) = cell.parse::<i64>() {
        return Ok(Some(code));
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(Some(value as i64)),
        _ => Err(FindexError::DataFormat {
            line,
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}
