/// Application-wide constants to avoid magic values throughout the codebase.
///
/// Column names, survey codes, page copy and output settings live here so the
/// loader, the report generator and the renderers agree on them.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful, sectioned output
    pub const TEXT: &str = "text";
    /// JSON output format - structured payload for automation
    pub const JSON: &str = "json";
    /// Minimal output format - plain key/value lines without colors
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Column names the survey file must carry
pub mod columns {
    pub const ECONOMY: &str = "economy";
    pub const ECONOMY_CODE: &str = "economycode";
    pub const REGION: &str = "regionwb";
    pub const FIN2: &str = "fin2";
    pub const FEMALE: &str = "female";
    pub const WPID: &str = "wpid_random";

    /// Every column the loader requires, in preview order
    pub const REQUIRED: [&str; 6] = [ECONOMY, ECONOMY_CODE, REGION, FIN2, FEMALE, WPID];
}

/// Answer codes used by the Findex questionnaire
pub mod survey_codes {
    /// `fin2 == 1`: respondent has a debit card
    pub const HAS_DEBIT_CARD: i64 = 1;
    /// `fin2 == 2`: respondent has no debit card
    pub const NO_DEBIT_CARD: i64 = 2;
    /// `female == 1`: respondent is female
    pub const FEMALE: i64 = 1;
    /// Values of `female` that are understood as a real answer
    pub const KNOWN_FEMALE_CODES: [i64; 3] = [0, 1, 2];
}

/// Source file defaults
pub mod data {
    /// Default survey file, relative to the working directory
    pub const DEFAULT_PATH: &str = "micro_world.csv";
    /// Default field delimiter
    pub const DEFAULT_DELIMITER: char = ',';
    /// The published microdata is ISO-8859-1
    pub const DEFAULT_ENCODING: &str = encodings::LATIN1;

    pub mod encodings {
        pub const LATIN1: &str = "latin1";
        pub const UTF8: &str = "utf-8";

        pub const ALL: [&str; 2] = [LATIN1, UTF8];
    }
}

/// Default configuration values
pub mod defaults {
    /// Economy featured on the country page
    pub const ECONOMY: &str = "Philippines";
    /// Rows shown in the data preview on the introduction page
    pub const PREVIEW_ROWS: usize = 10;
    /// Upper bound for the data preview
    pub const MAX_PREVIEW_ROWS: usize = 1000;
}

/// Labels and copy shared by every renderer
pub mod labels {
    pub const FEMALE: &str = "female";
    pub const MALE: &str = "male";

    pub const OWNERSHIP_METRIC: &str = "% of Population with Debit Card";
    pub const GENDER_AXIS: &str = "Gender";
    pub const OWNERSHIP_AXIS: &str = "% Debit Card Ownership";
    pub const WORLD_SIZE_COLUMN: &str = "% of population with debit card";
    pub const GENDER_PCT_COLUMN: &str = "% debit card ownership";
    pub const OWNERS_COLUMN: &str = "total_debit_card_owners";
    pub const POPULATION_COLUMN: &str = "total_population";
    pub const DATA_SOURCE: &str = "Source: Global Findex 2021 from World Bank.";
    pub const PROJECTION: &str = "natural earth";
}

/// Display and formatting constants
pub mod display {
    /// Emoji for section headers
    pub const PAGE_EMOJI: &str = "📜";
    /// Emoji for metrics
    pub const METRIC_EMOJI: &str = "📊";
    /// Emoji for charts
    pub const CHART_EMOJI: &str = "📈";
    /// Emoji for the bubble map
    pub const MAP_EMOJI: &str = "🌍";
    /// Emoji for tables
    pub const TABLE_EMOJI: &str = "📋";
    /// Width of the widest bar in a terminal bar chart
    pub const BAR_WIDTH: usize = 40;
    /// Rendering of an undefined percentage
    pub const NAN_TEXT: &str = "NaN";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats_constants() {
        assert_eq!(output_formats::TEXT, "text");
        assert_eq!(output_formats::JSON, "json");
        assert_eq!(output_formats::MINIMAL, "minimal");
        assert_eq!(output_formats::DEFAULT, "text");
        assert_eq!(output_formats::ALL.len(), 3);
    }

    #[test]
    fn test_required_columns() {
        assert_eq!(columns::REQUIRED.len(), 6);
        assert!(columns::REQUIRED.contains(&"wpid_random"));
        assert!(columns::REQUIRED.contains(&"regionwb"));
    }

    #[test]
    fn test_survey_codes() {
        assert_eq!(survey_codes::HAS_DEBIT_CARD, 1);
        assert_eq!(survey_codes::FEMALE, 1);
        assert!(survey_codes::KNOWN_FEMALE_CODES.contains(&2));
    }

    #[test]
    fn test_data_defaults() {
        assert_eq!(data::DEFAULT_PATH, "micro_world.csv");
        assert_eq!(data::DEFAULT_ENCODING, "latin1");
        assert_eq!(defaults::ECONOMY, "Philippines");
        assert!(defaults::PREVIEW_ROWS <= defaults::MAX_PREVIEW_ROWS);
    }
}
