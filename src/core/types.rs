use serde::Serialize;
use std::fmt;

use crate::core::constants::labels;

/// One respondent row of the Findex microdata.
///
/// Records are read once by the loader and never mutated afterwards; every
/// derived value (debit flag, gender label) is computed from the record on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyRecord {
    /// Country name (`economy`)
    pub economy: String,
    /// ISO-like country code (`economycode`)
    pub economy_code: String,
    /// World Bank region (`regionwb`)
    pub region: String,
    /// Debit card answer code (`fin2`); `None` when the cell was empty
    pub fin2: Option<i64>,
    /// Gender indicator (`female`); `None` when the cell was empty
    pub female: Option<i64>,
    /// Opaque respondent identifier (`wpid_random`), only ever counted
    pub wpid_random: String,
}

/// Builder for creating `SurveyRecord` instances.
#[derive(Debug, Default)]
pub struct SurveyRecordBuilder {
    economy: String,
    economy_code: String,
    region: String,
    fin2: Option<i64>,
    female: Option<i64>,
    wpid_random: String,
}

impl SurveyRecord {
    /// Create a builder for constructing SurveyRecord instances.
    ///
    /// # Examples
    /// ```
    /// use findex::core::types::SurveyRecord;
    ///
    /// let record = SurveyRecord::builder()
    ///     .economy("Philippines")
    ///     .economy_code("PHL")
    ///     .fin2(1)
    ///     .female(1)
    ///     .build();
    /// assert_eq!(record.economy, "Philippines");
    /// assert_eq!(record.fin2, Some(1));
    /// ```
    pub fn builder() -> SurveyRecordBuilder {
        SurveyRecordBuilder::default()
    }

    /// Grouping key used by the worldwide summary.
    pub fn country_key(&self) -> CountryKey {
        CountryKey {
            economy: self.economy.clone(),
            economy_code: self.economy_code.clone(),
            region: self.region.clone(),
        }
    }
}

impl SurveyRecordBuilder {
    pub fn economy<S: Into<String>>(mut self, economy: S) -> Self {
        self.economy = economy.into();
        self
    }

    pub fn economy_code<S: Into<String>>(mut self, economy_code: S) -> Self {
        self.economy_code = economy_code.into();
        self
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }

    pub fn fin2(mut self, fin2: i64) -> Self {
        self.fin2 = Some(fin2);
        self
    }

    pub fn female(mut self, female: i64) -> Self {
        self.female = Some(female);
        self
    }

    pub fn wpid_random<S: Into<String>>(mut self, wpid_random: S) -> Self {
        self.wpid_random = wpid_random.into();
        self
    }

    pub fn build(self) -> SurveyRecord {
        SurveyRecord {
            economy: self.economy,
            economy_code: self.economy_code,
            region: self.region,
            fin2: self.fin2,
            female: self.female,
            wpid_random: self.wpid_random,
        }
    }
}

/// Binary gender partition of the `female` indicator.
///
/// The source field only distinguishes "female" from everything else, so no
/// other category is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => labels::FEMALE,
            Gender::Male => labels::MALE,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Country grouping key: (economy, economy code, region)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CountryKey {
    pub economy: String,
    pub economy_code: String,
    pub region: String,
}

/// Grouped summary of debit card ownership.
///
/// `owners` is the sum of debit flags over the group, `total` the number of
/// respondent identifiers, and `percentage` is `owners * 100 / total`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateRow {
    pub owners: u64,
    pub total: u64,
    #[serde(serialize_with = "serialize_percentage")]
    pub percentage: f64,
}

impl AggregateRow {
    /// Build a row from exact counts, deriving the percentage.
    ///
    /// A group with no members has an undefined percentage (`NaN`).
    pub fn from_counts(owners: u64, total: u64) -> Self {
        Self {
            owners,
            total,
            percentage: percentage(owners, total),
        }
    }

    /// Add one member with the given debit flag.
    pub(crate) fn push(&mut self, flag: u8) {
        self.owners += u64::from(flag);
        self.total += 1;
        self.percentage = percentage(self.owners, self.total);
    }
}

/// One bubble's worth of data: a country and its ownership figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    #[serde(flatten)]
    pub key: CountryKey,
    #[serde(flatten)]
    pub row: AggregateRow,
}

/// `owners * 100 / total`, `NaN` for an empty group.
pub fn percentage(owners: u64, total: u64) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        owners as f64 * 100.0 / total as f64
    }
}

/// JSON has no NaN; undefined percentages serialize as `null`.
pub(crate) fn serialize_percentage<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}
