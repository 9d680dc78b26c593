//! Debit card ownership aggregations over survey records
//!
//! Every function here is pure: it borrows the records, derives flags and
//! labels on the fly, and returns freshly built rows.

use std::collections::BTreeMap;

use crate::core::constants::survey_codes;
use crate::core::types::{AggregateRow, CountryRow, Gender, SurveyRecord, percentage};

/// Records whose economy equals `name` exactly, in their original order.
pub fn filter_by_economy<'a>(records: &'a [SurveyRecord], name: &str) -> Vec<&'a SurveyRecord> {
    records
        .iter()
        .filter(|record| record.economy == name)
        .collect()
}

/// 1 when the respondent reports a debit card (`fin2 == 1`), otherwise 0.
///
/// Any other code, including a missing cell, counts as "not owning".
pub fn derive_debit_flag(record: &SurveyRecord) -> u8 {
    u8::from(record.fin2 == Some(survey_codes::HAS_DEBIT_CARD))
}

/// `Female` when `female == 1`, otherwise `Male`.
pub fn derive_gender_label(record: &SurveyRecord) -> Gender {
    if record.female == Some(survey_codes::FEMALE) {
        Gender::Female
    } else {
        Gender::Male
    }
}

/// Percentage of records with a debit card; `NaN` for an empty collection.
pub fn ownership_rate<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let (owners, total) = records.into_iter().fold((0u64, 0u64), |(owners, total), record| {
        (owners + u64::from(derive_debit_flag(record)), total + 1)
    });
    percentage(owners, total)
}

/// Group records by `key_fn` and count owners and respondents per group.
///
/// Every key produced over the input appears exactly once, and the group
/// totals sum to the number of input records.
pub fn aggregate_by<'a, I, K, F>(records: I, key_fn: F) -> BTreeMap<K, AggregateRow>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
    K: Ord,
    F: Fn(&SurveyRecord) -> K,
{
    let mut groups: BTreeMap<K, AggregateRow> = BTreeMap::new();
    for record in records {
        groups
            .entry(key_fn(record))
            .or_default()
            .push(derive_debit_flag(record));
    }
    groups
}

/// Ownership broken down by gender label.
pub fn gender_breakdown<'a, I>(records: I) -> BTreeMap<Gender, AggregateRow>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    aggregate_by(records, derive_gender_label)
}

/// One row per (economy, economy code, region) triple, sorted by that key.
pub fn worldwide_summary(records: &[SurveyRecord]) -> Vec<CountryRow> {
    aggregate_by(records, SurveyRecord::country_key)
        .into_iter()
        .map(|(key, row)| CountryRow { key, row })
        .collect()
}
