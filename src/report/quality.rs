use serde::Serialize;

use crate::core::constants::survey_codes;
use crate::core::types::SurveyRecord;

/// Tally of answer codes that the aggregations coerce.
///
/// `derive_debit_flag` treats every `fin2` other than 1 as "not owning" and
/// `derive_gender_label` treats every `female` other than 1 as "male". Codes
/// outside the documented answers (don't know, refused, blank) are counted
/// here so the coercion can be reported instead of silently absorbed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    /// Records scanned
    pub records: usize,
    /// `fin2` cells that are missing or neither yes (1) nor no (2)
    pub fin2_unexpected: usize,
    /// `female` cells that are missing or not a known gender code
    pub female_unexpected: usize,
}

impl DataQuality {
    pub fn scan(records: &[SurveyRecord]) -> Self {
        let mut quality = DataQuality {
            records: records.len(),
            ..Default::default()
        };

        for record in records {
            if !matches!(
                record.fin2,
                Some(survey_codes::HAS_DEBIT_CARD) | Some(survey_codes::NO_DEBIT_CARD)
            ) {
                quality.fin2_unexpected += 1;
            }
            let known_gender = record
                .female
                .is_some_and(|code| survey_codes::KNOWN_FEMALE_CODES.contains(&code));
            if !known_gender {
                quality.female_unexpected += 1;
            }
        }

        quality
    }

    pub fn is_clean(&self) -> bool {
        self.fin2_unexpected == 0 && self.female_unexpected == 0
    }
}
