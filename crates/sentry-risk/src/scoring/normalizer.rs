use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{CaseRecord, RawValue, ValidationError};
use super::schema::features;

/// Code assigned to a country outside the training table.
pub const UNKNOWN_COUNTRY: i64 = -1;

const MAX_AGE: u32 = 130;

const FALSY_TEXT: &[&str] = &["false", "no", "n", "0", "off", "none"];

/// Record after every categorical and boolean field has been encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, i64>,
}

impl NormalizedRecord {
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Encode a validated record into the model's feature vocabulary.
pub fn normalize(record: &CaseRecord) -> NormalizedRecord {
    let mut normalized = NormalizedRecord::default();

    // Indicators first so the named fields below win on a name clash.
    for (name, flag) in &record.indicators {
        normalized.insert(name.clone(), flag_code(*flag));
    }

    if let Some(age) = record.age {
        normalized.insert(features::AGE, i64::from(age));
    }
    normalized.insert(features::GENDER, gender_code(record.gender.as_deref()));
    normalized.insert(
        features::COUNTRY_OF_ORIGIN,
        country_code(record.country_of_origin.as_deref()),
    );
    normalized.insert(
        features::FAMILY_TIES_STATUS,
        family_ties_code(record.family_ties_status.as_deref()),
    );
    normalized.insert(
        features::FINANCIAL_STATUS,
        financial_status_code(record.financial_status.as_deref()),
    );

    normalized.insert(features::CRIMINAL_HISTORY, flag_code(record.criminal_history));
    normalized.insert(
        features::PRIOR_TRAFFICKING_HISTORY,
        flag_code(record.prior_trafficking_history),
    );
    normalized.insert(
        features::TRAFFICKING_NETWORK_AFFILIATION,
        flag_code(record.network_affiliation),
    );
    normalized.insert(
        features::KNOWN_TRAFFICKING_ROUTE,
        flag_code(record.known_trafficking_route),
    );

    normalized.insert(features::PAST_SPONSORSHIPS, i64::from(record.past_sponsorships));
    normalized.insert(features::PAST_DENIALS, i64::from(record.past_denials));

    // Interaction feature the regressor was trained with.
    normalized.insert(
        features::HIGH_RISK_INDICATORS,
        flag_code(record.past_denials > 0 && record.criminal_history),
    );

    normalized
}

/// "M" and "Male" encode as 1; every other value, or none, as 0.
pub fn gender_code(value: Option<&str>) -> i64 {
    match value {
        Some("M") | Some("Male") => 1,
        _ => 0,
    }
}

pub fn country_code(value: Option<&str>) -> i64 {
    match value {
        Some("Honduras") => 0,
        Some("Guatemala") => 1,
        Some("El Salvador") => 2,
        Some("Mexico") => 3,
        _ => UNKNOWN_COUNTRY,
    }
}

pub fn family_ties_code(value: Option<&str>) -> i64 {
    match value {
        Some("Verified") => 1,
        _ => 0,
    }
}

pub fn financial_status_code(value: Option<&str>) -> i64 {
    match value {
        Some("Medium") => 1,
        Some("High") => 2,
        _ => 0,
    }
}

fn flag_code(flag: bool) -> i64 {
    i64::from(flag)
}

pub(crate) fn is_truthy(value: Option<&RawValue>) -> bool {
    match value {
        None => false,
        Some(RawValue::Flag(flag)) => *flag,
        Some(RawValue::Integer(number)) => *number != 0,
        Some(RawValue::Decimal(number)) => number.is_finite() && *number != 0.0,
        Some(RawValue::Text(text)) => {
            let trimmed = text.trim();
            !trimmed.is_empty()
                && !FALSY_TEXT
                    .iter()
                    .any(|falsy| falsy.eq_ignore_ascii_case(trimmed))
        }
    }
}

/// Absent counts default to zero; anything present must coerce to a
/// non-negative whole number.
pub(crate) fn coerce_count(
    field: &'static str,
    value: Option<&RawValue>,
) -> Result<u32, ValidationError> {
    let Some(value) = value else {
        return Ok(0);
    };

    whole_number(value)
        .and_then(|number| u32::try_from(number).ok())
        .ok_or_else(|| ValidationError::InvalidCount {
            field,
            value: value.to_string(),
        })
}

pub(crate) fn coerce_age(
    field: &'static str,
    value: Option<&RawValue>,
) -> Result<Option<u32>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };

    whole_number(value)
        .and_then(|number| u32::try_from(number).ok())
        .filter(|age| *age <= MAX_AGE)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidAge {
            field,
            value: value.to_string(),
        })
}

fn whole_number(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Flag(flag) => Some(i64::from(*flag)),
        RawValue::Integer(number) => Some(*number),
        RawValue::Decimal(number) if number.is_finite() => Some(number.trunc() as i64),
        RawValue::Decimal(_) => None,
        RawValue::Text(text) => text.trim().parse::<i64>().ok(),
    }
}
