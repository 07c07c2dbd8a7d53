use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::normalizer::{coerce_age, coerce_count, is_truthy};

/// Loosely-typed value as entered on a form or read from an upstream export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Flag(value) => write!(f, "{value}"),
            RawValue::Integer(value) => write!(f, "{value}"),
            RawValue::Decimal(value) => write!(f, "{value}"),
            RawValue::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Flag(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Caller contract violations caught before a record enters the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a non-negative whole number, got {value}")]
    InvalidCount { field: &'static str, value: String },
    #[error("{field} must be a whole number between 0 and 130, got {value}")]
    InvalidAge { field: &'static str, value: String },
}

/// Case attributes as submitted by the form layer or a batch loader.
///
/// Field names accept the original export column names as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseSubmission {
    #[serde(default, alias = "Age")]
    pub age: Option<RawValue>,
    #[serde(default, alias = "Gender")]
    pub gender: Option<String>,
    #[serde(default, alias = "Country_of_Origin")]
    pub country_of_origin: Option<String>,
    #[serde(default, alias = "Family_Ties_Status")]
    pub family_ties_status: Option<String>,
    #[serde(default, alias = "Financial_Status")]
    pub financial_status: Option<String>,
    #[serde(default, alias = "Criminal_History")]
    pub criminal_history: Option<RawValue>,
    #[serde(default, alias = "Prior_Trafficking_History")]
    pub prior_trafficking_history: Option<RawValue>,
    #[serde(
        default,
        alias = "Trafficking_Network_Affiliation",
        alias = "Network_Affiliation"
    )]
    pub network_affiliation: Option<RawValue>,
    #[serde(default, alias = "Known_Trafficking_Route")]
    pub known_trafficking_route: Option<RawValue>,
    #[serde(default, alias = "Past_Sponsorships")]
    pub past_sponsorships: Option<RawValue>,
    #[serde(default, alias = "Past_Denials")]
    pub past_denials: Option<RawValue>,
    /// Remaining boolean-like indicator columns of the training schema.
    #[serde(default)]
    pub indicators: BTreeMap<String, RawValue>,
}

impl CaseSubmission {
    /// Coerce the submission into a typed record, failing on non-coercible numbers.
    pub fn validate(&self) -> Result<CaseRecord, ValidationError> {
        Ok(CaseRecord {
            age: coerce_age("age", self.age.as_ref())?,
            gender: self.gender.clone(),
            country_of_origin: self.country_of_origin.clone(),
            family_ties_status: self.family_ties_status.clone(),
            financial_status: self.financial_status.clone(),
            criminal_history: is_truthy(self.criminal_history.as_ref()),
            prior_trafficking_history: is_truthy(self.prior_trafficking_history.as_ref()),
            network_affiliation: is_truthy(self.network_affiliation.as_ref()),
            known_trafficking_route: is_truthy(self.known_trafficking_route.as_ref()),
            past_sponsorships: coerce_count("past_sponsorships", self.past_sponsorships.as_ref())?,
            past_denials: coerce_count("past_denials", self.past_denials.as_ref())?,
            indicators: self
                .indicators
                .iter()
                .map(|(name, value)| (name.clone(), is_truthy(Some(value))))
                .collect(),
        })
    }
}

/// Validated case record consumed by the feature normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub country_of_origin: Option<String>,
    pub family_ties_status: Option<String>,
    pub financial_status: Option<String>,
    pub criminal_history: bool,
    pub prior_trafficking_history: bool,
    pub network_affiliation: bool,
    pub known_trafficking_route: bool,
    pub past_sponsorships: u32,
    pub past_denials: u32,
    pub indicators: BTreeMap<String, bool>,
}

/// Outcome of the external verification systems a sponsor is checked against.
///
/// Failed checks and watch-list hits add to the score after the rule blend;
/// anything not reported counts as passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemChecks {
    pub is_duplicate: bool,
    pub high_trafficking_area: bool,
    pub sponsor_registration_passed: bool,
    pub fingerprint_check_passed: bool,
    pub vetting_passed: bool,
    pub ice_hit: bool,
    pub cbp_hit: bool,
    pub uac_portal_passed: bool,
    pub identity_access_passed: bool,
    pub atims_passed: bool,
}

impl Default for SystemChecks {
    fn default() -> Self {
        Self {
            is_duplicate: false,
            high_trafficking_area: false,
            sponsor_registration_passed: true,
            fingerprint_check_passed: true,
            vetting_passed: true,
            ice_hit: false,
            cbp_hit: false,
            uac_portal_passed: true,
            identity_access_passed: true,
            atims_passed: true,
        }
    }
}

/// Rule-blend signals as submitted; validated into [`RiskFactors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorSubmission {
    #[serde(default)]
    pub sponsor_age: Option<RawValue>,
    #[serde(default, alias = "Criminal_History")]
    pub criminal_history: Option<RawValue>,
    #[serde(default, alias = "Prior_Trafficking_History", alias = "prior_trafficking")]
    pub prior_trafficking_history: Option<RawValue>,
    #[serde(default, alias = "Trafficking_Network_Affiliation")]
    pub network_affiliation: Option<RawValue>,
    #[serde(default, alias = "Known_Trafficking_Route", alias = "known_route")]
    pub known_trafficking_route: Option<RawValue>,
    #[serde(default, alias = "Past_Sponsorships")]
    pub past_sponsorships: Option<RawValue>,
    #[serde(default, alias = "Past_Denials")]
    pub past_denials: Option<RawValue>,
    /// Number of existing records matching this sponsor.
    #[serde(default)]
    pub duplicate_matches: Option<RawValue>,
    #[serde(default)]
    pub system_checks: Option<SystemChecks>,
}

impl RiskFactorSubmission {
    pub fn validate(&self) -> Result<RiskFactors, ValidationError> {
        Ok(RiskFactors {
            sponsor_age: coerce_age("sponsor_age", self.sponsor_age.as_ref())?,
            criminal_history: is_truthy(self.criminal_history.as_ref()),
            prior_trafficking_history: is_truthy(self.prior_trafficking_history.as_ref()),
            network_affiliation: is_truthy(self.network_affiliation.as_ref()),
            known_trafficking_route: is_truthy(self.known_trafficking_route.as_ref()),
            past_sponsorships: coerce_count("past_sponsorships", self.past_sponsorships.as_ref())?,
            past_denials: coerce_count("past_denials", self.past_denials.as_ref())?,
            duplicate_matches: coerce_count("duplicate_matches", self.duplicate_matches.as_ref())?,
            system_checks: self.system_checks,
        })
    }
}

/// Validated signals consumed only by the rule blender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub sponsor_age: Option<u32>,
    pub criminal_history: bool,
    pub prior_trafficking_history: bool,
    pub network_affiliation: bool,
    pub known_trafficking_route: bool,
    pub past_sponsorships: u32,
    pub past_denials: u32,
    pub duplicate_matches: u32,
    pub system_checks: Option<SystemChecks>,
}

/// Single evaluation request: the model-facing record plus blend signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub record: CaseSubmission,
    #[serde(default)]
    pub risk_factors: RiskFactorSubmission,
}

impl EvaluationRequest {
    pub fn validate(&self) -> Result<(CaseRecord, RiskFactors), ValidationError> {
        Ok((self.record.validate()?, self.risk_factors.validate()?))
    }
}

/// Batch entry prior to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCase {
    pub case_id: String,
    #[serde(default)]
    pub record: CaseSubmission,
    #[serde(default)]
    pub risk_factors: RiskFactorSubmission,
}

/// Validated case keyed by the caller's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEnvelope {
    pub case_id: String,
    pub record: CaseRecord,
    pub risk_factors: RiskFactors,
}

impl BatchCase {
    pub fn validate(&self) -> Result<CaseEnvelope, ValidationError> {
        Ok(CaseEnvelope {
            case_id: self.case_id.clone(),
            record: self.record.validate()?,
            risk_factors: self.risk_factors.validate()?,
        })
    }
}
