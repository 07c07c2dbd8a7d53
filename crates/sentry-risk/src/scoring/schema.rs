use serde::Serialize;
use tracing::warn;

use super::model::RiskModel;
use super::normalizer::NormalizedRecord;

/// Feature names of the SAR training schema.
pub mod features {
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const COUNTRY_OF_ORIGIN: &str = "Country_of_Origin";
    pub const FAMILY_TIES_STATUS: &str = "Family_Ties_Status";
    pub const PRIOR_TRAFFICKING_HISTORY: &str = "Prior_Trafficking_History";
    pub const PAST_SPONSORSHIPS: &str = "Past_Sponsorships";
    pub const PAST_DENIALS: &str = "Past_Denials";
    pub const FINANCIAL_STATUS: &str = "Financial_Status";
    pub const CRIMINAL_HISTORY: &str = "Criminal_History";
    pub const KNOWN_TRAFFICKING_ROUTE: &str = "Known_Trafficking_Route";
    pub const PAST_HUMAN_TRAFFICKING_CASE: &str = "Past_Human_Trafficking_Case";
    pub const MULTIPLE_ICE_INVESTIGATIONS: &str = "Multiple_ICE_Investigations";
    pub const TRAFFICKING_NETWORK_AFFILIATION: &str = "Trafficking_Network_Affiliation";
    pub const ILLEGAL_BORDER_CROSSING_RECORD: &str = "Illegal_Border_Crossing_Record";
    pub const DUPLICATE_RECORDS: &str = "Duplicate_Records";
    pub const TRAFFICKING_HOTSPOT_RESIDENCE: &str = "Trafficking_Hotspot_Residence";
    pub const FINANCIAL_TRANSACTIONS_FLAGGED: &str = "Financial_Transactions_Flagged";
    pub const MULTIPLE_UNRELATED_UACS: &str = "Multiple_Unrelated_UACs";
    pub const BACKGROUND_CHECK_STATUS: &str = "Background_Check_Status";
    pub const IDENTITY_DOCUMENT_VERIFICATION: &str = "Identity_Document_Verification";
    pub const UNUSUAL_SPONSOR_UAC_RELATIONSHIP: &str = "Unusual_Sponsor_UAC_Relationship";
    pub const HIGH_RISK_INDICATORS: &str = "High_Risk_Indicators";
}

/// Version tag of the training schema that [`FALLBACK_FEATURE_NAMES`] mirrors.
///
/// Bump together with the list whenever the model artifact is retrained.
pub const FALLBACK_SCHEMA_VERSION: &str = "sar-2025.04";

/// Column order used when a model cannot report its own feature names.
pub const FALLBACK_FEATURE_NAMES: [&str; 22] = [
    features::AGE,
    features::GENDER,
    features::COUNTRY_OF_ORIGIN,
    features::FAMILY_TIES_STATUS,
    features::PRIOR_TRAFFICKING_HISTORY,
    features::PAST_SPONSORSHIPS,
    features::PAST_DENIALS,
    features::FINANCIAL_STATUS,
    features::CRIMINAL_HISTORY,
    features::KNOWN_TRAFFICKING_ROUTE,
    features::PAST_HUMAN_TRAFFICKING_CASE,
    features::MULTIPLE_ICE_INVESTIGATIONS,
    features::TRAFFICKING_NETWORK_AFFILIATION,
    features::ILLEGAL_BORDER_CROSSING_RECORD,
    features::DUPLICATE_RECORDS,
    features::TRAFFICKING_HOTSPOT_RESIDENCE,
    features::FINANCIAL_TRANSACTIONS_FLAGGED,
    features::MULTIPLE_UNRELATED_UACS,
    features::BACKGROUND_CHECK_STATUS,
    features::IDENTITY_DOCUMENT_VERIFICATION,
    features::UNUSUAL_SPONSOR_UAC_RELATIONSHIP,
    features::HIGH_RISK_INDICATORS,
];

/// Canonical spelling of a training-schema feature, matched case-insensitively.
pub fn canonical_feature_name(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    FALLBACK_FEATURE_NAMES
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
}

/// Numeric input aligned one-to-one with a model's feature schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where the column order of a reconciled vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledFeatures {
    pub vector: FeatureVector,
    pub source: SchemaSource,
}

/// Align a normalized record to `expected`, zero-filling absent names.
///
/// Output order follows `expected`; normalized fields outside it are dropped.
pub fn reconcile<S: AsRef<str>>(normalized: &NormalizedRecord, expected: &[S]) -> FeatureVector {
    let values = expected
        .iter()
        .map(|name| normalized.get(name.as_ref()).map_or(0.0, |value| value as f64))
        .collect();
    FeatureVector::new(values)
}

/// Reconcile against the model's declared schema, or the fallback list when
/// the model cannot report one.
pub fn reconcile_for_model(normalized: &NormalizedRecord, model: &dyn RiskModel) -> ReconciledFeatures {
    if let Some(names) = model.feature_names() {
        return ReconciledFeatures {
            vector: reconcile(normalized, names),
            source: SchemaSource::Model,
        };
    }

    match model.schema_version() {
        Some(version) if version != FALLBACK_SCHEMA_VERSION => warn!(
            model_schema = version,
            fallback_schema = FALLBACK_SCHEMA_VERSION,
            "model schema version differs from fallback feature list; predictions may be misaligned"
        ),
        _ => warn!(
            fallback_schema = FALLBACK_SCHEMA_VERSION,
            "model exposes no feature names; using fallback feature list"
        ),
    }

    ReconciledFeatures {
        vector: reconcile(normalized, &FALLBACK_FEATURE_NAMES),
        source: SchemaSource::Fallback,
    }
}
