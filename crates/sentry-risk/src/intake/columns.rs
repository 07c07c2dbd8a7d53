use std::collections::HashMap;
use std::sync::OnceLock;

use crate::scoring::schema::canonical_feature_name;

/// Where a batch CSV column lands in a [`crate::scoring::BatchCase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    CaseId,
    Age,
    SponsorAge,
    Gender,
    CountryOfOrigin,
    FamilyTies,
    FinancialStatus,
    /// Signals read by both the model record and the rule blend.
    CriminalHistory,
    PriorTrafficking,
    NetworkAffiliation,
    KnownRoute,
    PastSponsorships,
    PastDenials,
    DuplicateMatches,
    Check(SystemCheck),
    Indicator(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SystemCheck {
    IsDuplicate,
    HighTrafficking,
    SponsorRegistration,
    Fingerprint,
    Vetting,
    Ice,
    Cbp,
    UacPortal,
    IdentityAccess,
    Atims,
}

static COLUMN_MAP: OnceLock<HashMap<String, Column>> = OnceLock::new();

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    let key = normalize_header(header);
    if let Some(column) = column_map().get(&key) {
        return Some(*column);
    }

    canonical_feature_name(&key).map(Column::Indicator)
}

fn column_map() -> &'static HashMap<String, Column> {
    COLUMN_MAP.get_or_init(|| {
        const HEADER_TO_COLUMN: &[(&str, Column)] = &[
            ("case_id", Column::CaseId),
            ("case", Column::CaseId),
            ("id", Column::CaseId),
            ("sponsor_id", Column::CaseId),
            ("age", Column::Age),
            ("uac_age", Column::Age),
            ("sponsor_age", Column::SponsorAge),
            ("gender", Column::Gender),
            ("country_of_origin", Column::CountryOfOrigin),
            ("country", Column::CountryOfOrigin),
            ("family_ties_status", Column::FamilyTies),
            ("family_ties", Column::FamilyTies),
            ("financial_status", Column::FinancialStatus),
            ("criminal_history", Column::CriminalHistory),
            ("prior_trafficking_history", Column::PriorTrafficking),
            ("prior_trafficking", Column::PriorTrafficking),
            ("trafficking_network_affiliation", Column::NetworkAffiliation),
            ("network_affiliation", Column::NetworkAffiliation),
            ("known_trafficking_route", Column::KnownRoute),
            ("known_route", Column::KnownRoute),
            ("past_sponsorships", Column::PastSponsorships),
            ("past_denials", Column::PastDenials),
            ("duplicate_matches", Column::DuplicateMatches),
            ("duplicate_count", Column::DuplicateMatches),
            // Verification system columns of the registry export.
            ("is_duplicate", Column::Check(SystemCheck::IsDuplicate)),
            ("high_trafficking", Column::Check(SystemCheck::HighTrafficking)),
            ("high_trafficking_area", Column::Check(SystemCheck::HighTrafficking)),
            ("sponsor_registration", Column::Check(SystemCheck::SponsorRegistration)),
            ("fbi_fingerprint_galton", Column::Check(SystemCheck::Fingerprint)),
            ("fbi_fingerprint", Column::Check(SystemCheck::Fingerprint)),
            ("fingerprint_check", Column::Check(SystemCheck::Fingerprint)),
            ("purple_vetting", Column::Check(SystemCheck::Vetting)),
            ("vetting", Column::Check(SystemCheck::Vetting)),
            ("ice", Column::Check(SystemCheck::Ice)),
            ("ice_hit", Column::Check(SystemCheck::Ice)),
            ("cbp", Column::Check(SystemCheck::Cbp)),
            ("cbp_hit", Column::Check(SystemCheck::Cbp)),
            ("uac_portal", Column::Check(SystemCheck::UacPortal)),
            ("orange_iam", Column::Check(SystemCheck::IdentityAccess)),
            ("identity_access", Column::Check(SystemCheck::IdentityAccess)),
            ("atims", Column::Check(SystemCheck::Atims)),
        ];

        HEADER_TO_COLUMN
            .iter()
            .map(|(header, column)| (normalize_header(header), *column))
            .collect()
    })
}

/// Lower-case with every run of non-alphanumerics collapsed to `_`.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let mut normalized = String::with_capacity(cleaned.len());
    let mut pending_separator = false;

    for ch in cleaned.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    normalized
}
