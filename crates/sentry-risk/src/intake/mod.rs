//! Batch intake of case exports.
//!
//! A CSV with a header row is read into [`BatchCase`] values; each row feeds
//! both the model-facing record and the rule-blend signals. Unknown columns
//! are skipped.

mod columns;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::scoring::domain::{
    BatchCase, CaseEnvelope, CaseSubmission, RawValue, RiskFactorSubmission, SystemChecks,
    ValidationError,
};
use crate::scoring::normalizer::is_truthy;
use columns::{column_for_header, Column, SystemCheck};

#[derive(Debug)]
pub enum IntakeError {
    Io(std::io::Error),
    Csv(csv::Error),
    Case {
        case_id: String,
        source: ValidationError,
    },
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeError::Io(err) => write!(f, "failed to read case export: {}", err),
            IntakeError::Csv(err) => write!(f, "invalid case CSV data: {}", err),
            IntakeError::Case { case_id, source } => {
                write!(f, "case {} failed validation: {}", case_id, source)
            }
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntakeError::Io(err) => Some(err),
            IntakeError::Csv(err) => Some(err),
            IntakeError::Case { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub fn load_cases<P: AsRef<Path>>(path: P) -> Result<Vec<BatchCase>, IntakeError> {
    let file = std::fs::File::open(path)?;
    parse_cases(file)
}

/// Read every data row of a case export.
///
/// Rows without a case id column value are keyed `row-<n>` using the
/// 1-based data line.
pub fn parse_cases<R: Read>(reader: R) -> Result<Vec<BatchCase>, IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let layout: Vec<Option<Column>> = csv_reader
        .headers()?
        .iter()
        .map(|header| {
            let column = column_for_header(header);
            if column.is_none() {
                debug!(header, "ignoring unrecognized case column");
            }
            column
        })
        .collect();

    let mut cases = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let mut builder = CaseBuilder::default();

        for (column, cell) in layout.iter().zip(row.iter()) {
            if let (Some(column), Some(value)) = (column, cell_value(cell)) {
                builder.apply(*column, cell, value);
            }
        }

        cases.push(builder.finish(index + 1));
    }

    Ok(cases)
}

/// Validate every case, stopping at the first failure.
pub fn validate_batch(cases: &[BatchCase]) -> Result<Vec<CaseEnvelope>, IntakeError> {
    cases
        .iter()
        .map(|case| {
            case.validate().map_err(|source| IntakeError::Case {
                case_id: case.case_id.clone(),
                source,
            })
        })
        .collect()
}

pub fn read_batch<R: Read>(reader: R) -> Result<Vec<CaseEnvelope>, IntakeError> {
    validate_batch(&parse_cases(reader)?)
}

fn cell_value(cell: &str) -> Option<RawValue> {
    if cell.is_empty() {
        return None;
    }

    if let Ok(number) = cell.parse::<i64>() {
        return Some(RawValue::Integer(number));
    }
    // Spreadsheet exports write missing numbers as `nan`.
    if let Ok(number) = cell.parse::<f64>() {
        return number.is_finite().then_some(RawValue::Decimal(number));
    }
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(RawValue::Flag(true)),
        "false" => Some(RawValue::Flag(false)),
        _ => Some(RawValue::Text(cell.to_string())),
    }
}

#[derive(Debug, Default)]
struct CaseBuilder {
    case_id: Option<String>,
    record: CaseSubmission,
    factors: RiskFactorSubmission,
    checks: Option<SystemChecks>,
}

impl CaseBuilder {
    fn apply(&mut self, column: Column, cell: &str, value: RawValue) {
        match column {
            Column::CaseId => self.case_id = Some(cell.to_string()),
            Column::Age => self.record.age = Some(value),
            Column::SponsorAge => self.factors.sponsor_age = Some(value),
            Column::Gender => self.record.gender = Some(cell.to_string()),
            Column::CountryOfOrigin => self.record.country_of_origin = Some(cell.to_string()),
            Column::FamilyTies => self.record.family_ties_status = Some(cell.to_string()),
            Column::FinancialStatus => self.record.financial_status = Some(cell.to_string()),
            Column::CriminalHistory => {
                self.record.criminal_history = Some(value.clone());
                self.factors.criminal_history = Some(value);
            }
            Column::PriorTrafficking => {
                self.record.prior_trafficking_history = Some(value.clone());
                self.factors.prior_trafficking_history = Some(value);
            }
            Column::NetworkAffiliation => {
                self.record.network_affiliation = Some(value.clone());
                self.factors.network_affiliation = Some(value);
            }
            Column::KnownRoute => {
                self.record.known_trafficking_route = Some(value.clone());
                self.factors.known_trafficking_route = Some(value);
            }
            Column::PastSponsorships => {
                self.record.past_sponsorships = Some(value.clone());
                self.factors.past_sponsorships = Some(value);
            }
            Column::PastDenials => {
                self.record.past_denials = Some(value.clone());
                self.factors.past_denials = Some(value);
            }
            Column::DuplicateMatches => self.factors.duplicate_matches = Some(value),
            Column::Check(check) => self.apply_check(check, is_truthy(Some(&value))),
            Column::Indicator(name) => {
                self.record.indicators.insert(name.to_string(), value);
            }
        }
    }

    fn apply_check(&mut self, check: SystemCheck, flag: bool) {
        let checks = self.checks.get_or_insert_with(SystemChecks::default);
        match check {
            SystemCheck::IsDuplicate => checks.is_duplicate = flag,
            SystemCheck::HighTrafficking => checks.high_trafficking_area = flag,
            SystemCheck::SponsorRegistration => checks.sponsor_registration_passed = flag,
            SystemCheck::Fingerprint => checks.fingerprint_check_passed = flag,
            SystemCheck::Vetting => checks.vetting_passed = flag,
            SystemCheck::Ice => checks.ice_hit = flag,
            SystemCheck::Cbp => checks.cbp_hit = flag,
            SystemCheck::UacPortal => checks.uac_portal_passed = flag,
            SystemCheck::IdentityAccess => checks.identity_access_passed = flag,
            SystemCheck::Atims => checks.atims_passed = flag,
        }
    }

    fn finish(mut self, line: usize) -> BatchCase {
        self.factors.system_checks = self.checks;
        BatchCase {
            case_id: self.case_id.unwrap_or_else(|| format!("row-{line}")),
            record: self.record,
            risk_factors: self.factors,
        }
    }
}
