//! Sponsor duplicate detection and identifier derivation.

mod fingerprint;
mod similarity;

use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub use fingerprint::{generate_sponsor_id, generate_sponsor_id_now};
pub use similarity::{ratio, token_sort_ratio};

/// Similarity a candidate must strictly exceed to count as a fuzzy duplicate.
pub const DEFAULT_DUPLICATE_THRESHOLD: u8 = 85;

/// Known sponsor identifier that resembles the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzyMatch {
    pub id: String,
    pub score: u8,
}

/// Every known id scoring strictly above `threshold` against `candidate`,
/// in roster order.
pub fn find_fuzzy_duplicates<S: AsRef<str>>(
    candidate: &str,
    known_ids: &[S],
    threshold: u8,
) -> Vec<FuzzyMatch> {
    known_ids
        .iter()
        .filter_map(|known| {
            let score = token_sort_ratio(known.as_ref(), candidate);
            (score > threshold).then(|| FuzzyMatch {
                id: known.as_ref().to_string(),
                score,
            })
        })
        .collect()
}

/// Identity row from the sponsor registry export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRosterEntry {
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ssn: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sponsor_id_hash: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fingerprint_hash: Option<String>,
}

impl SponsorRosterEntry {
    fn strong_identifiers(&self) -> [Option<&str>; 3] {
        [
            self.ssn.as_deref(),
            self.sponsor_id_hash.as_deref(),
            self.fingerprint_hash.as_deref(),
        ]
    }

    fn identity_fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("first_name", self.first_name.as_deref()),
            ("last_name", self.last_name.as_deref()),
            ("dob", self.dob.as_deref()),
            ("email", self.email.as_deref()),
            ("phone", self.phone.as_deref()),
            ("ssn", self.ssn.as_deref()),
            ("sponsor_id_hash", self.sponsor_id_hash.as_deref()),
            ("fingerprint_hash", self.fingerprint_hash.as_deref()),
        ]
    }
}

/// Roster entry sharing at least one identity field with the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub id: String,
    pub matched_fields: Vec<&'static str>,
}

/// Entries other than `target` (by id) sharing any identity field with it.
///
/// Blank values never match.
pub fn find_field_duplicates(
    target: &SponsorRosterEntry,
    roster: &[SponsorRosterEntry],
) -> Vec<FieldMatch> {
    let wanted = target.identity_fields();

    roster
        .iter()
        .filter(|entry| entry.id != target.id)
        .filter_map(|entry| {
            let matched_fields: Vec<&'static str> = wanted
                .iter()
                .zip(entry.identity_fields())
                .filter_map(|((field, left), (_, right))| match (left, right) {
                    (Some(left), Some(right)) if left.trim() == right.trim() => Some(*field),
                    _ => None,
                })
                .collect();

            (!matched_fields.is_empty()).then(|| FieldMatch {
                id: entry.id.clone(),
                matched_fields,
            })
        })
        .collect()
}

/// Registry rows belonging to the same person as a sponsor, counting the
/// sponsor's own row. The blend adds its bonus once this exceeds one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateEvidence {
    pub matches: u32,
}

impl DuplicateEvidence {
    pub fn from_matches(matches: usize) -> Self {
        Self {
            matches: u32::try_from(matches).unwrap_or(u32::MAX),
        }
    }

    /// Count the sponsor's row plus every other entry sharing a strong
    /// identifier (fingerprint hash, sponsor id hash, SSN) or a sponsor id
    /// scoring above `threshold`.
    ///
    /// Shared names, birth dates and contact details are reported by
    /// [`find_field_duplicates`] but never counted here.
    pub fn for_entry(
        target: &SponsorRosterEntry,
        roster: &[SponsorRosterEntry],
        threshold: u8,
    ) -> Self {
        let others: Vec<&SponsorRosterEntry> = roster
            .iter()
            .filter(|entry| entry.id != target.id)
            .collect();
        let other_ids: Vec<&str> = others.iter().map(|entry| entry.id.as_str()).collect();

        let mut ids: Vec<&str> = others
            .iter()
            .filter(|entry| shares_strong_identifier(target, entry))
            .map(|entry| entry.id.as_str())
            .collect();
        let fuzzy = find_fuzzy_duplicates(&target.id, &other_ids, threshold);
        ids.extend(fuzzy.iter().map(|found| found.id.as_str()));
        ids.sort_unstable();
        ids.dedup();

        let matches = ids.len() + 1;
        debug!(sponsor = %target.id, matches, "duplicate scan complete");
        Self::from_matches(matches)
    }
}

fn shares_strong_identifier(left: &SponsorRosterEntry, right: &SponsorRosterEntry) -> bool {
    left.strong_identifiers()
        .into_iter()
        .zip(right.strong_identifiers())
        .any(|pair| matches!(pair, (Some(ours), Some(theirs)) if ours.trim() == theirs.trim()))
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<SponsorRosterEntry>, csv::Error> {
    let file = std::fs::File::open(path)?;
    parse_roster(file)
}

pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<SponsorRosterEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<SponsorRosterEntry>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn entry(id: &str, email: Option<&str>, ssn: Option<&str>) -> SponsorRosterEntry {
        SponsorRosterEntry {
            id: id.to_string(),
            email: email.map(str::to_string),
            ssn: ssn.map(str::to_string),
            ..SponsorRosterEntry::default()
        }
    }

    #[test]
    fn fuzzy_matches_require_strictly_more_than_threshold() {
        let known = ["SP-1001", "SP-10012", "ZZ-9"];

        let found = find_fuzzy_duplicates("SP 1001", &known, DEFAULT_DUPLICATE_THRESHOLD);

        assert_eq!(
            found,
            vec![
                FuzzyMatch {
                    id: "SP-1001".to_string(),
                    score: 100
                },
                FuzzyMatch {
                    id: "SP-10012".to_string(),
                    score: 93
                },
            ]
        );
        assert!(find_fuzzy_duplicates("SP 1001", &known, 100).is_empty());
    }

    #[test]
    fn field_duplicates_exclude_the_target_itself() {
        let target = entry("1", Some("a@example.org"), None);
        let roster = vec![
            target.clone(),
            entry("2", Some("a@example.org"), None),
            entry("3", Some("b@example.org"), None),
        ];

        let found = find_field_duplicates(&target, &roster);

        assert_eq!(
            found,
            vec![FieldMatch {
                id: "2".to_string(),
                matched_fields: vec!["email"],
            }]
        );
    }

    #[test]
    fn blank_fields_never_match() {
        let target = entry("1", None, None);
        let roster = vec![entry("2", None, None)];

        assert!(find_field_duplicates(&target, &roster).is_empty());
    }

    #[test]
    fn evidence_counts_each_roster_entry_once() {
        let target = entry("SP-1001", Some("a@example.org"), Some("123-45-6789"));
        let roster = vec![
            target.clone(),
            entry("SP-10012", Some("a@example.org"), Some("123-45-6789")),
            entry("QX-77", None, Some("123-45-6789")),
            entry("QX-78", None, None),
        ];

        let evidence = DuplicateEvidence::for_entry(&target, &roster, DEFAULT_DUPLICATE_THRESHOLD);

        // own row, SP-10012 (ssn and fuzzy id), QX-77 (ssn)
        assert_eq!(evidence, DuplicateEvidence { matches: 3 });
    }

    #[test]
    fn lone_sponsor_counts_only_its_own_row() {
        let target = entry("SP-1001", None, None);
        let roster = vec![target.clone(), entry("QX-78", None, None)];

        let evidence = DuplicateEvidence::for_entry(&target, &roster, DEFAULT_DUPLICATE_THRESHOLD);

        assert_eq!(evidence, DuplicateEvidence { matches: 1 });
    }

    #[test]
    fn contact_details_alone_are_not_counted() {
        let target = entry("SP-1001", Some("a@example.org"), None);
        let roster = vec![target.clone(), entry("QX-77", Some("a@example.org"), None)];

        assert_eq!(find_field_duplicates(&target, &roster).len(), 1);
        let evidence = DuplicateEvidence::for_entry(&target, &roster, DEFAULT_DUPLICATE_THRESHOLD);
        assert_eq!(evidence, DuplicateEvidence { matches: 1 });
    }

    #[test]
    fn roster_csv_treats_blank_cells_as_missing() {
        let csv = "ID,first_name,last_name,email,ssn\n7,Ana, ,ana@example.org,\n";

        let roster = parse_roster(Cursor::new(csv)).expect("parse roster");

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, "7");
        assert_eq!(roster[0].first_name.as_deref(), Some("Ana"));
        assert_eq!(roster[0].last_name, None);
        assert_eq!(roster[0].ssn, None);
        assert_eq!(roster[0].dob, None);
    }
}
