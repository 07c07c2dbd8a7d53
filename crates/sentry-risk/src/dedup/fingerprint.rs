use chrono::{DateTime, Timelike, Utc};
use sha2::{Digest, Sha256};

/// Derive a sponsor identifier from fingerprint bytes salted with a timestamp.
///
/// The salt is the UTC timestamp rendered as `YYYY-MM-DD HH:MM:SS[.ffffff]`;
/// the fractional part is omitted when the timestamp has no microseconds.
pub fn generate_sponsor_id(fingerprint: &[u8], salted_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint);
    hasher.update(timestamp_salt(salted_at).as_bytes());
    hex::encode(hasher.finalize())
}

pub fn generate_sponsor_id_now(fingerprint: &[u8]) -> String {
    generate_sponsor_id(fingerprint, Utc::now())
}

fn timestamp_salt(at: DateTime<Utc>) -> String {
    let micros = at.nanosecond() % 1_000_000_000 / 1_000;
    let whole = at.format("%Y-%m-%d %H:%M:%S");
    if micros == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{micros:06}")
    }
}
