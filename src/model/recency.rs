//! Recency ordering over `lastSeen` values of mixed precision.
//!
//! The mirror holds both `2024-05-01 12:00:00` (SQLite default) and
//! `2024-05-01T12:00:00.123456` (written by the sync job), while live records
//! carry `2024-05-01T12:00:00Z`. Values are parsed before comparing; values
//! without an offset are read as UTC.

use super::TaggedRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value.replacen(' ', "T", 1)) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn compare_most_recent_first(a: &TaggedRecord, b: &TaggedRecord) -> Ordering {
    let a_seen = a.record.last_seen();
    let b_seen = b.record.last_seen();
    let a_time = a_seen.and_then(parse_timestamp);
    let b_time = b_seen.and_then(parse_timestamp);
    match (a_time, b_time) {
        (Some(a_time), Some(b_time)) => b_time.cmp(&a_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b_seen.cmp(&a_seen))
    .then_with(|| a.kind.cmp(&b.kind))
    .then_with(|| a.record.id().cmp(&b.record.id()))
}

/// Sorts newest first. Unparseable or missing timestamps sort last; ties are
/// broken by the raw string, then kind and id.
pub fn sort_most_recent_first(records: &mut [TaggedRecord]) {
    records.sort_by(compare_most_recent_first);
}
