//! Conversions between engine types and SQLite column values.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use srs_engine::{CapOverride, Difficulty};

pub fn encode_dt(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_micros()
}

pub fn decode_dt(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {micros}")))
}

pub fn decode_difficulty(s: &str) -> Result<Difficulty> {
    Difficulty::from_str(s).ok_or_else(|| StoreError::InvalidData(format!("unknown difficulty: {s:?}")))
}

pub fn encode_tags(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(s)?)
}

/// Split a cap override into its `(maximum_interval_days, interval_uncapped)` columns.
pub fn encode_cap(cap: CapOverride) -> (Option<u32>, bool) {
    match cap {
        CapOverride::Inherit => (None, false),
        CapOverride::Uncapped => (None, true),
        CapOverride::Days(days) => (Some(days), false),
    }
}

pub fn decode_cap(days: Option<u32>, uncapped: bool) -> CapOverride {
    match (days, uncapped) {
        (_, true) => CapOverride::Uncapped,
        (Some(days), false) => CapOverride::Days(days),
        (None, false) => CapOverride::Inherit,
    }
}
