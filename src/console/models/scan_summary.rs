//! # Scan Summary Model
//!
//! Server-reported snapshot of one scan. Values are deserialized verbatim from
//! `api/scanlist` and are never built or mutated by the console itself.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Statuses during which a scan can still be stopped.
pub const ACTIVE_STATUSES: [&str; 4] = ["RUNNING", "STARTING", "STARTED", "INITIALIZING"];

/// Status reported once a scan completed normally.
pub const FINISHED_STATUS: &str = "FINISHED";

/// Counts of correlation findings by severity bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMatrix {
    #[serde(rename = "HIGH", default)]
    pub high: u64,
    #[serde(rename = "MEDIUM", default)]
    pub medium: u64,
    #[serde(rename = "LOW", default)]
    pub low: u64,
    #[serde(rename = "INFO", default)]
    pub info: u64,
}

impl RiskMatrix {
    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low + self.info
    }
}

/// One row of the scan list as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target: String,
    #[serde(with = "timestamp::optional", default)]
    pub created: Option<NaiveDateTime>,
    #[serde(with = "timestamp::optional", default)]
    pub started: Option<NaiveDateTime>,
    #[serde(with = "timestamp::optional", default)]
    pub finished: Option<NaiveDateTime>,
    pub status: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub risk_matrix: RiskMatrix,
}

impl ScanSummary {
    /// Whether the scan is still in one of the stoppable states
    pub fn is_active(&self) -> bool {
        ACTIVE_STATUSES.contains(&self.status.as_str())
    }
}

/// Timestamp wire format shared with the server.
///
/// The server sends `"%Y-%m-%d %H:%M:%S"` strings and uses `"Not yet"` for
/// phases that have not happened. Epoch seconds are accepted too, with `0`
/// meaning "not yet".
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    pub const NOT_YET: &str = "Not yet";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Epoch(i64),
        Float(f64),
    }

    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(NOT_YET) {
            return None;
        }
        NaiveDateTime::parse_from_str(text, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }

    fn from_epoch(secs: i64) -> Option<NaiveDateTime> {
        if secs <= 0 {
            return None;
        }
        DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    }

    pub mod optional {
        use super::*;

        pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<Raw>::deserialize(deserializer)?;
            Ok(match raw {
                None => None,
                Some(Raw::Text(text)) => parse(&text),
                Some(Raw::Epoch(secs)) => from_epoch(secs),
                Some(Raw::Float(secs)) => from_epoch(secs as i64),
            })
        }
    }
}

/// Render an optional timestamp the way the server does
pub fn display_timestamp(value: Option<&NaiveDateTime>) -> String {
    match value {
        Some(ts) => ts.format(timestamp::FORMAT).to_string(),
        None => timestamp::NOT_YET.to_string(),
    }
}
