//! # Status Filter
//!
//! Selects which scans are visible in the table. The filter lives for the whole
//! session and changes only when the operator picks another one.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::scan_summary::{ScanSummary, ACTIVE_STATUSES, FINISHED_STATUS};

const FAILED_STATUSES: [&str; 2] = ["ABORTED", "FAILED"];

/// The four fixed scan-list filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Running,
    Finished,
    Failed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Running,
        StatusFilter::Finished,
        StatusFilter::Failed,
    ];

    /// Statuses accepted by this filter, `None` meaning no restriction
    pub fn status_set(&self) -> Option<&'static [&'static str]> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Running => Some(&ACTIVE_STATUSES),
            StatusFilter::Finished => Some(&[FINISHED_STATUS]),
            StatusFilter::Failed => Some(&FAILED_STATUSES),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Running => "Running",
            StatusFilter::Finished => "Finished",
            StatusFilter::Failed => "Failed",
        }
    }

    /// Membership test for a raw server status.
    ///
    /// The failed filter also accepts statuses that merely contain one of its
    /// members, e.g. `USER_ABORTED` or `ERROR-FAILED`.
    pub fn matches(&self, status: &str) -> bool {
        let Some(set) = self.status_set() else {
            return true;
        };
        if set.contains(&status) {
            return true;
        }
        match self {
            StatusFilter::Failed => set.iter().any(|member| status.contains(member)),
            _ => false,
        }
    }

    /// Scans passing the filter, in the order given
    pub fn apply<'a>(&self, scans: &'a [ScanSummary]) -> Vec<&'a ScanSummary> {
        scans.iter().filter(|scan| self.matches(&scan.status)).collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
