//! # Scan Table View
//!
//! Pure render model of the scan list. A `TableView` is computed from the
//! scan collection and the active filter and nothing else.

use crate::console::events::RowAction;
use crate::console::models::{display_timestamp, RiskMatrix, ScanSummary, StatusFilter};

/// Shown instead of a table when the server has no scans at all
pub const EMPTY_STATE_MESSAGE: &str =
    "No scan history. Start a scan on the server and refresh to see it here.";

/// Colour class of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeClass {
    Success,
    Warning,
    Danger,
    Info,
}

impl BadgeClass {
    /// `FINISHED` is success, anything mentioning `ABORT` a warning, anything
    /// mentioning `FAILED` danger, the rest informational.
    pub fn for_status(status: &str) -> Self {
        if status == "FINISHED" {
            BadgeClass::Success
        } else if status.contains("ABORT") {
            BadgeClass::Warning
        } else if status.contains("FAILED") {
            BadgeClass::Danger
        } else {
            BadgeClass::Info
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            BadgeClass::Success => "success",
            BadgeClass::Warning => "warning",
            BadgeClass::Danger => "danger",
            BadgeClass::Info => "info",
        }
    }
}

/// Actions offered for a scan in the given status.
///
/// Active scans can only be stopped; everything else can be deleted or
/// re-run. Clone is always available.
pub fn row_actions(scan: &ScanSummary) -> Vec<RowAction> {
    if scan.is_active() {
        vec![RowAction::Stop, RowAction::Clone]
    } else {
        vec![RowAction::Delete, RowAction::Rerun, RowAction::Clone]
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub name: String,
    pub target: String,
    pub created: String,
    pub started: String,
    pub finished: String,
    pub status: String,
    pub badge: BadgeClass,
    pub progress: u32,
    pub risk: RiskMatrix,
    pub actions: Vec<RowAction>,
}

impl TableRow {
    fn from_scan(scan: &ScanSummary) -> Self {
        Self {
            id: scan.id.clone(),
            name: scan.name.clone(),
            target: scan.target.clone(),
            created: display_timestamp(scan.created.as_ref()),
            started: display_timestamp(scan.started.as_ref()),
            finished: display_timestamp(scan.finished.as_ref()),
            status: scan.status.clone(),
            badge: BadgeClass::for_status(&scan.status),
            progress: scan.progress,
            risk: scan.risk_matrix,
            actions: row_actions(scan),
        }
    }

    pub fn offers(&self, action: RowAction) -> bool {
        self.actions.contains(&action)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// The server reported no scans
    Empty { message: String },
    /// Rows passing the filter, in server order; may be empty
    Table { rows: Vec<TableRow> },
}

impl Default for TableView {
    fn default() -> Self {
        TableView::Table { rows: Vec::new() }
    }
}

impl TableView {
    pub fn build(scans: &[ScanSummary], filter: StatusFilter) -> Self {
        if scans.is_empty() {
            return TableView::Empty {
                message: EMPTY_STATE_MESSAGE.to_string(),
            };
        }
        TableView::Table {
            rows: filter
                .apply(scans)
                .into_iter()
                .map(TableRow::from_scan)
                .collect(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        match self {
            TableView::Empty { .. } => &[],
            TableView::Table { rows } => rows.as_slice(),
        }
    }

    pub fn row_ids(&self) -> Vec<String> {
        self.rows().iter().map(|row| row.id.clone()).collect()
    }

    pub fn empty_message(&self) -> Option<&str> {
        match self {
            TableView::Empty { message } => Some(message.as_str()),
            TableView::Table { .. } => None,
        }
    }
}
