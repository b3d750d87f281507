//! # Controller Events
//!
//! `ControllerAction` is everything that can happen to the console: operator
//! input mapped from keys, and completions reported by network tasks.
//! `Effect` is everything the console asks the outside world to do. The
//! state transition consumes actions and produces effects; the controller
//! performs the effects.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::console::models::{Notice, ScanSummary, StatusFilter, Theme};
use crate::console::services::ApiError;

/// File formats offered by the export endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ExportFormat {
    Gexf,
    Csv,
    Excel,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Gexf,
        ExportFormat::Csv,
        ExportFormat::Excel,
        ExportFormat::Json,
    ];

    /// Endpoint path relative to the server root
    pub fn endpoint(&self) -> &'static str {
        match self {
            ExportFormat::Gexf => "scanvizmulti",
            ExportFormat::Csv | ExportFormat::Excel => "scaneventresultexportmulti",
            ExportFormat::Json => "scanexportjsonmulti",
        }
    }

    /// Extra query parameters besides `ids`
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ExportFormat::Excel => &[("filetype", "excel")],
            _ => &[],
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Gexf => "gexf",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    /// Key that picks this format at the export prompt
    pub fn hotkey(&self) -> char {
        match self {
            ExportFormat::Gexf => 'g',
            ExportFormat::Csv => 'c',
            ExportFormat::Excel => 'x',
            ExportFormat::Json => 'j',
        }
    }

    pub fn from_hotkey(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.hotkey() == ch)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Gexf => "gexf",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Json => "json",
        })
    }
}

/// State-changing operations applied to a set of scan ids in one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkActionKind {
    Stop,
    Delete,
    Rerun,
}

impl BulkActionKind {
    /// Stop and delete ask before doing anything
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, BulkActionKind::Stop | BulkActionKind::Delete)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            BulkActionKind::Stop => "Stop",
            BulkActionKind::Delete => "Delete",
            BulkActionKind::Rerun => "Re-run",
        }
    }

    /// Notice shown when the server accepted the request without a message
    pub fn default_success_message(&self, count: usize) -> String {
        match self {
            BulkActionKind::Stop => format!("Requested stop of {count} scan(s)."),
            BulkActionKind::Delete => format!("Deleted {count} scan(s)."),
            BulkActionKind::Rerun => format!("Re-ran {count} scan(s)."),
        }
    }
}

/// Single-scan actions offered in the action column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Stop,
    Delete,
    Rerun,
    Clone,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Stop => "stop",
            RowAction::Delete => "delete",
            RowAction::Rerun => "rerun",
            RowAction::Clone => "clone",
        }
    }

    /// The bulk operation this row action maps onto, if any
    pub fn bulk_kind(&self) -> Option<BulkActionKind> {
        match self {
            RowAction::Stop => Some(BulkActionKind::Stop),
            RowAction::Delete => Some(BulkActionKind::Delete),
            RowAction::Rerun => Some(BulkActionKind::Rerun),
            RowAction::Clone => None,
        }
    }
}

/// Which request a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    ScanList,
    Bulk(BulkActionKind),
    Export(ExportFormat),
}

/// Cursor movement within the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Top,
    Bottom,
}

/// Everything the state transition consumes
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerAction {
    /// Re-fetch with the active filter
    Refresh,
    /// Switch filter and re-fetch
    SetFilter(StatusFilter),
    ToggleAll(bool),
    RowClicked { id: String, shift: bool },
    /// Apply an operation to explicit ids; empty ids mean nothing was selected
    BulkAction { kind: BulkActionKind, ids: Vec<String> },
    /// Apply an operation to the currently checked rows
    BulkOnSelection(BulkActionKind),
    /// Single-scan action on the row under the cursor
    RowAction(RowAction),
    /// Ask which format to export the checked rows in
    ExportPrompt,
    /// Answer to the export prompt; `None` cancels
    ExportFormatChosen(Option<ExportFormat>),
    /// Answer to a stop/delete confirmation
    Confirm(bool),
    MoveCursor(CursorMove),
    ToggleTheme,
    Notify(Notice),
    Quit,

    // === Completions reported by network tasks ===
    /// Rows from the most recent scan-list response; the active filter is
    /// applied at render time
    ScansLoaded { scans: Vec<ScanSummary> },
    BulkCompleted {
        kind: BulkActionKind,
        ids: Vec<String>,
        message: Option<String>,
    },
    ExportSaved {
        format: ExportFormat,
        path: PathBuf,
    },
    RequestFailed {
        request: RequestKind,
        error: ApiError,
    },
}

/// Side effects requested by the state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchScans { filter: StatusFilter },
    Dispatch { kind: BulkActionKind, ids: Vec<String> },
    Export { format: ExportFormat, ids: Vec<String> },
    ShowCloneLink { id: String },
    PersistTheme(Theme),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_formats_should_map_to_endpoints() {
        assert_eq!(ExportFormat::Gexf.endpoint(), "scanvizmulti");
        assert_eq!(ExportFormat::Csv.endpoint(), "scaneventresultexportmulti");
        assert_eq!(ExportFormat::Excel.endpoint(), "scaneventresultexportmulti");
        assert_eq!(ExportFormat::Excel.extra_params(), &[("filetype", "excel")]);
        assert!(ExportFormat::Csv.extra_params().is_empty());
        assert_eq!(ExportFormat::Json.endpoint(), "scanexportjsonmulti");
    }

    #[test]
    fn export_hotkeys_should_be_unique() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::from_hotkey(format.hotkey()), Some(format));
        }
        assert_eq!(ExportFormat::from_hotkey('z'), None);
    }

    #[test]
    fn only_stop_and_delete_need_confirmation() {
        assert!(BulkActionKind::Stop.needs_confirmation());
        assert!(BulkActionKind::Delete.needs_confirmation());
        assert!(!BulkActionKind::Rerun.needs_confirmation());
    }
}
