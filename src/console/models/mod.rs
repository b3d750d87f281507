//! # Models
//!
//! Plain data owned by the console: server snapshots, filter, selection,
//! status line and theme preference.

pub mod filter;
pub mod scan_summary;
pub mod selection;
pub mod status_line;
pub mod theme;

pub use filter::StatusFilter;
pub use scan_summary::{display_timestamp, RiskMatrix, ScanSummary, ACTIVE_STATUSES};
pub use selection::SelectionState;
pub use status_line::{Notice, NoticeLevel, StatusLine};
pub use theme::{Theme, ThemeStore};
