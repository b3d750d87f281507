//! Plain-text rendering of the scan table for the one-shot `list` command

use crate::console::models::{ScanSummary, StatusFilter};
use crate::console::view_models::{BadgeClass, TableView};
use crate::console::views::fit;

const COLUMNS: [(&str, usize); 7] = [
    ("ID", 10),
    ("NAME", 24),
    ("TARGET", 24),
    ("STARTED", 19),
    ("FINISHED", 19),
    ("STATUS", 14),
    ("H/M/L/I", 15),
];

fn ansi(badge: BadgeClass) -> &'static str {
    match badge {
        BadgeClass::Success => "\x1b[32m",
        BadgeClass::Warning => "\x1b[33m",
        BadgeClass::Danger => "\x1b[31m",
        BadgeClass::Info => "\x1b[36m",
    }
}

/// Render `scans` through `filter` as a fixed-width table.
///
/// Status badges are coloured only when `color` is set.
pub fn format_scan_table(scans: &[ScanSummary], filter: StatusFilter, color: bool) -> String {
    let view = TableView::build(scans, filter);
    if let Some(message) = view.empty_message() {
        return format!("{message}\n");
    }

    let header: Vec<String> = COLUMNS.iter().map(|(title, width)| fit(title, *width)).collect();
    let mut out = header.join(" ").trim_end().to_string();
    out.push('\n');

    for row in view.rows() {
        let risk = format!(
            "{}/{}/{}/{}",
            row.risk.high, row.risk.medium, row.risk.low, row.risk.info
        );
        let status = fit(&row.status, COLUMNS[5].1);
        let status = if color {
            format!("{}{}\x1b[0m", ansi(row.badge), status)
        } else {
            status
        };
        let cells = [
            fit(&row.id, COLUMNS[0].1),
            fit(&row.name, COLUMNS[1].1),
            fit(&row.target, COLUMNS[2].1),
            fit(&row.started, COLUMNS[3].1),
            fit(&row.finished, COLUMNS[4].1),
            status,
            fit(&risk, COLUMNS[6].1),
        ];
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::view_models::EMPTY_STATE_MESSAGE;

    fn scans() -> Vec<ScanSummary> {
        serde_json::from_value(serde_json::json!([
            {"id": "f1", "name": "nightly", "target": "example.org", "status": "FINISHED",
             "risk_matrix": {"HIGH": 2, "MEDIUM": 1, "LOW": 0, "INFO": 7}},
            {"id": "r1", "name": "adhoc", "target": "10.0.0.1", "status": "RUNNING"}
        ]))
        .unwrap()
    }

    #[test]
    fn plain_table_should_list_filtered_rows_without_colour() {
        let out = format_scan_table(&scans(), StatusFilter::Finished, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("nightly"));
        assert!(lines[1].contains("2/1/0/7"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn coloured_table_should_wrap_status_in_ansi() {
        let out = format_scan_table(&scans(), StatusFilter::All, true);
        assert!(out.contains("\x1b[32mFINISHED"));
        assert!(out.contains("\x1b[36mRUNNING"));
    }

    #[test]
    fn empty_collection_should_print_empty_state() {
        assert_eq!(
            format_scan_table(&[], StatusFilter::All, false),
            format!("{EMPTY_STATE_MESSAGE}\n")
        );
    }
}
