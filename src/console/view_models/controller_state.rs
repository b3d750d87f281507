//! # Controller State
//!
//! All console state in one value, changed only through [`ControllerState::apply`].
//! `apply` is a pure transition: it updates the state and returns the side
//! effects the controller must perform, without touching the network or the
//! terminal itself.

use crate::console::events::{
    BulkActionKind, ControllerAction, CursorMove, Effect, ExportFormat, RequestKind, RowAction,
};
use crate::console::models::{
    Notice, ScanSummary, SelectionState, StatusFilter, StatusLine, Theme,
};
use crate::console::view_models::table::{TableRow, TableView};

/// Question currently waiting for an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Stop/delete confirmation
    Confirm {
        kind: BulkActionKind,
        ids: Vec<String>,
    },
    /// Export format choice for the given ids
    ExportFormat { ids: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    scans: Vec<ScanSummary>,
    /// Set once the first scan list arrived
    loaded: bool,
    filter: StatusFilter,
    table: TableView,
    selection: SelectionState,
    cursor: usize,
    prompt: Option<Prompt>,
    status_line: StatusLine,
    theme: Theme,
    should_quit: bool,
}

impl ControllerState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    // === Accessors ===

    pub fn scans(&self) -> &[ScanSummary] {
        &self.scans
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self) -> Option<&TableRow> {
        self.table.rows().get(self.cursor)
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    pub fn status_line_mut(&mut self) -> &mut StatusLine {
        &mut self.status_line
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // === Transition ===

    /// Apply one action and return the effects it requests
    pub fn apply(&mut self, action: ControllerAction) -> Vec<Effect> {
        tracing::debug!("apply: {:?}", action);
        match action {
            ControllerAction::Refresh => self.fetch(self.filter),
            ControllerAction::SetFilter(filter) => {
                self.filter = filter;
                self.render();
                self.fetch(filter)
            }
            ControllerAction::ToggleAll(checked) => {
                self.selection.toggle_all(checked);
                Vec::new()
            }
            ControllerAction::RowClicked { id, shift } => {
                if let Some(position) = self.table.rows().iter().position(|row| row.id == id) {
                    self.cursor = position;
                }
                self.selection.row_clicked(&id, shift);
                Vec::new()
            }
            ControllerAction::BulkOnSelection(kind) => {
                let ids = self.selection.collect_selected_ids().unwrap_or_default();
                self.apply(ControllerAction::BulkAction { kind, ids })
            }
            ControllerAction::BulkAction { kind, ids } => self.bulk_action(kind, ids),
            ControllerAction::RowAction(action) => self.row_action(action),
            ControllerAction::ExportPrompt => {
                match self.selection.collect_selected_ids() {
                    Some(ids) => {
                        let choices: Vec<String> = ExportFormat::ALL
                            .iter()
                            .map(|format| format!("[{}] {}", format.hotkey(), format))
                            .collect();
                        self.status_line.set_prompt(format!(
                            "Export {} scan(s) as: {} (Esc to cancel)",
                            ids.len(),
                            choices.join("  ")
                        ));
                        self.prompt = Some(Prompt::ExportFormat { ids });
                    }
                    None => self.nothing_selected(),
                }
                Vec::new()
            }
            ControllerAction::ExportFormatChosen(choice) => match self.prompt.take() {
                Some(Prompt::ExportFormat { ids }) => {
                    self.status_line.clear_prompt();
                    match choice {
                        Some(format) => self.export(format, ids),
                        None => {
                            self.status_line.set_notice(Notice::info("Export cancelled."));
                            Vec::new()
                        }
                    }
                }
                other => {
                    self.prompt = other;
                    Vec::new()
                }
            },
            ControllerAction::Confirm(accepted) => match self.prompt.take() {
                Some(Prompt::Confirm { kind, ids }) => {
                    self.status_line.clear_prompt();
                    if accepted {
                        vec![Effect::Dispatch { kind, ids }]
                    } else {
                        self.status_line
                            .set_notice(Notice::info(format!("{} cancelled.", kind.verb())));
                        Vec::new()
                    }
                }
                other => {
                    self.prompt = other;
                    Vec::new()
                }
            },
            ControllerAction::MoveCursor(movement) => {
                self.move_cursor(movement);
                Vec::new()
            }
            ControllerAction::ToggleTheme => {
                self.theme = self.theme.toggled();
                vec![Effect::PersistTheme(self.theme)]
            }
            ControllerAction::Notify(notice) => {
                self.status_line.set_notice(notice);
                Vec::new()
            }
            ControllerAction::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            ControllerAction::ScansLoaded { scans } => {
                self.status_line.fetch_finished();
                self.scans = scans;
                self.loaded = true;
                self.render();
                Vec::new()
            }
            ControllerAction::BulkCompleted { kind, ids, message } => {
                let text = message.unwrap_or_else(|| kind.default_success_message(ids.len()));
                self.status_line.set_notice(Notice::success(text));
                self.fetch(self.filter)
            }
            ControllerAction::ExportSaved { format, path } => {
                tracing::info!("{} export saved to {}", format, path.display());
                Vec::new()
            }
            ControllerAction::RequestFailed { request, error } => {
                if request == RequestKind::ScanList {
                    self.status_line.fetch_finished();
                }
                self.status_line.set_notice(Notice::error(error.to_string()));
                Vec::new()
            }
        }
    }

    fn fetch(&mut self, filter: StatusFilter) -> Vec<Effect> {
        self.status_line.fetch_started();
        vec![Effect::FetchScans { filter }]
    }

    /// Rebuild the table from (scans, filter); selection starts over
    fn render(&mut self) {
        self.table = TableView::build(&self.scans, self.filter);
        self.selection.reset(self.table.row_ids());
        let rows = self.table.rows().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    fn nothing_selected(&mut self) {
        self.status_line
            .set_notice(Notice::warning("No scans selected."));
    }

    fn bulk_action(&mut self, kind: BulkActionKind, ids: Vec<String>) -> Vec<Effect> {
        if ids.is_empty() {
            self.nothing_selected();
            return Vec::new();
        }

        if kind.needs_confirmation() {
            self.status_line.set_prompt(format!(
                "{} {} scan(s)? (y/n)",
                kind.verb(),
                ids.len()
            ));
            self.prompt = Some(Prompt::Confirm { kind, ids });
            return Vec::new();
        }
        vec![Effect::Dispatch { kind, ids }]
    }

    fn export(&mut self, format: ExportFormat, ids: Vec<String>) -> Vec<Effect> {
        if ids.is_empty() {
            self.nothing_selected();
            return Vec::new();
        }

        self.status_line.set_notice(Notice::info(format!(
            "Downloading {} export of {} scan(s)...",
            format,
            ids.len()
        )));
        vec![Effect::Export { format, ids }]
    }

    fn row_action(&mut self, action: RowAction) -> Vec<Effect> {
        let Some(row) = self.cursor_row() else {
            self.status_line
                .set_notice(Notice::warning("No scan under the cursor."));
            return Vec::new();
        };

        if !row.offers(action) {
            let text = format!("Cannot {} a scan that is {}.", action.label(), row.status);
            self.status_line.set_notice(Notice::warning(text));
            return Vec::new();
        }

        let id = row.id.clone();
        match action.bulk_kind() {
            Some(kind) => self.bulk_action(kind, vec![id]),
            None => vec![Effect::ShowCloneLink { id }],
        }
    }

    fn move_cursor(&mut self, movement: CursorMove) {
        let last = self.table.rows().len().saturating_sub(1);
        self.cursor = match movement {
            CursorMove::Up => self.cursor.saturating_sub(1),
            CursorMove::Down => (self.cursor + 1).min(last),
            CursorMove::Top => 0,
            CursorMove::Bottom => last,
        };
    }
}
