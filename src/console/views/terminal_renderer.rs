//! # Terminal Renderer
//!
//! Draws the scan table and status line onto a [`RenderStream`]. Rendering is
//! always a full redraw from [`ControllerState`]; the table itself is already
//! a pure function of the scans and the filter.
//!
//! ```text
//! row 0      title, filter tabs, theme
//! row 1      column headings
//! row 2..    table rows (scrolled to keep the cursor visible)
//! last row   loading indicator, notice or prompt, server
//! ```

use anyhow::Result;
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::console::io::{RenderStream, TerminalSize};
use crate::console::models::{NoticeLevel, StatusFilter, Theme};
use crate::console::view_models::{BadgeClass, ControllerState, TableRow};

const CHECKBOX_WIDTH: usize = 4;
const TIME_WIDTH: usize = 19;
const STATUS_WIDTH: usize = 14;
const PROGRESS_WIDTH: usize = 5;
const RISK_WIDTH: usize = 15;
const ACTIONS_WIDTH: usize = 19;
const GAP: &str = " ";

/// Rows taken by title, headings and status line
const CHROME_ROWS: u16 = 3;

/// Truncate or pad `text` to exactly `width` columns
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{text}{}", " ".repeat(padding));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Colours used for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                text: Color::Black,
                dim: Color::DarkGrey,
                accent: Color::DarkBlue,
                success: Color::DarkGreen,
                warning: Color::DarkYellow,
                danger: Color::DarkRed,
                info: Color::DarkCyan,
            },
            Theme::Dark => Palette {
                text: Color::White,
                dim: Color::Grey,
                accent: Color::Blue,
                success: Color::Green,
                warning: Color::Yellow,
                danger: Color::Red,
                info: Color::Cyan,
            },
        }
    }

    pub fn badge(&self, badge: BadgeClass) -> Color {
        match badge {
            BadgeClass::Success => self.success,
            BadgeClass::Warning => self.warning,
            BadgeClass::Danger => self.danger,
            BadgeClass::Info => self.info,
        }
    }

    fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Success => self.success,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.danger,
        }
    }
}

pub trait ViewRenderer {
    /// Take over the terminal
    fn initialize(&mut self) -> Result<()>;

    fn render_full(&mut self, state: &ControllerState) -> Result<()>;

    /// Give the terminal back
    fn cleanup(&mut self) -> Result<()>;
}

/// Column widths for the current terminal width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    target: usize,
}

impl Columns {
    fn for_width(width: u16) -> Self {
        let fixed = CHECKBOX_WIDTH
            + 2 * TIME_WIDTH
            + STATUS_WIDTH
            + PROGRESS_WIDTH
            + RISK_WIDTH
            + ACTIONS_WIDTH
            + 8 * GAP.len();
        let flexible = (width as usize).saturating_sub(fixed).max(16);
        let name = flexible / 2;
        Columns {
            name,
            target: flexible - name,
        }
    }
}

pub struct TerminalRenderer<RS: RenderStream> {
    render_stream: RS,
    terminal_size: TerminalSize,
    /// First table row shown
    scroll_offset: usize,
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(render_stream: RS) -> Result<Self> {
        let terminal_size = render_stream.get_size()?;
        Ok(Self {
            render_stream,
            terminal_size,
            scroll_offset: 0,
        })
    }

    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    pub fn terminal_size(&self) -> TerminalSize {
        self.terminal_size
    }

    fn visible_rows(&self) -> usize {
        self.terminal_size.1.saturating_sub(CHROME_ROWS) as usize
    }

    fn scroll_to(&mut self, cursor: usize) {
        let visible = self.visible_rows().max(1);
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + visible {
            self.scroll_offset = cursor + 1 - visible;
        }
    }

    fn render_title(&mut self, state: &ControllerState, palette: &Palette) -> Result<()> {
        self.render_stream.move_cursor(0, 0)?;
        queue!(
            self.render_stream,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(palette.accent),
            Print("Scans"),
            SetAttribute(Attribute::Reset),
        )?;
        for (index, filter) in StatusFilter::ALL.iter().enumerate() {
            let label = format!("  [{}] {}", index + 1, filter.label());
            if *filter == state.filter() {
                queue!(
                    self.render_stream,
                    SetForegroundColor(palette.accent),
                    SetAttribute(Attribute::Underlined),
                    Print(label),
                    SetAttribute(Attribute::Reset),
                )?;
            } else {
                queue!(self.render_stream, SetForegroundColor(palette.dim), Print(label))?;
            }
        }

        let theme = state.theme().as_str();
        let column = (self.terminal_size.0 as usize).saturating_sub(theme.width());
        self.render_stream.move_cursor(column as u16, 0)?;
        queue!(
            self.render_stream,
            SetForegroundColor(palette.dim),
            Print(theme),
            ResetColor
        )?;
        Ok(())
    }

    fn render_headings(&mut self, columns: Columns, all_checked: bool, palette: &Palette) -> Result<()> {
        let checkbox = if all_checked { "[x]" } else { "[ ]" };
        let headings = [
            fit(checkbox, CHECKBOX_WIDTH),
            fit("Name", columns.name),
            fit("Target", columns.target),
            fit("Started", TIME_WIDTH),
            fit("Finished", TIME_WIDTH),
            fit("Status", STATUS_WIDTH),
            fit("Prog", PROGRESS_WIDTH),
            fit("H/M/L/I", RISK_WIDTH),
            fit("Actions", ACTIONS_WIDTH),
        ];
        self.render_stream.move_cursor(0, 1)?;
        queue!(
            self.render_stream,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(palette.text),
            Print(headings.join(GAP)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }

    fn render_row(
        &mut self,
        screen_row: u16,
        row: &TableRow,
        checked: bool,
        under_cursor: bool,
        columns: Columns,
        palette: &Palette,
    ) -> Result<()> {
        let checkbox = if checked { "[x]" } else { "[ ]" };
        let risk = format!(
            "{}/{}/{}/{}",
            row.risk.high, row.risk.medium, row.risk.low, row.risk.info
        );
        let actions: Vec<&str> = row.actions.iter().map(|action| action.label()).collect();
        let leading = [
            fit(checkbox, CHECKBOX_WIDTH),
            fit(&row.name, columns.name),
            fit(&row.target, columns.target),
            fit(&row.started, TIME_WIDTH),
            fit(&row.finished, TIME_WIDTH),
        ]
        .join(GAP);
        let trailing = [
            fit(&format!("{}%", row.progress), PROGRESS_WIDTH),
            fit(&risk, RISK_WIDTH),
            fit(&actions.join(" "), ACTIONS_WIDTH),
        ]
        .join(GAP);

        self.render_stream.move_cursor(0, screen_row)?;
        if under_cursor {
            queue!(self.render_stream, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            self.render_stream,
            SetForegroundColor(palette.text),
            Print(leading),
            Print(GAP),
            SetForegroundColor(palette.badge(row.badge)),
            Print(fit(&row.status, STATUS_WIDTH)),
            SetForegroundColor(palette.text),
            Print(GAP),
            Print(trailing),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }

    fn render_table(&mut self, state: &ControllerState, palette: &Palette) -> Result<()> {
        let columns = Columns::for_width(self.terminal_size.0);
        self.render_headings(columns, state.selection().all_checked(), palette)?;

        if !state.is_loaded() {
            self.render_stream.move_cursor(0, 2)?;
            queue!(self.render_stream, SetForegroundColor(palette.dim), Print("Loading scans..."), ResetColor)?;
            return Ok(());
        }
        if let Some(message) = state.table().empty_message() {
            self.render_stream.move_cursor(0, 2)?;
            queue!(self.render_stream, SetForegroundColor(palette.dim), Print(message), ResetColor)?;
            return Ok(());
        }

        self.scroll_to(state.cursor());
        let rows = state.table().rows();
        let visible = self.visible_rows();
        for (offset, row) in rows.iter().enumerate().skip(self.scroll_offset).take(visible) {
            let screen_row = (offset - self.scroll_offset) as u16 + 2;
            let checked = state.selection().is_checked(&row.id);
            self.render_row(
                screen_row,
                row,
                checked,
                offset == state.cursor(),
                columns,
                palette,
            )?;
        }
        Ok(())
    }

    fn render_status_line(&mut self, state: &ControllerState, palette: &Palette) -> Result<()> {
        let status_row = self.terminal_size.1.saturating_sub(1);
        let width = self.terminal_size.0 as usize;
        let status = state.status_line();

        let mut left = String::new();
        if status.is_loading() {
            left.push_str("● Loading... ");
        }
        let (message, color) = match (status.prompt(), status.notice()) {
            (Some(prompt), _) => (prompt.to_string(), palette.accent),
            (None, Some(notice)) => (notice.text.clone(), palette.notice(notice.level)),
            (None, None) => (String::new(), palette.dim),
        };
        let selected = state.selection().checked_count();
        let right = format!("{selected} selected | {}", status.server());

        let room = width.saturating_sub(right.width() + 1);
        let message = fit(&message, room.saturating_sub(left.width()));

        self.render_stream.move_cursor(0, status_row)?;
        queue!(
            self.render_stream,
            SetForegroundColor(palette.warning),
            Print(&left),
            SetForegroundColor(color),
            Print(message),
            SetForegroundColor(palette.dim),
            Print(GAP),
            Print(right),
            ResetColor
        )?;
        Ok(())
    }
}

impl<RS: RenderStream> ViewRenderer for TerminalRenderer<RS> {
    fn initialize(&mut self) -> Result<()> {
        self.render_stream.begin_console()
    }

    fn render_full(&mut self, state: &ControllerState) -> Result<()> {
        let palette = Palette::for_theme(state.theme());
        self.render_stream.clear_screen()?;
        self.render_title(state, &palette)?;
        self.render_table(state, &palette)?;
        self.render_status_line(state, &palette)?;
        self.render_stream.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.render_stream.end_console()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::events::ControllerAction;
    use crate::console::io::{MockRenderStream, RenderCommand};
    use crate::console::models::ScanSummary;
    use crate::console::view_models::EMPTY_STATE_MESSAGE;

    fn scan(id: &str, name: &str, status: &str) -> ScanSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "target": "example.com",
            "status": status,
            "started": "2026-10-01 12:00:00"
        }))
        .unwrap()
    }

    fn loaded(scans: Vec<ScanSummary>) -> ControllerState {
        let mut state = ControllerState::new(Theme::Light);
        state.apply(ControllerAction::ScansLoaded { scans });
        state
    }

    #[test]
    fn fit_should_pad_and_truncate_by_display_width() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("日本語", 5), "日本…");
        assert_eq!(fit("日本語", 5).width(), 5);
        assert_eq!(fit("x", 0), "");
    }

    #[test]
    fn render_should_show_rows_and_status() {
        let stream = MockRenderStream::with_size((160, 20));
        let handle = stream.handle();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();
        let state = loaded(vec![
            scan("a", "weekly-sweep", "FINISHED"),
            scan("b", "adhoc", "RUNNING"),
        ]);

        renderer.render_full(&state).unwrap();

        let output = handle.output();
        assert!(output.contains("weekly-sweep"));
        assert!(output.contains("adhoc"));
        assert!(output.contains("FINISHED"));
        assert!(output.contains("2026-10-01 12:00:00"));
        assert!(output.contains("Not yet"));
        assert!(output.contains("delete rerun clone"));
        assert!(output.contains("[1] All"));
        assert!(output.contains("Light Mode"));
        assert!(handle.has_command(&RenderCommand::ClearScreen));
    }

    #[test]
    fn render_should_show_empty_state_message() {
        let stream = MockRenderStream::with_size((160, 20));
        let handle = stream.handle();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();

        renderer.render_full(&loaded(Vec::new())).unwrap();

        assert!(handle.output().contains(EMPTY_STATE_MESSAGE));
    }

    #[test]
    fn render_should_show_loading_before_first_response() {
        let stream = MockRenderStream::with_size((160, 20));
        let handle = stream.handle();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();
        let mut state = ControllerState::new(Theme::Dark);
        state.apply(ControllerAction::Refresh);

        renderer.render_full(&state).unwrap();

        let output = handle.output();
        assert!(output.contains("Loading scans..."));
        assert!(output.contains("● Loading..."));
        assert!(output.contains("Dark Mode"));
    }

    #[test]
    fn scrolling_should_keep_cursor_visible() {
        let stream = MockRenderStream::with_size((160, 6));
        let handle = stream.handle();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();
        let scans = (0..10)
            .map(|i| scan(&i.to_string(), &format!("scan-{i:02}"), "FINISHED"))
            .collect();
        let mut state = loaded(scans);
        state.apply(ControllerAction::MoveCursor(
            crate::console::events::CursorMove::Bottom,
        ));

        renderer.render_full(&state).unwrap();

        let output = handle.output();
        assert!(output.contains("scan-09"));
        assert!(!output.contains("scan-00"));
    }

    #[test]
    fn initialize_and_cleanup_should_bracket_the_console_session() {
        let stream = MockRenderStream::new();
        let handle = stream.handle();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();

        renderer.initialize().unwrap();
        renderer.cleanup().unwrap();

        let commands = handle.commands();
        assert_eq!(
            commands,
            vec![RenderCommand::BeginConsole, RenderCommand::EndConsole]
        );
    }
}
