//! Scan operation keys.
//!
//! Lower-case letters act on the checked rows, upper-case letters on the row
//! under the cursor.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{Command, CommandContext};
use crate::console::events::{BulkActionKind, ControllerAction, RowAction};

/// `s`, `d`, `r` on the checked rows
pub struct BulkSelectionCommand;

impl BulkSelectionCommand {
    fn kind_for(code: KeyCode) -> Option<BulkActionKind> {
        match code {
            KeyCode::Char('s') => Some(BulkActionKind::Stop),
            KeyCode::Char('d') => Some(BulkActionKind::Delete),
            KeyCode::Char('r') => Some(BulkActionKind::Rerun),
            _ => None,
        }
    }
}

impl Command for BulkSelectionCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && Self::kind_for(event.code).is_some()
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(Self::kind_for(event.code)
            .map(ControllerAction::BulkOnSelection)
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "BulkSelection"
    }
}

/// `S`, `D`, `R`, `c` on the cursor row
pub struct RowActionCommand;

impl RowActionCommand {
    fn action_for(code: KeyCode) -> Option<RowAction> {
        match code {
            KeyCode::Char('S') => Some(RowAction::Stop),
            KeyCode::Char('D') => Some(RowAction::Delete),
            KeyCode::Char('R') => Some(RowAction::Rerun),
            KeyCode::Char('c') => Some(RowAction::Clone),
            _ => None,
        }
    }
}

impl Command for RowActionCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && Self::action_for(event.code).is_some()
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(Self::action_for(event.code)
            .map(ControllerAction::RowAction)
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "RowAction"
    }
}

/// `e` opens the export format prompt
pub struct ExportPromptCommand;

impl Command for ExportPromptCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && event.code == KeyCode::Char('e')
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(vec![ControllerAction::ExportPrompt])
    }

    fn name(&self) -> &'static str {
        "ExportPrompt"
    }
}
