//! Checkbox keys

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Command, CommandContext};
use crate::console::events::ControllerAction;

/// Space or `x` checks the cursor row; Shift+Space or `X` extends from the
/// last clicked row
pub struct RowClickCommand;

impl RowClickCommand {
    fn shift_for(event: &KeyEvent) -> Option<bool> {
        match event.code {
            KeyCode::Char(' ') => Some(event.modifiers.contains(KeyModifiers::SHIFT)),
            KeyCode::Char('x') => Some(false),
            KeyCode::Char('X') => Some(true),
            _ => None,
        }
    }
}

impl Command for RowClickCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && context.cursor_row.is_some() && Self::shift_for(event).is_some()
    }

    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<ControllerAction>> {
        let (Some(id), Some(shift)) = (context.cursor_row.clone(), Self::shift_for(&event)) else {
            return Ok(Vec::new());
        };
        Ok(vec![ControllerAction::RowClicked { id, shift }])
    }

    fn name(&self) -> &'static str {
        "RowClick"
    }
}

/// `a` flips the select-all checkbox
pub struct ToggleAllCommand;

impl Command for ToggleAllCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && event.code == KeyCode::Char('a')
    }

    fn execute(&self, _event: KeyEvent, context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(vec![ControllerAction::ToggleAll(!context.all_checked)])
    }

    fn name(&self) -> &'static str {
        "ToggleAll"
    }
}
