//! Application-level keys: quit, refresh and theme

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Command, CommandContext};
use crate::console::events::ControllerAction;

/// `q` while browsing, Ctrl+C anywhere
pub struct QuitCommand;

impl Command for QuitCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        let ctrl_c = matches!(event.code, KeyCode::Char('c'))
            && event.modifiers.contains(KeyModifiers::CONTROL);
        ctrl_c || (context.browsing() && event.code == KeyCode::Char('q'))
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(vec![ControllerAction::Quit])
    }

    fn name(&self) -> &'static str {
        "Quit"
    }
}

/// `u` or F5
pub struct RefreshCommand;

impl Command for RefreshCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && matches!(event.code, KeyCode::Char('u') | KeyCode::F(5))
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(vec![ControllerAction::Refresh])
    }

    fn name(&self) -> &'static str {
        "Refresh"
    }
}

/// `t`
pub struct ToggleThemeCommand;

impl Command for ToggleThemeCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && event.code == KeyCode::Char('t')
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(vec![ControllerAction::ToggleTheme])
    }

    fn name(&self) -> &'static str {
        "ToggleTheme"
    }
}
