//! # Key Commands
//!
//! Each command maps one kind of key press onto controller actions. The
//! registry asks every command whether it is relevant in the current context
//! and executes the first one that is. Commands never touch state directly.

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::console::events::ControllerAction;
use crate::console::view_models::{ControllerState, Prompt};

pub mod actions;
pub mod app;
pub mod navigation;
pub mod prompt;
pub mod selection;

pub use actions::{BulkSelectionCommand, ExportPromptCommand, RowActionCommand};
pub use app::{QuitCommand, RefreshCommand, ToggleThemeCommand};
pub use navigation::{CursorCommand, FilterCommand};
pub use prompt::{ConfirmAnswerCommand, ExportFormatCommand};
pub use selection::{RowClickCommand, ToggleAllCommand};

/// Which prompt, if any, is waiting for an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Confirm,
    ExportFormat,
}

/// Read-only view of the console state used to decide relevance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub prompt: Option<PromptKind>,
    /// Id of the row under the cursor
    pub cursor_row: Option<String>,
    pub all_checked: bool,
}

impl CommandContext {
    pub fn from_state(state: &ControllerState) -> Self {
        Self {
            prompt: state.prompt().map(|prompt| match prompt {
                Prompt::Confirm { .. } => PromptKind::Confirm,
                Prompt::ExportFormat { .. } => PromptKind::ExportFormat,
            }),
            cursor_row: state.cursor_row().map(|row| row.id.clone()),
            all_checked: state.selection().all_checked(),
        }
    }

    /// Normal table keys only apply while no prompt is open
    pub fn browsing(&self) -> bool {
        self.prompt.is_none()
    }
}

pub trait Command: Send + Sync {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool;

    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<ControllerAction>>;

    fn name(&self) -> &'static str;
}

pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let commands: Vec<Box<dyn Command>> = vec![
            // Quit goes first so Ctrl+C works even with a prompt open
            Box::new(QuitCommand),
            Box::new(ConfirmAnswerCommand),
            Box::new(ExportFormatCommand),
            Box::new(RefreshCommand),
            Box::new(ToggleThemeCommand),
            Box::new(FilterCommand),
            Box::new(CursorCommand),
            Box::new(RowClickCommand),
            Box::new(ToggleAllCommand),
            Box::new(BulkSelectionCommand),
            Box::new(RowActionCommand),
            Box::new(ExportPromptCommand),
        ];
        Self { commands }
    }

    /// Actions for a key press; empty when no command wants it
    pub fn process_event(
        &self,
        event: KeyEvent,
        context: &CommandContext,
    ) -> Result<Vec<ControllerAction>> {
        for command in &self.commands {
            if command.is_relevant(context, &event) {
                tracing::debug!("Key {:?} handled by {}", event.code, command.name());
                return command.execute(event, context);
            }
        }
        tracing::trace!("No command for key {:?}", event.code);
        Ok(Vec::new())
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    pub fn browsing_context() -> CommandContext {
        CommandContext {
            prompt: None,
            cursor_row: Some("A".to_string()),
            all_checked: false,
        }
    }

    pub fn prompt_context(kind: PromptKind) -> CommandContext {
        CommandContext {
            prompt: Some(kind),
            ..browsing_context()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::console::events::{BulkActionKind, ExportFormat};
    use crate::console::models::StatusFilter;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn registry_should_map_filter_keys() {
        let registry = CommandRegistry::new();
        let actions = registry
            .process_event(key(KeyCode::Char('2')), &browsing_context())
            .unwrap();
        assert_eq!(actions, vec![ControllerAction::SetFilter(StatusFilter::Running)]);
    }

    #[test]
    fn registry_should_route_keys_to_open_prompt() {
        let registry = CommandRegistry::new();

        // 'd' would start a delete while browsing; at the confirm prompt it is ignored
        let actions = registry
            .process_event(key(KeyCode::Char('d')), &prompt_context(PromptKind::Confirm))
            .unwrap();
        assert!(actions.is_empty());

        let actions = registry
            .process_event(key(KeyCode::Char('y')), &prompt_context(PromptKind::Confirm))
            .unwrap();
        assert_eq!(actions, vec![ControllerAction::Confirm(true)]);

        let actions = registry
            .process_event(key(KeyCode::Char('j')), &prompt_context(PromptKind::ExportFormat))
            .unwrap();
        assert_eq!(
            actions,
            vec![ControllerAction::ExportFormatChosen(Some(ExportFormat::Json))]
        );
    }

    #[test]
    fn ctrl_c_should_quit_even_with_prompt_open() {
        let registry = CommandRegistry::new();
        let actions = registry
            .process_event(
                key_with(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &prompt_context(PromptKind::Confirm),
            )
            .unwrap();
        assert_eq!(actions, vec![ControllerAction::Quit]);
    }

    #[test]
    fn registry_should_distinguish_bulk_and_row_keys() {
        let registry = CommandRegistry::new();
        let context = browsing_context();

        assert_eq!(
            registry.process_event(key(KeyCode::Char('d')), &context).unwrap(),
            vec![ControllerAction::BulkOnSelection(BulkActionKind::Delete)]
        );
        assert_eq!(
            registry
                .process_event(key_with(KeyCode::Char('D'), KeyModifiers::SHIFT), &context)
                .unwrap(),
            vec![ControllerAction::RowAction(crate::console::events::RowAction::Delete)]
        );
    }

    #[test]
    fn unknown_key_should_produce_nothing() {
        let registry = CommandRegistry::new();
        assert!(registry
            .process_event(key(KeyCode::Char('z')), &browsing_context())
            .unwrap()
            .is_empty());
        assert!(registry.command_count() > 10);
    }
}
