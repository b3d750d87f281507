//! Answers to open prompts

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{Command, CommandContext, PromptKind};
use crate::console::events::{ControllerAction, ExportFormat};

/// `y`/Enter accept, `n`/Esc decline a stop or delete
pub struct ConfirmAnswerCommand;

impl ConfirmAnswerCommand {
    fn answer_for(code: KeyCode) -> Option<bool> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            _ => None,
        }
    }
}

impl Command for ConfirmAnswerCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.prompt == Some(PromptKind::Confirm) && Self::answer_for(event.code).is_some()
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(Self::answer_for(event.code)
            .map(ControllerAction::Confirm)
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "ConfirmAnswer"
    }
}

/// Format hotkey picks an export format, Esc cancels
pub struct ExportFormatCommand;

impl Command for ExportFormatCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        if context.prompt != Some(PromptKind::ExportFormat) {
            return false;
        }
        match event.code {
            KeyCode::Esc => true,
            KeyCode::Char(ch) => ExportFormat::from_hotkey(ch).is_some(),
            _ => false,
        }
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        let choice = match event.code {
            KeyCode::Char(ch) => ExportFormat::from_hotkey(ch),
            _ => None,
        };
        Ok(vec![ControllerAction::ExportFormatChosen(choice)])
    }

    fn name(&self) -> &'static str {
        "ExportFormat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::commands::test_support::*;

    #[test]
    fn confirm_should_only_listen_while_confirming() {
        let key_y = key(KeyCode::Char('y'));
        assert!(ConfirmAnswerCommand.is_relevant(&prompt_context(PromptKind::Confirm), &key_y));
        assert!(!ConfirmAnswerCommand.is_relevant(&browsing_context(), &key_y));
        assert!(!ConfirmAnswerCommand
            .is_relevant(&prompt_context(PromptKind::ExportFormat), &key_y));
    }

    #[test]
    fn escape_should_decline() {
        let context = prompt_context(PromptKind::Confirm);
        assert_eq!(
            ConfirmAnswerCommand.execute(key(KeyCode::Esc), &context).unwrap(),
            vec![ControllerAction::Confirm(false)]
        );
    }

    #[test]
    fn export_prompt_should_map_hotkeys_and_cancel() {
        let context = prompt_context(PromptKind::ExportFormat);
        assert_eq!(
            ExportFormatCommand
                .execute(key(KeyCode::Char('x')), &context)
                .unwrap(),
            vec![ControllerAction::ExportFormatChosen(Some(ExportFormat::Excel))]
        );
        assert_eq!(
            ExportFormatCommand.execute(key(KeyCode::Esc), &context).unwrap(),
            vec![ControllerAction::ExportFormatChosen(None)]
        );
        assert!(!ExportFormatCommand.is_relevant(&context, &key(KeyCode::Char('q'))));
    }
}
