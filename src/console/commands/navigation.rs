//! Filter switching and cursor movement

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{Command, CommandContext};
use crate::console::events::{ControllerAction, CursorMove};
use crate::console::models::StatusFilter;

/// `1`..`4` pick All, Running, Finished, Failed
pub struct FilterCommand;

impl FilterCommand {
    fn filter_for(code: KeyCode) -> Option<StatusFilter> {
        match code {
            KeyCode::Char(ch @ '1'..='4') => {
                let index = ch as usize - '1' as usize;
                StatusFilter::ALL.get(index).copied()
            }
            _ => None,
        }
    }
}

impl Command for FilterCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && Self::filter_for(event.code).is_some()
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(Self::filter_for(event.code)
            .map(ControllerAction::SetFilter)
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "Filter"
    }
}

/// `j`/`k`, arrows, `g`/`G`, Home/End
pub struct CursorCommand;

impl CursorCommand {
    fn movement_for(code: KeyCode) -> Option<CursorMove> {
        match code {
            KeyCode::Char('k') | KeyCode::Up => Some(CursorMove::Up),
            KeyCode::Char('j') | KeyCode::Down => Some(CursorMove::Down),
            KeyCode::Char('g') | KeyCode::Home => Some(CursorMove::Top),
            KeyCode::Char('G') | KeyCode::End => Some(CursorMove::Bottom),
            _ => None,
        }
    }
}

impl Command for CursorCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.browsing() && Self::movement_for(event.code).is_some()
    }

    fn execute(&self, event: KeyEvent, _context: &CommandContext) -> Result<Vec<ControllerAction>> {
        Ok(Self::movement_for(event.code)
            .map(ControllerAction::MoveCursor)
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "Cursor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::commands::test_support::*;

    #[test]
    fn number_keys_should_select_filters_in_order() {
        let context = browsing_context();
        let expected = [
            ('1', StatusFilter::All),
            ('2', StatusFilter::Running),
            ('3', StatusFilter::Finished),
            ('4', StatusFilter::Failed),
        ];
        for (ch, filter) in expected {
            assert_eq!(
                FilterCommand.execute(key(KeyCode::Char(ch)), &context).unwrap(),
                vec![ControllerAction::SetFilter(filter)]
            );
        }
        assert!(!FilterCommand.is_relevant(&context, &key(KeyCode::Char('5'))));
    }

    #[test]
    fn vim_keys_and_arrows_should_move_cursor() {
        let context = browsing_context();
        assert_eq!(
            CursorCommand.execute(key(KeyCode::Char('j')), &context).unwrap(),
            vec![ControllerAction::MoveCursor(CursorMove::Down)]
        );
        assert_eq!(
            CursorCommand.execute(key(KeyCode::Up), &context).unwrap(),
            vec![ControllerAction::MoveCursor(CursorMove::Up)]
        );
        assert_eq!(
            CursorCommand.execute(key(KeyCode::End), &context).unwrap(),
            vec![ControllerAction::MoveCursor(CursorMove::Bottom)]
        );
    }
}
