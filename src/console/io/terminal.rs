//! # Terminal I/O
//!
//! crossterm-backed streams. All direct terminal access lives here, including
//! the console session: raw mode, the alternate screen, a hidden cursor and
//! no line wrapping while the scan table is up. A session that is still open
//! when the stream is dropped is closed then, so an error that unwinds out of
//! the event loop does not leave the operator's shell in raw mode.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{cursor, queue};
use std::io::{self, Write};
use std::time::Duration;

/// Reads key and resize events from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalEventStream;

impl TerminalEventStream {
    pub fn new() -> Self {
        Self
    }
}

impl EventStream for TerminalEventStream {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}

/// Draws the console on the terminal, stdout unless another writer is given
pub struct TerminalRenderStream<W: Write> {
    writer: W,
    /// Whether `begin_console` has run without a matching `end_console`
    in_session: bool,
}

impl TerminalRenderStream<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderStream<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderStream<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            in_session: false,
        }
    }

    /// Undo every session setting; each step runs even if an earlier one fails
    fn restore(&mut self) -> Result<()> {
        self.in_session = false;
        let steps = [
            queue!(self.writer, EnableLineWrap, cursor::Show, LeaveAlternateScreen)
                .and_then(|()| self.writer.flush()),
            terminal::disable_raw_mode(),
        ];
        match steps.into_iter().find_map(|step| step.err()) {
            Some(e) => {
                tracing::warn!("Terminal restore incomplete: {}", e);
                Err(e.into())
            }
            None => Ok(()),
        }
    }
}

impl<W: Write> Write for TerminalRenderStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write + Send> RenderStream for TerminalRenderStream<W> {
    fn begin_console(&mut self) -> Result<()> {
        if self.in_session {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        self.in_session = true;
        queue!(self.writer, EnterAlternateScreen, cursor::Hide, DisableLineWrap)?;
        self.writer.flush()?;
        tracing::debug!("Console session started");
        Ok(())
    }

    fn end_console(&mut self) -> Result<()> {
        if !self.in_session {
            return Ok(());
        }
        self.restore()?;
        tracing::debug!("Console session ended");
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        queue!(self.writer, Clear(ClearType::All))?;
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        queue!(self.writer, cursor::MoveTo(x, y))?;
        Ok(())
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(terminal::size()?)
    }
}

impl<W: Write> Drop for TerminalRenderStream<W> {
    fn drop(&mut self) {
        if self.in_session {
            let _ = self.restore();
        }
    }
}
