//! # I/O Abstraction Layer
//!
//! Input events and terminal output sit behind two traits so the controller
//! can run against a real terminal or against in-memory streams in tests.
//!
//! ```text
//! Production:  AppController ──▶ TerminalEventStream ──▶ crossterm::event::read()
//!                            ──▶ TerminalRenderStream ──▶ crossterm::queue!()
//!
//! Testing:     AppController ──▶ MockEventStream     ──▶ VecDeque<Event>
//!                            ──▶ MockRenderStream    ──▶ shared byte buffer
//! ```

use anyhow::Result;
use crossterm::event::Event;
use std::io::Write;
use std::time::Duration;

pub mod mock;
pub mod terminal;

pub use mock::{MockEventStream, MockRenderHandle, MockRenderStream, RenderCommand};
pub use terminal::{TerminalEventStream, TerminalRenderStream};

/// Terminal size as (width, height)
pub type TerminalSize = (u16, u16);

/// Source of input events
pub trait EventStream: Send {
    /// Whether an event is ready within `timeout`
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Next event; only called after `poll` returned true
    fn read(&mut self) -> Result<Event>;
}

/// Sink for terminal output
pub trait RenderStream: Write + Send {
    /// Take over the terminal for the console: raw input, alternate screen,
    /// hidden cursor. Calling it again while a session is open does nothing.
    fn begin_console(&mut self) -> Result<()>;

    /// Hand the terminal back the way `begin_console` found it
    fn end_console(&mut self) -> Result<()>;

    fn clear_screen(&mut self) -> Result<()>;

    /// Move cursor to (column, row)
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    fn get_size(&self) -> Result<TerminalSize>;
}
