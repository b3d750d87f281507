//! # Mock I/O
//!
//! In-memory streams for driving the console without a terminal. The render
//! stream shares its recording with a [`MockRenderHandle`] so a test can keep
//! looking at the output after the stream has been moved into the controller.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::Event;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Pre-programmed input events
#[derive(Debug, Default)]
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }
}

impl EventStream for MockEventStream {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No events available"))
    }
}

/// Recorded render command
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    BeginConsole,
    EndConsole,
    ClearScreen,
    MoveCursor(u16, u16),
    Flush,
}

#[derive(Debug, Default)]
struct Recording {
    commands: Vec<RenderCommand>,
    /// Bytes written since the last clear
    output: Vec<u8>,
}

fn lock(recording: &Mutex<Recording>) -> MutexGuard<'_, Recording> {
    recording.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read side of a [`MockRenderStream`]
#[derive(Debug, Clone)]
pub struct MockRenderHandle {
    recording: Arc<Mutex<Recording>>,
}

impl MockRenderHandle {
    pub fn commands(&self) -> Vec<RenderCommand> {
        lock(&self.recording).commands.clone()
    }

    pub fn has_command(&self, command: &RenderCommand) -> bool {
        lock(&self.recording).commands.contains(command)
    }

    /// Everything written since the last clear, escape sequences included
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&lock(&self.recording).output).to_string()
    }
}

/// Render stream that records instead of drawing
#[derive(Debug)]
pub struct MockRenderStream {
    recording: Arc<Mutex<Recording>>,
    size: TerminalSize,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size((120, 24))
    }

    pub fn with_size(size: TerminalSize) -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording::default())),
            size,
        }
    }

    pub fn handle(&self) -> MockRenderHandle {
        MockRenderHandle {
            recording: Arc::clone(&self.recording),
        }
    }

    fn record(&self, command: RenderCommand) {
        lock(&self.recording).commands.push(command);
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MockRenderStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        lock(&self.recording).output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.record(RenderCommand::Flush);
        Ok(())
    }
}

impl RenderStream for MockRenderStream {
    fn begin_console(&mut self) -> Result<()> {
        self.record(RenderCommand::BeginConsole);
        Ok(())
    }

    fn end_console(&mut self) -> Result<()> {
        self.record(RenderCommand::EndConsole);
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        let mut recording = lock(&self.recording);
        recording.commands.push(RenderCommand::ClearScreen);
        recording.output.clear();
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.record(RenderCommand::MoveCursor(x, y));
        Ok(())
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(self.size)
    }
}
