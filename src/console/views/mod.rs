//! # Views
//!
//! Terminal rendering of the console state.

pub mod terminal_renderer;

pub use terminal_renderer::{fit, Palette, TerminalRenderer, ViewRenderer};
