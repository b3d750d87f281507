//! # scanline - Terminal Console for OSINT Scan Servers
//!
//! Lists the scans known to a SpiderFoot-style server, keeps the list fresh,
//! and runs stop, delete, re-run and export operations on selections of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   render    ┌──────────────────┐   owns    ┌──────────┐
//! │    View     │◄────────────│ ControllerState  │──────────►│  Models  │
//! │ - Terminal  │             │ - apply(action)  │           │ - Scans  │
//! │ - Table     │             │   -> effects     │           │ - Filter │
//! └─────────────┘             └──────────────────┘           │ - Select │
//!                                ▲            │              └──────────┘
//!                        actions │            │ effects
//!                                │            ▼
//!                             ┌──────────────────┐  tokio tasks  ┌─────────┐
//!                             │  AppController   │──────────────►│ ApiClient│
//!                             │ - key commands   │◄──────────────│ (reqwest)│
//!                             │ - event loop     │  completions  └─────────┘
//!                             └──────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod console;

pub use console::*;
