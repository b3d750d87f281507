//! # Scan Console
//!
//! Model-View-ViewModel implementation of the interactive scan list.

pub mod commands;
pub mod controllers;
pub mod events;
pub mod io;
pub mod models;
pub mod report;
pub mod services;
pub mod view_models;
pub mod views;

pub use controllers::AppController;
pub use events::{BulkActionKind, ControllerAction, Effect, ExportFormat, RowAction};
pub use models::{ScanSummary, StatusFilter, Theme, ThemeStore};
pub use services::{ApiClient, ApiError, SearchQuery};
pub use view_models::{ControllerState, TableView};
