//! # View Models
//!
//! The console state and the pure render model derived from it.

pub mod controller_state;
pub mod table;

pub use controller_state::{ControllerState, Prompt};
pub use table::{row_actions, BadgeClass, TableRow, TableView, EMPTY_STATE_MESSAGE};
