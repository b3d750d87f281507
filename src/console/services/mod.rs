//! # Services Layer
//!
//! Services wrap external resources used by the controller. The only one is
//! the scan API client.

pub mod api;

pub use api::{server_message, ApiClient, ApiError, ApiMessage, SearchQuery};
