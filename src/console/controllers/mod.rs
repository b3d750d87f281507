//! # Controllers
//!
//! The application controller owns the event loop.

pub mod app_controller;

pub use app_controller::AppController;
