//! Core functionality modules for the AgeSight GUI application.
//!
//! - `detection`: classifier construction and the background classification job
//! - `settings`: settings persistence and loading

pub mod detection;
pub mod settings;
