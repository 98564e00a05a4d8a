//! Desktop GUI for age/gender classification of face images (Library).

pub mod app;
pub mod app_impl;
pub mod core;
pub mod theme;
pub mod types;
pub mod ui;

pub use types::*;
