//! UI module organization for the AgeSight GUI.

pub mod display;
pub mod status_bar;
