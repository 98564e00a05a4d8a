//! Settings persistence and loading.

use std::path::Path;

use agesight_utils::config::AppSettings;
use anyhow::{Context as AnyhowContext, Result};
use log::{info, warn};

/// Loads application settings from a file, or returns default settings if loading fails.
///
/// A missing file is seeded with the defaults so the model path and label
/// vocabulary can be edited by hand.
pub fn load_settings(path: &Path) -> AppSettings {
    if !path.exists() {
        let settings = AppSettings::default();
        match persist_settings(&settings, path) {
            Ok(()) => info!("Wrote default settings to {}", path.display()),
            Err(err) => warn!("Unable to write default settings: {err:#}"),
        }
        return settings;
    }

    match AppSettings::load_from_path(path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(
                "Failed to load settings from {}: {err:?}. Falling back to defaults.",
                path.display()
            );
            AppSettings::default()
        }
    }
}

/// Saves the current settings to the JSON file.
pub fn persist_settings(settings: &AppSettings, settings_path: &Path) -> Result<()> {
    settings
        .save_to_path(settings_path)
        .with_context(|| format!("failed to write settings to {}", settings_path.display()))
}
