//! Desktop GUI for age/gender classification of face images.

use agesight_gui::{
    AgeSightApp,
    core::{detection::build_classifier, settings::load_settings},
};
use agesight_utils::{config::default_settings_path, configure_telemetry, init_logging};
use eframe::NativeOptions;
use log::{error, info};

/// Main entry point for the GUI application.
fn main() -> eframe::Result<()> {
    init_logging(log::LevelFilter::Info).expect("failed to initialize logging");

    let settings_path = default_settings_path();
    info!("Loading settings from {}", settings_path.display());
    let settings = load_settings(&settings_path);
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );

    info!("Loading model {}...", settings.model_path);
    let classifier = match build_classifier(&settings) {
        Ok(classifier) => classifier,
        Err(err) => {
            error!("Unable to load model: {err:#}");
            return Err(eframe::Error::AppCreation(err.into()));
        }
    };
    info!("Done.");

    info!("Starting application...");
    let mut options = NativeOptions::default();
    options.viewport = options
        .viewport
        .with_title("AgeSight")
        .with_inner_size([680.0, 720.0]);

    let result = eframe::run_native(
        "AgeSight",
        options,
        Box::new(move |cc| {
            Ok(Box::new(AgeSightApp::new(
                cc,
                settings,
                settings_path,
                classifier,
            )))
        }),
    );

    info!("Bye!");
    result
}
