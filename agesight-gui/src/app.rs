//! Construction and frame loop of the AgeSight window.

use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use agesight_core::FaceClassifier;
use agesight_utils::config::AppSettings;
use eframe::{App, CreationContext, Frame};
use log::debug;

use crate::{AgeSightApp, DisplayState, theme};

/// Status shown once the window opens.
pub const READY_STATUS: &str = "Model ready. Click Browse and select a cropped face image.";

impl AgeSightApp {
    /// Creates the app from an eframe creation context.
    pub fn new(
        cc: &CreationContext<'_>,
        settings: AppSettings,
        settings_path: PathBuf,
        classifier: Arc<dyn FaceClassifier>,
    ) -> Self {
        Self::create(&cc.egui_ctx, settings, settings_path, classifier)
    }

    /// Creates the app around an already loaded classifier.
    pub fn create(
        ctx: &egui::Context,
        settings: AppSettings,
        settings_path: PathBuf,
        classifier: Arc<dyn FaceClassifier>,
    ) -> Self {
        theme::apply(ctx);
        let (job_tx, job_rx) = mpsc::channel();
        debug!("Settings file: {}", settings_path.display());

        Self {
            settings,
            settings_path,
            status_line: READY_STATUS.to_owned(),
            last_error: None,
            classifier,
            job_tx,
            job_rx,
            display: DisplayState::default(),
            is_busy: false,
            texture_seq: 0,
            job_counter: 0,
            current_job: None,
            current_cancel: None,
        }
    }

    /// Headless instance with default settings, for tests.
    #[doc(hidden)]
    pub fn test_instance(classifier: Arc<dyn FaceClassifier>) -> Self {
        let settings_path = std::env::temp_dir().join("agesight_gui_test_settings.json");
        Self::create(
            &egui::Context::default(),
            AppSettings::default(),
            settings_path,
            classifier,
        )
    }

    /// Opens the file picker and handles the selection, cancelled or not.
    pub(crate) fn open_image_dialog(&mut self) {
        use rfd::FileDialog;

        let mut dialog = FileDialog::new()
            .set_title("Select a face image")
            .add_filter("JPG files", &["jpg"]);
        if let Ok(cwd) = std::env::current_dir() {
            dialog = dialog.set_directory(cwd);
        }
        let selection = dialog.pick_file();
        self.handle_selection(selection);
    }
}

impl App for AgeSightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_worker(ctx);
        self.show_status_bar(ctx);
        self.show_display(ctx);

        if self.is_busy {
            ctx.request_repaint();
        }
    }
}
