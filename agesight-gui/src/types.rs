//! Type definitions for the AgeSight GUI application.

use std::{
    path::PathBuf,
    sync::{Arc, atomic::AtomicBool, mpsc},
};

use agesight_core::{Classification, FaceClassifier, NormalizedResult};
use agesight_utils::config::AppSettings;
use egui::TextureHandle;

/// Placeholder shown in the result fields when nothing has been classified.
pub const NOT_AVAILABLE: &str = "N/A";

/// Size of the image area; selected images are fitted inside it.
pub const DISPLAY_SIZE: [u32; 2] = [640, 480];

/// Everything the main panel shows.
///
/// Owned by the UI thread and only mutated from job messages or user actions.
#[derive(Clone)]
pub struct DisplayState {
    /// The selected image, already fitted to [`DISPLAY_SIZE`]. `None` shows
    /// the gray placeholder.
    pub image: Option<TextureHandle>,
    pub gender: String,
    pub age: String,
    pub confidence: String,
    /// Path of the last chosen file.
    pub selected_path: Option<PathBuf>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            image: None,
            gender: NOT_AVAILABLE.to_owned(),
            age: NOT_AVAILABLE.to_owned(),
            confidence: NOT_AVAILABLE.to_owned(),
            selected_path: None,
        }
    }
}

impl DisplayState {
    /// Blank the image area and set every result field to [`NOT_AVAILABLE`].
    ///
    /// The selected path is left untouched.
    pub fn reset(&mut self) {
        self.image = None;
        self.clear_result();
    }

    pub fn clear_result(&mut self) {
        self.gender = NOT_AVAILABLE.to_owned();
        self.age = NOT_AVAILABLE.to_owned();
        self.confidence = NOT_AVAILABLE.to_owned();
    }

    pub fn set_result(&mut self, result: &NormalizedResult) {
        self.gender = result.gender.clone();
        self.age = result.age_bracket.clone();
        self.confidence = format!("{:.2}%", result.confidence_percent);
    }
}

/// The main application state for the AgeSight GUI.
pub struct AgeSightApp {
    /// User-configurable settings.
    pub settings: AppSettings,
    /// Path to the settings file on disk.
    pub settings_path: PathBuf,
    /// The current status message displayed in the top bar.
    pub status_line: String,
    /// The last error message, if any.
    pub last_error: Option<String>,
    /// The loaded classifier. Always present once the window is open.
    pub classifier: Arc<dyn FaceClassifier>,
    /// Sender for submitting classification jobs to a background thread.
    pub job_tx: mpsc::Sender<JobMessage>,
    /// Receiver for collecting results from classification jobs.
    pub job_rx: mpsc::Receiver<JobMessage>,
    /// What the main panel currently shows.
    pub display: DisplayState,
    /// Flag indicating if a classification job is currently running.
    pub is_busy: bool,
    /// A counter to generate unique texture names.
    pub texture_seq: u64,
    /// A counter to generate unique job IDs.
    pub job_counter: u64,
    /// The ID of the currently running job.
    pub current_job: Option<u64>,
    /// Cancellation flag of the current job.
    pub current_cancel: Option<Arc<AtomicBool>>,
}

/// Messages sent from background jobs to the UI thread.
pub enum JobMessage {
    /// The selected image was decoded and fitted to the display area.
    ImageReady {
        job_id: u64,
        path: PathBuf,
        color_image: egui::ColorImage,
    },
    /// Classification produced a result.
    ClassificationFinished {
        job_id: u64,
        classification: Classification,
    },
    /// The job failed; `headline` goes to the status line, `error` below it.
    ClassificationFailed {
        job_id: u64,
        headline: String,
        error: String,
    },
}

impl JobMessage {
    pub fn job_id(&self) -> u64 {
        match self {
            JobMessage::ImageReady { job_id, .. }
            | JobMessage::ClassificationFinished { job_id, .. }
            | JobMessage::ClassificationFailed { job_id, .. } => *job_id,
        }
    }
}
