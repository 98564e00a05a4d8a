//! Job handling for `AgeSightApp`: selections, cancellation, and results.

use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use egui::{Context as EguiContext, TextureOptions};
use log::info;

use crate::core::detection;
use crate::{AgeSightApp, JobMessage};

impl AgeSightApp {
    /// Polls the worker for finished classification jobs.
    pub fn poll_worker(&mut self, ctx: &EguiContext) {
        let mut updated = false;
        while let Ok(message) = self.job_rx.try_recv() {
            self.handle_job_message(ctx, message);
            updated = true;
        }

        if updated {
            ctx.request_repaint();
        }
    }

    /// Reacts to the outcome of the file picker.
    ///
    /// `None` means the picker was cancelled: the image area and result fields
    /// are reset. A path starts a new classification job, cancelling any job
    /// still in flight.
    pub fn handle_selection(&mut self, selection: Option<PathBuf>) {
        self.cancel_current_job();

        let Some(path) = selection else {
            info!("Selection cancelled");
            self.display.reset();
            self.show_success("No file selected.");
            return;
        };

        info!("Selected file: '{}'", path.display());
        self.display.selected_path = Some(path.clone());
        self.display.reset();
        self.show_success(format!("Classifying {}...", path.display()));

        self.job_counter += 1;
        let job_id = self.job_counter;
        let cancel = Arc::new(AtomicBool::new(false));
        self.current_job = Some(job_id);
        self.current_cancel = Some(cancel.clone());
        self.is_busy = true;

        detection::start_classification(
            path,
            self.classifier.clone(),
            self.settings.vocabulary.clone(),
            job_id,
            cancel,
            self.job_tx.clone(),
        );
    }

    /// Signals the in-flight job, if any, to stop and forgets it.
    pub fn cancel_current_job(&mut self) {
        if let Some(cancel) = self.current_cancel.take() {
            cancel.store(true, Ordering::Release);
        }
        if let Some(job_id) = self.current_job.take() {
            info!("Cancelled classification job {job_id}");
        }
        self.is_busy = false;
    }

    /// Handles a message from a classification job.
    pub fn handle_job_message(&mut self, ctx: &EguiContext, message: JobMessage) {
        if Some(message.job_id()) != self.current_job {
            info!("Ignoring stale result of job {}", message.job_id());
            return;
        }

        match message {
            JobMessage::ImageReady {
                path, color_image, ..
            } => {
                let texture_name = format!("agesight-image-{}", self.texture_seq);
                self.texture_seq = self.texture_seq.wrapping_add(1);
                self.display.image =
                    Some(ctx.load_texture(texture_name, color_image, TextureOptions::LINEAR));
                info!("Displaying {}", path.display());
            }
            JobMessage::ClassificationFinished { classification, .. } => {
                self.finish_job();
                self.display.set_result(&classification.result);
                self.show_success(format!(
                    "Gender: {}, Age: {}, Confidence: {}",
                    self.display.gender, self.display.age, self.display.confidence
                ));
            }
            JobMessage::ClassificationFailed {
                headline, error, ..
            } => {
                self.finish_job();
                self.display.clear_result();
                self.show_error(headline, error);
            }
        }
    }

    fn finish_job(&mut self) {
        self.current_job = None;
        self.current_cancel = None;
        self.is_busy = false;
    }
}
