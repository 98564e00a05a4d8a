//! Classification workflow and classifier management.

use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use agesight_core::{AgeGenderDetector, ClassifyError, FaceClassifier, classify_image};
use agesight_utils::{LabelVocabulary, config::AppSettings, fit_within, load_image};
use anyhow::{Context as AnyhowContext, Result};
use image::imageops::FilterType;
use log::{debug, error, info};

use crate::{DISPLAY_SIZE, JobMessage};

/// Builds the age/gender classifier from the given application settings.
pub fn build_classifier(settings: &AppSettings) -> Result<Arc<dyn FaceClassifier>> {
    let detector = AgeGenderDetector::from_settings(settings).with_context(|| {
        format!(
            "failed to load model from configured path {}",
            settings.model_path
        )
    })?;
    Ok(Arc::new(detector))
}

/// Loads an image and scales it to fit the display area, keeping its aspect ratio.
pub fn prepare_display_image(path: &Path) -> Result<egui::ColorImage> {
    let image =
        load_image(path).with_context(|| format!("failed to load image from {}", path.display()))?;
    let (width, height) = fit_within(
        (image.width(), image.height()),
        (DISPLAY_SIZE[0], DISPLAY_SIZE[1]),
    );
    anyhow::ensure!(width > 0 && height > 0, "{} is empty", path.display());

    let fitted = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };
    let rgba = fitted.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_raw(),
    ))
}

/// Status-line headline for a failed classification.
pub fn failure_headline(err: &ClassifyError) -> &'static str {
    match err {
        ClassifyError::NoDetection => "No face detected",
        ClassifyError::Unrecognized(_) => "Unrecognized result",
        ClassifyError::Inference(_) => "Classification failed",
    }
}

/// Launches a background classification job for the given image path.
pub fn start_classification(
    path: PathBuf,
    classifier: Arc<dyn FaceClassifier>,
    vocabulary: LabelVocabulary,
    job_id: u64,
    cancel: Arc<AtomicBool>,
    job_tx: mpsc::Sender<JobMessage>,
) {
    info!(
        "Launching classification job {} for {}",
        job_id,
        path.display()
    );
    rayon::spawn(move || {
        run_classification_job(path, classifier.as_ref(), &vocabulary, job_id, &cancel, &job_tx);
    });
}

/// Body of a classification job.
///
/// Sends [`JobMessage::ImageReady`] once the image is decoded, then either
/// `ClassificationFinished` or `ClassificationFailed`. Stops sending as soon
/// as `cancel` is set.
pub fn run_classification_job(
    path: PathBuf,
    classifier: &dyn FaceClassifier,
    vocabulary: &LabelVocabulary,
    job_id: u64,
    cancel: &AtomicBool,
    job_tx: &mpsc::Sender<JobMessage>,
) {
    let cancelled = || {
        let flag = cancel.load(Ordering::Acquire);
        if flag {
            debug!("Classification job {job_id} cancelled");
        }
        flag
    };
    let send = |message: JobMessage| {
        if job_tx.send(message).is_err() {
            error!("GUI dropped classification result for {}", path.display());
        }
    };

    if cancelled() {
        return;
    }
    match prepare_display_image(&path) {
        Ok(color_image) => send(JobMessage::ImageReady {
            job_id,
            path: path.clone(),
            color_image,
        }),
        Err(err) => {
            send(JobMessage::ClassificationFailed {
                job_id,
                headline: "Unable to open image".to_owned(),
                error: format!("{err:#}"),
            });
            return;
        }
    }

    if cancelled() {
        return;
    }
    info!("Detecting on image {}...", path.display());
    let message = match classify_image(classifier, &path, vocabulary) {
        Ok(classification) => JobMessage::ClassificationFinished {
            job_id,
            classification,
        },
        Err(err) => JobMessage::ClassificationFailed {
            job_id,
            headline: failure_headline(&err).to_owned(),
            error: format!("{err:#}"),
        },
    };
    if cancelled() {
        return;
    }
    send(message);
}
