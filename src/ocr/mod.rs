pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod setup;

pub use engine::TesseractRecognizer;
pub use extract::parse_value;
pub use setup::{ensure_tesseract, TesseractPaths};

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

use crate::capture::{FrameCapturer, Region};
use crate::monitor::error::RecognitionError;
use preprocess::prepare_for_ocr;

/// Turns a captured bitmap into raw text.
pub trait TextRecognizer: Send {
    /// Fails only when the engine itself fails; unreadable images yield
    /// empty or garbage text instead.
    fn recognize(&self, frame: &RgbaImage) -> Result<String, RecognitionError>;
}

/// Result of a one-off capture + OCR of the selected region.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Recognized text, trimmed; "(no text detected)" when empty
    pub raw_text: String,
    pub value: Option<f64>,
    pub capture_path: PathBuf,
    pub preprocessed_path: PathBuf,
}

/// Captures the region once, saves the raw and preprocessed images to
/// `debug_dir`, and runs recognition.
///
/// Used from the setup screen to check that the region reads correctly
/// before monitoring starts.
pub fn probe_region(
    capturer: &dyn FrameCapturer,
    recognizer: &dyn TextRecognizer,
    region: &Region,
    debug_dir: &Path,
) -> Result<ProbeReport> {
    let frame = capturer.capture(region)?;

    std::fs::create_dir_all(debug_dir)
        .with_context(|| format!("Failed to create {}", debug_dir.display()))?;

    let capture_path = debug_dir.join("debug_capture.png");
    frame
        .save(&capture_path)
        .with_context(|| format!("Failed to save {}", capture_path.display()))?;

    let preprocessed_path = debug_dir.join("debug_preprocessed.png");
    prepare_for_ocr(&frame)
        .save(&preprocessed_path)
        .with_context(|| format!("Failed to save {}", preprocessed_path.display()))?;

    let text = recognizer.recognize(&frame)?;
    let value = parse_value(&text);
    let trimmed = text.trim();
    let raw_text = if trimmed.is_empty() {
        "(no text detected)".to_string()
    } else {
        trimmed.to_string()
    };

    crate::log(&format!(
        "Test region {}: text {:?}, value {:?}",
        region, raw_text, value
    ));

    Ok(ProbeReport {
        raw_text,
        value,
        capture_path,
        preprocessed_path,
    })
}
