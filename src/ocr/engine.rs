use anyhow::{anyhow, Result};
use image::{GrayImage, RgbaImage};
use std::process::Command;
use tempfile::NamedTempFile;

use super::extract::has_digits;
use super::preprocess::prepare_for_ocr;
use super::setup::TesseractPaths;
use super::TextRecognizer;
use crate::monitor::error::RecognitionError;

/// Page segmentation modes tried in order:
/// 6 = uniform block, 7 = single line, 3 = fully automatic.
pub const PSM_MODES: [u8; 3] = [6, 7, 3];

/// Runs the Tesseract command-line engine on captured regions.
#[derive(Clone, Debug)]
pub struct TesseractRecognizer {
    paths: TesseractPaths,
}

impl TesseractRecognizer {
    pub fn new(paths: TesseractPaths) -> Self {
        Self { paths }
    }

    /// Runs Tesseract once on a preprocessed grayscale image and returns raw text.
    pub fn recognize_with_psm(&self, img: &GrayImage, psm: u8) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let mut command = Command::new(&self.paths.executable);
        command.arg(temp_input.path()).arg("stdout");
        if let Some(tessdata) = &self.paths.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg(psm.to_string())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Tries each page segmentation mode until one yields text with a digit.
    ///
    /// Returns the last output when none does, so the caller still sees what
    /// the engine read.
    pub fn recognize_gray(&self, img: &GrayImage) -> Result<String> {
        let mut last = String::new();
        for psm in PSM_MODES {
            let text = self.recognize_with_psm(img, psm)?;
            if has_digits(&text) {
                return Ok(text);
            }
            last = text;
        }
        Ok(last)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, frame: &RgbaImage) -> Result<String, RecognitionError> {
        let prepared = prepare_for_ocr(frame);
        self.recognize_gray(&prepared)
            .map_err(|e| RecognitionError(e.to_string()))
    }
}
