use image::imageops::FilterType;
use image::{GrayImage, RgbaImage};

/// Tesseract reads digits best when the text is at least ~80 px tall.
pub const TARGET_MIN_WIDTH: u32 = 180;
pub const TARGET_MIN_HEIGHT: u32 = 80;

/// Upscaling beyond this blurs glyph edges more than it helps.
pub const MAX_SCALE: f32 = 2.5;

/// Converts a captured region to grayscale and upscales small captures.
///
/// Captures already at least `TARGET_MIN_WIDTH`×`TARGET_MIN_HEIGHT` are only
/// converted to grayscale.
pub fn prepare_for_ocr(img: &RgbaImage) -> GrayImage {
    let gray = image::imageops::grayscale(img);
    let (w, h) = gray.dimensions();
    let (nw, nh) = upscaled_dimensions(w, h);

    if (nw, nh) == (w, h) {
        return gray;
    }

    image::imageops::resize(&gray, nw, nh, FilterType::Lanczos3)
}

/// Computes the OCR input size for a `width`×`height` capture.
pub fn upscaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width >= TARGET_MIN_WIDTH && height >= TARGET_MIN_HEIGHT {
        return (width, height);
    }

    let scale = (TARGET_MIN_WIDTH as f32 / width as f32)
        .max(TARGET_MIN_HEIGHT as f32 / height as f32)
        .max(1.0)
        .min(MAX_SCALE);

    let nw = ((width as f32 * scale) as u32).max(TARGET_MIN_WIDTH);
    let nh = ((height as f32 * scale) as u32).max(TARGET_MIN_HEIGHT);
    (nw, nh)
}
