//! Screenshot capture of the primary monitor using xcap.

use image::RgbaImage;
use xcap::Monitor;

use super::{FrameCapturer, Region};
use crate::monitor::error::CaptureError;

/// A full capture of the primary display, used by the region picker.
pub struct DisplaySnapshot {
    /// Display bounds in screen coordinates
    pub display: Region,
    pub image: RgbaImage,
}

/// Captures regions of the primary X11 display.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    pub fn new() -> Self {
        Self
    }

    /// Captures the whole primary display.
    pub fn capture_display(&self) -> Result<DisplaySnapshot, CaptureError> {
        let monitor = find_primary_monitor()?;
        let display = monitor_bounds(&monitor)?;
        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::DisplayUnavailable(e.to_string()))?;

        crate::log(&format!(
            "Captured primary display {} ({}x{} px)",
            display,
            image.width(),
            image.height()
        ));

        Ok(DisplaySnapshot { display, image })
    }
}

impl FrameCapturer for ScreenCapturer {
    fn display_bounds(&self) -> Result<Region, CaptureError> {
        let monitor = find_primary_monitor()?;
        monitor_bounds(&monitor)
    }

    fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError> {
        let monitor = find_primary_monitor()?;
        let display = monitor_bounds(&monitor)?;

        // Fail before grabbing the screen if the display shrank since selection
        if !display.contains(region) {
            return Err(CaptureError::OutOfBounds {
                region: *region,
                display,
            });
        }

        let full = monitor
            .capture_image()
            .map_err(|e| CaptureError::DisplayUnavailable(e.to_string()))?;

        crop_to_region(&full, &display, region)
    }
}

/// Finds the primary monitor, falling back to the first one reported.
fn find_primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::DisplayUnavailable(e.to_string()))?;

    let primary = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);

    monitors
        .into_iter()
        .nth(primary)
        .ok_or_else(|| CaptureError::DisplayUnavailable("no monitors detected".to_string()))
}

fn monitor_bounds(monitor: &Monitor) -> Result<Region, CaptureError> {
    let unavailable = |e: xcap::XCapError| CaptureError::DisplayUnavailable(e.to_string());
    Ok(Region::new(
        monitor.x().map_err(unavailable)?,
        monitor.y().map_err(unavailable)?,
        monitor.width().map_err(unavailable)?,
        monitor.height().map_err(unavailable)?,
    ))
}

/// Crops `region` (screen coordinates) out of a full-display capture.
///
/// The captured image may be smaller than the reported bounds when the
/// resolution changes mid-capture; that is reported as out of bounds.
pub fn crop_to_region(
    full: &RgbaImage,
    display: &Region,
    region: &Region,
) -> Result<RgbaImage, CaptureError> {
    let captured = Region::new(display.left, display.top, full.width(), full.height());
    if region.is_empty() || !display.contains(region) || !captured.contains(region) {
        return Err(CaptureError::OutOfBounds {
            region: *region,
            display: captured,
        });
    }

    let (x, y) = display.offset_of(region);
    Ok(image::imageops::crop_imm(full, x, y, region.width, region.height).to_image())
}
