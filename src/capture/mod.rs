//! Screen capture for the monitored region.
//!
//! This module provides:
//! - Screen geometry (`Region`, `Point`)
//! - The `FrameCapturer` boundary used by the monitor loop
//! - An xcap-backed capturer for the primary X11 display (`ScreenCapturer`)

pub mod region;
pub mod screen;

pub use region::{Point, Region};
pub use screen::{DisplaySnapshot, ScreenCapturer};

use image::RgbaImage;

use crate::monitor::error::CaptureError;

/// Source of bitmaps for a fixed screen region.
pub trait FrameCapturer: Send {
    /// Bounds of the primary display in screen coordinates.
    fn display_bounds(&self) -> Result<Region, CaptureError>;

    /// Captures the current screen contents inside `region`.
    fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError>;
}
