//! Error taxonomy for a monitoring session.
//!
//! - `ConfigError` is fatal: the session never starts.
//! - `TickError` skips a single tick; the loop keeps running.
//! - `ClickError` is logged when the alert click fails; monitoring continues.

use thiserror::Error;

use crate::capture::{Point, Region};

/// Invalid or incomplete session configuration, reported by `start()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no region selected")]
    MissingRegion,

    #[error("region {0} has no area")]
    EmptyRegion(Region),

    #[error("region {region} lies outside the primary display {display}")]
    RegionOutOfBounds { region: Region, display: Region },

    #[error("interval must be a positive number of seconds (got {0})")]
    InvalidInterval(f64),

    #[error("delta must be a positive number (got {0})")]
    InvalidDelta(f64),

    #[error("click on delta is enabled but no click position is set")]
    MissingClickTarget,

    #[error("monitoring is already running")]
    AlreadyRunning,

    #[error("the previous monitoring session ended abnormally; restart the application")]
    WorkerLost,
}

/// The screen could not be captured for this tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("display unavailable: {0}")]
    DisplayUnavailable(String),

    #[error("region {region} is outside the primary display {display}")]
    OutOfBounds { region: Region, display: Region },
}

/// The OCR engine itself failed. "No text found" is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("recognition failed: {0}")]
pub struct RecognitionError(pub String);

/// Per-tick failure. The tick is skipped and the loop continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// The input simulator could not perform the alert click.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("click at {target} failed: {reason}")]
pub struct ClickError {
    pub target: Point,
    pub reason: String,
}
