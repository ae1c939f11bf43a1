//! Interactive picker for the monitored region and the click position.
//!
//! The main window is minimized, the primary display is captured once, and
//! the frozen screenshot is shown fullscreen for the user to drag or click on.

pub mod coords;
pub mod overlay;
pub mod state;

pub use state::{PickResult, PickTarget, PickerSession};

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::capture::{DisplaySnapshot, ScreenCapturer};
use crate::monitor::error::CaptureError;

/// Time for the window manager to finish minimizing our window.
const HIDE_DELAY: Duration = Duration::from_millis(300);

/// A display capture running on a background thread.
pub struct PendingCapture {
    target: PickTarget,
    receiver: Receiver<Result<DisplaySnapshot, CaptureError>>,
}

/// Starts capturing the display for a pick.
///
/// The caller should minimize its window first; the capture waits briefly so
/// the window is not in the screenshot.
pub fn begin_capture(ctx: &egui::Context, target: PickTarget) -> PendingCapture {
    let (sender, receiver) = channel();
    let ctx = ctx.clone();

    thread::spawn(move || {
        thread::sleep(HIDE_DELAY);
        let result = ScreenCapturer::new().capture_display();
        let _ = sender.send(result);
        ctx.request_repaint();
    });

    PendingCapture { target, receiver }
}

impl PendingCapture {
    /// Returns the picker once the capture finished, or `None` while waiting.
    pub fn poll(&self) -> Option<Result<PickerSession, CaptureError>> {
        match self.receiver.try_recv() {
            Ok(Ok(snapshot)) => Some(Ok(PickerSession::new(self.target, snapshot))),
            Ok(Err(e)) => Some(Err(e)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CaptureError::DisplayUnavailable(
                "capture thread exited".to_string(),
            ))),
        }
    }
}
