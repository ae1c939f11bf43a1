//! Event queue for reporting monitor progress to the GUI thread.
//!
//! Uses std::sync::mpsc channel: the monitor thread sends events, the GUI
//! drains them once per frame. The monitor never waits on the receiver.

use chrono::{DateTime, Local};
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::capture::Point;
use crate::monitor::state::{AlertEvent, Reading};

/// Outcome of the optional alert click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Clicking on alert is disabled
    NotRequested,
    Clicked(Point),
    Failed { target: Point, reason: String },
}

impl ClickOutcome {
    /// Line shown under the alert summary.
    pub fn describe(&self) -> Option<String> {
        match self {
            ClickOutcome::NotRequested => None,
            ClickOutcome::Clicked(point) => Some(format!("Clicked at {}", point)),
            ClickOutcome::Failed { target, reason } => Some(format!(
                "Click at {} was requested but did not execute: {}",
                target, reason
            )),
        }
    }
}

/// Why the monitor loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called
    Requested,
    /// Stop-after-alert is enabled and an alert fired
    AlertFired,
}

/// Progress reported by the monitor thread.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// A tick completed capture and recognition
    Reading(Reading),
    /// A tick was skipped because capture or recognition failed
    Skipped {
        at: DateTime<Local>,
        reason: String,
    },
    /// The delta threshold was reached
    Alert {
        event: AlertEvent,
        click: ClickOutcome,
    },
    /// The loop has exited; no further events follow
    Stopped(StopReason),
}

/// Creates a new event queue.
///
/// The channel is unbounded, so a slow GUI never blocks the monitor loop.
pub fn create_event_queue() -> (Sender<MonitorEvent>, Receiver<MonitorEvent>) {
    channel()
}
