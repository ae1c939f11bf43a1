//! Session state for the delta monitor.
//!
//! `MonitorState` owns the sticky baseline: only the first reading of a
//! session or a reading that fires an alert replaces the last accepted value.

use chrono::{DateTime, Local};
use std::time::Duration;

/// Lifecycle of a monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not polling (before `start()` or after `stop()`)
    Idle,
    /// Ticks are running on the worker thread
    Polling,
}

/// One tick's observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub at: DateTime<Local>,
    /// Text exactly as returned by the recognizer
    pub raw_text: String,
    /// Parsed number, if the text contained one
    pub value: Option<f64>,
}

impl Reading {
    /// Log line in the form `HH:MM:SS  value`.
    pub fn log_line(&self) -> String {
        match self.value {
            Some(value) => format!("{}  {}", self.at.format("%H:%M:%S"), value),
            None => format!("{}  (no number)", self.at.format("%H:%M:%S")),
        }
    }
}

/// A delta crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// Last accepted value before this reading
    pub previous: f64,
    pub current: f64,
    /// Absolute change, always >= the configured threshold
    pub delta: f64,
    pub at: DateTime<Local>,
}

impl AlertEvent {
    /// Signed change, formatted with an explicit `+` for increases.
    pub fn signed_change(&self) -> String {
        let change = self.current - self.previous;
        if change >= 0.0 {
            format!("+{}", change)
        } else {
            change.to_string()
        }
    }

    /// Human-readable summary used by notifications and the alert dialog.
    pub fn summary(&self) -> String {
        format!(
            "Delta reached: previous {} → current {} (change: {})",
            self.previous,
            self.current,
            self.signed_change()
        )
    }
}

/// What the compare step decided for a parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// First value of the session, accepted without alert
    Baseline(f64),
    /// Below threshold; the baseline is kept
    Steady {
        observed: f64,
        baseline: f64,
        delta: f64,
    },
    /// Threshold reached; `current` is the new baseline
    Alert(AlertEvent),
}

/// Mutable state owned by the monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorState {
    last_accepted: Option<f64>,
    delta_threshold: f64,
    interval: Duration,
    /// Alert decided by the compare step, awaiting its side effects
    pending_alert: Option<AlertEvent>,
}

impl MonitorState {
    pub fn new(delta_threshold: f64, interval: Duration) -> Self {
        Self {
            last_accepted: None,
            delta_threshold,
            interval,
            pending_alert: None,
        }
    }

    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }

    pub fn delta_threshold(&self) -> f64 {
        self.delta_threshold
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Compares a parsed value against the last accepted value.
    ///
    /// An alert is recorded as pending until `take_pending_alert()`.
    pub fn observe(&mut self, value: f64, at: DateTime<Local>) -> Decision {
        let Some(baseline) = self.last_accepted else {
            self.last_accepted = Some(value);
            return Decision::Baseline(value);
        };

        let delta = (value - baseline).abs();
        if delta >= self.delta_threshold {
            let event = AlertEvent {
                previous: baseline,
                current: value,
                delta,
                at,
            };
            self.last_accepted = Some(value);
            self.pending_alert = Some(event.clone());
            Decision::Alert(event)
        } else {
            Decision::Steady {
                observed: value,
                baseline,
                delta,
            }
        }
    }

    /// Hands the pending alert to the side-effect step.
    pub fn take_pending_alert(&mut self) -> Option<AlertEvent> {
        self.pending_alert.take()
    }
}
