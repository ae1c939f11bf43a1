//! GUI application state management.
//!
//! Tracks user input values and monitoring status for display.

use std::collections::VecDeque;

use crate::monitor::{alert_message, MonitorConfig, MonitorEvent, StopReason};
use crate::ocr::ProbeReport;

/// Most recent reading lines kept for display.
pub const MAX_READINGS: usize = 100;

/// Monitoring status for display in GUI.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MonitorStatus {
    /// Not running, ready to start
    #[default]
    Idle,
    /// Polling loop is running
    Monitoring,
    /// Stop button was pressed
    StoppedByUser,
    /// Stop-after-alert ended the session
    StoppedByAlert,
    /// Start failed or something went wrong
    Error(String),
}

impl MonitorStatus {
    /// Get display text for current status.
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "Idle".to_string(),
            Self::Monitoring => "Monitoring...".to_string(),
            Self::StoppedByUser => "Stopped by user".to_string(),
            Self::StoppedByAlert => "Stopped (delta alert)".to_string(),
            Self::Error(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Monitoring)
    }
}

/// Text of the startup error window: each cause of `error` on its own line.
pub fn startup_error_text(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of the test-region window.
#[derive(Clone, Debug)]
pub enum ProbeView {
    Report(ProbeReport),
    Failed(String),
}

/// GUI application state.
#[derive(Debug)]
pub struct GuiState {
    /// Interval field as typed (seconds)
    pub interval_text: String,
    /// Delta field as typed
    pub delta_text: String,
    /// Settings applied at the next start
    pub config: MonitorConfig,
    pub status: MonitorStatus,
    /// Oldest first
    pub readings: VecDeque<String>,
    /// Message of the alert dialog, while it is open
    pub alert: Option<String>,
    pub probe: Option<ProbeView>,
}

impl GuiState {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            interval_text: config.interval_seconds.to_string(),
            delta_text: config.delta_threshold.to_string(),
            config,
            status: MonitorStatus::Idle,
            readings: VecDeque::new(),
            alert: None,
            probe: None,
        }
    }

    /// Copies the text fields into the config.
    ///
    /// Only checks that both are numbers; the rest is validated on start.
    pub fn apply_settings(&mut self) -> Result<(), String> {
        let interval = self.interval_text.trim().parse::<f64>();
        let delta = self.delta_text.trim().parse::<f64>();
        match (interval, delta) {
            (Ok(interval), Ok(delta)) => {
                self.config.interval_seconds = interval;
                self.config.delta_threshold = delta;
                Ok(())
            }
            _ => Err("Interval and Delta must be numbers.".to_string()),
        }
    }

    /// Appends a line to the readings list, dropping the oldest past the cap.
    pub fn push_reading(&mut self, line: String) {
        self.readings.push_back(line);
        while self.readings.len() > MAX_READINGS {
            self.readings.pop_front();
        }
    }

    /// Applies one event from the monitor thread.
    pub fn apply_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Reading(reading) => self.push_reading(reading.log_line()),
            MonitorEvent::Skipped { at, reason } => {
                self.push_reading(format!("{}  skipped: {}", at.format("%H:%M:%S"), reason))
            }
            MonitorEvent::Alert { event, click } => {
                self.alert = Some(alert_message(&event, &click));
            }
            MonitorEvent::Stopped(StopReason::Requested) => {
                self.status = MonitorStatus::StoppedByUser;
            }
            MonitorEvent::Stopped(StopReason::AlertFired) => {
                self.status = MonitorStatus::StoppedByAlert;
            }
        }
    }

    pub fn region_text(&self) -> String {
        match &self.config.region {
            Some(region) => format!("Region: {}", region),
            None => "Region: not selected".to_string(),
        }
    }

    pub fn click_text(&self) -> String {
        match &self.config.click_target {
            Some(point) => format!("Click position: {}", point),
            None => "Click position: not set".to_string(),
        }
    }
}
