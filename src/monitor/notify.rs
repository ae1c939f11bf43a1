//! Desktop notification for delta alerts.

use std::process::Command;

use crate::monitor::queue::ClickOutcome;
use crate::monitor::state::AlertEvent;

pub const ALERT_TITLE: &str = "Delta alert";

/// Shows a user-visible alert. Failures are logged, never returned.
pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str);
}

/// Posts through `notify-send` (libnotify).
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let result = Command::new("notify-send")
            .args(["-a", "delta-monitor", "-u", "critical", title, body])
            .output();

        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => crate::log(&format!(
                "notify-send exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            Err(e) => crate::log(&format!("Failed to run notify-send: {}", e)),
        }
    }
}

/// Body text for an alert: summary, time, and the click result if any.
pub fn alert_message(event: &AlertEvent, click: &ClickOutcome) -> String {
    let mut message = format!(
        "{}\nTime: {}",
        event.summary(),
        event.at.format("%H:%M:%S")
    );
    if let Some(line) = click.describe() {
        message.push('\n');
        message.push_str(&line);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Point;
    use chrono::{Local, TimeZone};

    fn event() -> AlertEvent {
        AlertEvent {
            previous: 100.0,
            current: 94.0,
            delta: 6.0,
            at: Local.with_ymd_and_hms(2024, 5, 1, 13, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_alert_message_without_click() {
        assert_eq!(
            alert_message(&event(), &ClickOutcome::NotRequested),
            "Delta reached: previous 100 → current 94 (change: -6)\nTime: 13:04:05"
        );
    }

    #[test]
    fn test_alert_message_with_click() {
        let message = alert_message(&event(), &ClickOutcome::Clicked(Point::new(10, 20)));
        assert!(message.ends_with("\nClicked at (10, 20)"));

        let message = alert_message(
            &event(),
            &ClickOutcome::Failed {
                target: Point::new(10, 20),
                reason: "no display".to_string(),
            },
        );
        assert!(message.ends_with("\nClick at (10, 20) was requested but did not execute: no display"));
    }
}
