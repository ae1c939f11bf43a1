//! Mouse input simulation for the alert click.
//!
//! Clicks are sent through `xdotool`, which injects synthetic X11 input at
//! absolute screen coordinates. This moves the real cursor.

use std::process::Command;

use crate::capture::Point;
use crate::monitor::error::ClickError;

/// Moves the pointer and performs one left click.
pub trait InputSimulator: Send {
    fn move_and_click(&self, target: Point) -> Result<(), ClickError>;
}

/// `xdotool mousemove --sync X Y click 1`
#[derive(Clone, Debug)]
pub struct XdotoolInput {
    program: String,
}

impl Default for XdotoolInput {
    fn default() -> Self {
        Self::new()
    }
}

impl XdotoolInput {
    pub fn new() -> Self {
        Self {
            program: "xdotool".to_string(),
        }
    }

    /// Builds the argument list for a click at `target`.
    pub fn click_args(target: Point) -> Vec<String> {
        vec![
            "mousemove".to_string(),
            "--sync".to_string(),
            target.x.to_string(),
            target.y.to_string(),
            "click".to_string(),
            "1".to_string(),
        ]
    }
}

impl InputSimulator for XdotoolInput {
    fn move_and_click(&self, target: Point) -> Result<(), ClickError> {
        crate::log(&format!("Clicking at {}", target));

        let output = Command::new(&self.program)
            .args(Self::click_args(target))
            .output()
            .map_err(|e| ClickError {
                target,
                reason: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClickError {
                target,
                reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_args() {
        assert_eq!(
            XdotoolInput::click_args(Point::new(640, -20)),
            vec!["mousemove", "--sync", "640", "-20", "click", "1"]
        );
    }

    #[test]
    fn test_missing_program_reports_click_error() {
        let input = XdotoolInput {
            program: "delta-monitor-no-such-program".to_string(),
        };

        let err = input.move_and_click(Point::new(1, 2)).unwrap_err();

        assert_eq!(err.target, Point::new(1, 2));
        assert!(err.reason.contains("failed to run"));
    }
}
