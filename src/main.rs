//! Delta Monitor
//!
//! An X11 desktop tool that reads a number from a fixed screen region with
//! Tesseract OCR and alerts (optionally clicking a position) when the value
//! moves by at least a configured delta.

mod capture;
mod desktop;
mod gui;
mod monitor;
mod ocr;
mod paths;
mod selector;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

const LOG_FILE_NAME: &str = "delta-monitor.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    // Ensure output directories exist
    paths::ensure_directories()?;

    log("Delta Monitor starting");

    let icon = desktop::ensure_icon()
        .map_err(|e| log(&format!("Warning: Failed to create icon: {:#}", e)))
        .ok();
    if let Err(e) = desktop::install_desktop_entry(icon.as_deref()) {
        log(&format!("Warning: Failed to install desktop entry: {:#}", e));
    }

    // Without Tesseract no reading can ever be produced
    let tesseract = match ocr::ensure_tesseract() {
        Ok(paths) => paths,
        Err(e) => {
            log(&format!("{:#}", e));
            // Menu launches have no terminal
            if let Err(gui_error) = gui::show_startup_error(&e) {
                log(&format!("Failed to show startup error: {}", gui_error));
            }
            return Err(e);
        }
    };

    let config = monitor::MonitorConfig::load_or_default();

    log("Starting GUI application...");
    match gui::run_gui(config, tesseract) {
        Ok(()) => {
            log("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            log(&format!("GUI error: {}", e));
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
