//! Delta monitoring core.
//!
//! This module provides:
//! - Session configuration and validation (`MonitorConfig`)
//! - The sticky-baseline compare step (`MonitorState`)
//! - The polling loop on a worker thread (`DeltaMonitor`)
//! - Alert side effects: desktop notification and xdotool click

pub mod config;
pub mod error;
pub mod input;
pub mod notify;
pub mod queue;
pub mod runner;
pub mod state;

pub use config::MonitorConfig;
pub use notify::alert_message;
pub use queue::{create_event_queue, MonitorEvent, StopReason};
pub use runner::{Backends, DeltaMonitor};
pub use state::SessionState;
