//! Monitor runner: the polling loop and its session lifecycle.
//!
//! `Monitor` owns one session's state and performs ticks. `DeltaMonitor`
//! wraps it for the GUI: `start()` validates the configuration and spawns
//! the loop on a worker thread, `stop()` sets a flag checked between ticks.

use anyhow::{anyhow, Result};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::capture::{FrameCapturer, Region, ScreenCapturer};
use crate::monitor::config::{MonitorConfig, SessionConfig};
use crate::monitor::error::{ConfigError, TickError};
use crate::monitor::input::{InputSimulator, XdotoolInput};
use crate::monitor::notify::{alert_message, DesktopNotifier, Notifier, ALERT_TITLE};
use crate::monitor::queue::{ClickOutcome, MonitorEvent, StopReason};
use crate::monitor::state::{AlertEvent, Decision, MonitorState, Reading, SessionState};
use crate::ocr::{
    parse_value, probe_region, ProbeReport, TesseractPaths, TesseractRecognizer, TextRecognizer,
};

/// Longest uninterrupted sleep while waiting for the next tick.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// External capabilities used by a session.
pub struct Backends {
    pub capturer: Box<dyn FrameCapturer>,
    pub recognizer: Box<dyn TextRecognizer>,
    pub input: Box<dyn InputSimulator>,
    pub notifier: Box<dyn Notifier>,
}

impl Backends {
    /// xcap capture, Tesseract recognition, xdotool clicks and notify-send.
    pub fn system(tesseract: TesseractPaths) -> Self {
        Self {
            capturer: Box::new(ScreenCapturer::new()),
            recognizer: Box::new(TesseractRecognizer::new(tesseract)),
            input: Box::new(XdotoolInput::new()),
            notifier: Box::new(DesktopNotifier),
        }
    }
}

/// Thread-safe stop request shared between the GUI and the loop.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to exit before its next tick. Idempotent.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Sleeps until `deadline`, waking early if stop is requested.
    ///
    /// `None` waits until stopped. Returns true if stop was requested.
    pub fn wait_until(&self, deadline: Option<Instant>) -> bool {
        loop {
            if self.is_stopped() {
                return true;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    (deadline - now).min(WAIT_SLICE)
                }
                None => WAIT_SLICE,
            };
            thread::sleep(slice);
        }
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Capture or recognition failed; nothing changed
    Skipped(TickError),
    /// Text contained no number; nothing changed
    NoValue(Reading),
    /// First value of the session
    Baseline(Reading),
    /// Below threshold
    Steady(Reading),
    Alert {
        reading: Reading,
        event: AlertEvent,
        click: ClickOutcome,
    },
}

/// One monitoring session. Owns the state; nothing else mutates it.
pub struct Monitor {
    session: SessionConfig,
    state: MonitorState,
    backends: Backends,
    events: Option<Sender<MonitorEvent>>,
}

impl Monitor {
    pub fn new(session: SessionConfig, backends: Backends) -> Self {
        let state = MonitorState::new(session.delta_threshold, session.interval);
        Self {
            session,
            state,
            backends,
            events: None,
        }
    }

    /// Reports progress to `sender` in addition to the log.
    pub fn with_events(mut self, sender: Sender<MonitorEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Capture, recognize, parse, compare, and fire side effects if needed.
    ///
    /// Never fails: per-tick errors become `TickOutcome::Skipped`.
    pub fn tick(&mut self) -> TickOutcome {
        let at = Local::now();

        let frame = match self.backends.capturer.capture(&self.session.region) {
            Ok(frame) => frame,
            Err(e) => return self.skip(at, e.into()),
        };

        let raw_text = match self.backends.recognizer.recognize(&frame) {
            Ok(text) => text,
            Err(e) => return self.skip(at, e.into()),
        };

        let reading = Reading {
            at,
            value: parse_value(&raw_text),
            raw_text,
        };
        self.emit(MonitorEvent::Reading(reading.clone()));

        let Some(value) = reading.value else {
            crate::log(&format!("No number in OCR text {:?}", reading.raw_text.trim()));
            return TickOutcome::NoValue(reading);
        };

        match self.state.observe(value, at) {
            Decision::Baseline(value) => {
                crate::log(&format!("Baseline value: {}", value));
                TickOutcome::Baseline(reading)
            }
            Decision::Steady {
                observed,
                baseline,
                delta,
            } => {
                crate::log(&format!(
                    "Value {} (last accepted {}, delta {})",
                    observed, baseline, delta
                ));
                TickOutcome::Steady(reading)
            }
            Decision::Alert(event) => {
                let click = self.fire_alert(&event);
                self.state.take_pending_alert();
                self.emit(MonitorEvent::Alert {
                    event: event.clone(),
                    click: click.clone(),
                });
                TickOutcome::Alert {
                    reading,
                    event,
                    click,
                }
            }
        }
    }

    /// Runs ticks until stopped, then hands the backends back.
    ///
    /// Each tick starts `interval` after the previous one started; a tick
    /// that overruns is followed immediately by the next.
    pub fn run(mut self, stop: &StopSignal) -> Backends {
        crate::log(&format!(
            "Monitoring {} every {:?} (delta {})",
            self.session.region,
            self.state.interval(),
            self.state.delta_threshold()
        ));

        let reason = loop {
            if stop.is_stopped() {
                break StopReason::Requested;
            }

            let tick_start = Instant::now();
            let outcome = self.tick();

            if self.session.stop_on_alert && matches!(outcome, TickOutcome::Alert { .. }) {
                break StopReason::AlertFired;
            }

            let deadline = tick_start.checked_add(self.session.interval);
            if stop.wait_until(deadline) {
                break StopReason::Requested;
            }
        };

        let last = match self.state().last_accepted() {
            Some(value) => value.to_string(),
            None => "none".to_string(),
        };
        match reason {
            StopReason::Requested => {
                crate::log(&format!("Monitoring stopped by user (last accepted {})", last))
            }
            StopReason::AlertFired => {
                crate::log(&format!("Monitoring stopped after alert (last accepted {})", last))
            }
        }
        self.emit(MonitorEvent::Stopped(reason));
        self.backends
    }

    fn skip(&self, at: chrono::DateTime<Local>, error: TickError) -> TickOutcome {
        crate::log(&format!("Tick skipped: {}", error));
        self.emit(MonitorEvent::Skipped {
            at,
            reason: error.to_string(),
        });
        TickOutcome::Skipped(error)
    }

    /// Optional click first, then the notification reporting its outcome.
    fn fire_alert(&self, event: &AlertEvent) -> ClickOutcome {
        crate::log(&format!("ALERT: {}", event.summary()));

        let click = match self.session.click_target {
            None => ClickOutcome::NotRequested,
            Some(target) => match self.backends.input.move_and_click(target) {
                Ok(()) => ClickOutcome::Clicked(target),
                Err(e) => {
                    crate::log(&format!("Alert click at {} failed: {}", e.target, e.reason));
                    ClickOutcome::Failed {
                        target,
                        reason: e.reason,
                    }
                }
            },
        };

        self.backends
            .notifier
            .notify(ALERT_TITLE, &alert_message(event, &click));
        click
    }

    fn emit(&self, event: MonitorEvent) {
        if let Some(sender) = &self.events {
            // GUI may already be gone
            let _ = sender.send(event);
        }
    }
}

/// Clears the polling flag when the worker exits, including by panic.
struct PollingGuard(Arc<AtomicBool>);

impl Drop for PollingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Session lifecycle used by the GUI: `Idle` → `Polling` → `Idle`.
pub struct DeltaMonitor {
    config: MonitorConfig,
    /// Present while idle; moved into the worker while polling
    backends: Option<Backends>,
    stop: StopSignal,
    polling: Arc<AtomicBool>,
    worker: Option<JoinHandle<Backends>>,
    events: Option<Sender<MonitorEvent>>,
}

impl DeltaMonitor {
    pub fn new(config: MonitorConfig, backends: Backends) -> Self {
        Self {
            config,
            backends: Some(backends),
            stop: StopSignal::new(),
            polling: Arc::new(AtomicBool::new(false)),
            worker: None,
            events: None,
        }
    }

    /// Reports progress of every session to `sender`.
    pub fn with_events(mut self, sender: Sender<MonitorEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Replaces the configuration used by the next `start()`.
    pub fn set_config(&mut self, config: MonitorConfig) {
        self.config = config;
    }

    pub fn state(&self) -> SessionState {
        if self.polling.load(Ordering::SeqCst) {
            SessionState::Polling
        } else {
            SessionState::Idle
        }
    }

    /// Validates the configuration and starts polling on a worker thread.
    ///
    /// Configuration errors are returned before any tick runs.
    pub fn start(&mut self) -> Result<(), ConfigError> {
        if self.state() == SessionState::Polling {
            return Err(ConfigError::AlreadyRunning);
        }
        self.join();

        let session = self.config.validate()?;
        let backends = self.backends.take().ok_or(ConfigError::WorkerLost)?;

        match backends.capturer.display_bounds() {
            Ok(display) if !display.contains(&session.region) => {
                self.backends = Some(backends);
                return Err(ConfigError::RegionOutOfBounds {
                    region: session.region,
                    display,
                });
            }
            Ok(display) => {
                if let Some(target) = session.click_target {
                    if !display.contains_point(target) {
                        crate::log(&format!(
                            "Warning: click position {} is outside the primary display {}",
                            target, display
                        ));
                    }
                }
            }
            // The loop skips ticks until the display comes back
            Err(e) => crate::log(&format!("Could not check display bounds: {}", e)),
        }

        let mut monitor = Monitor::new(session, backends);
        if let Some(sender) = &self.events {
            monitor = monitor.with_events(sender.clone());
        }

        self.stop.reset();
        self.polling.store(true, Ordering::SeqCst);

        let stop = self.stop.clone();
        let guard = PollingGuard(self.polling.clone());
        self.worker = Some(thread::spawn(move || {
            let _guard = guard;
            let backends = monitor.run(&stop);
            crate::log("Monitor thread finished");
            backends
        }));

        Ok(())
    }

    /// Asks the loop to exit after the in-flight tick. Does not block.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Waits for the worker to exit and reclaims the backends.
    pub fn join(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        match handle.join() {
            Ok(backends) => self.backends = Some(backends),
            Err(e) => crate::log(&format!("Monitor thread panicked: {:?}", e)),
        }
    }

    /// One-off capture and OCR of `region`, saving debug images.
    ///
    /// Only available while idle, since the worker owns the backends.
    pub fn probe(&mut self, region: &Region) -> Result<ProbeReport> {
        if self.state() == SessionState::Polling {
            return Err(anyhow!("Stop monitoring before testing the region"));
        }
        self.join();

        let backends = self
            .backends
            .as_ref()
            .ok_or_else(|| anyhow!(ConfigError::WorkerLost))?;
        probe_region(
            backends.capturer.as_ref(),
            backends.recognizer.as_ref(),
            region,
            &crate::paths::get_debug_dir(),
        )
    }
}

impl Drop for DeltaMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Point;
    use crate::monitor::error::{CaptureError, ClickError, RecognitionError};
    use crate::monitor::queue::create_event_queue;
    use image::{Rgba, RgbaImage};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::Receiver;
    use std::sync::Mutex;

    /// Succeeds except on the listed 1-based call numbers.
    struct FakeCapturer {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
        display: Region,
    }

    impl FakeCapturer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Vec::new(),
                display: Region::new(0, 0, 1920, 1080),
            }
        }
    }

    impl FrameCapturer for FakeCapturer {
        fn display_bounds(&self) -> Result<Region, CaptureError> {
            Ok(self.display)
        }

        fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on.contains(&call) {
                return Err(CaptureError::DisplayUnavailable("test".to_string()));
            }
            Ok(RgbaImage::from_pixel(region.width, region.height, Rgba([0, 0, 0, 255])))
        }
    }

    /// Returns scripted texts in order, repeating the last one.
    struct ScriptedRecognizer {
        texts: Mutex<VecDeque<String>>,
        last: Mutex<String>,
    }

    impl ScriptedRecognizer {
        fn new(texts: &[&str]) -> Self {
            Self {
                texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
                last: Mutex::new(String::new()),
            }
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&self, _frame: &RgbaImage) -> Result<String, RecognitionError> {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.texts.lock().unwrap().pop_front() {
                *last = next;
            }
            if last.as_str() == "ENGINE_ERROR" {
                return Err(RecognitionError("engine crashed".to_string()));
            }
            Ok(last.clone())
        }
    }

    /// Side effects in the order they happened, shared between fakes.
    type Journal = Arc<Mutex<Vec<String>>>;

    #[derive(Clone, Default)]
    struct RecordingInput {
        clicks: Arc<Mutex<Vec<Point>>>,
        journal: Journal,
        fail: bool,
    }

    impl InputSimulator for RecordingInput {
        fn move_and_click(&self, target: Point) -> Result<(), ClickError> {
            if self.fail {
                return Err(ClickError {
                    target,
                    reason: "simulator unavailable".to_string(),
                });
            }
            self.clicks.lock().unwrap().push(target);
            self.journal.lock().unwrap().push(format!("click {}", target));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
        journal: Journal,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, body: &str) {
            self.messages.lock().unwrap().push(body.to_string());
            self.journal.lock().unwrap().push("notify".to_string());
        }
    }

    fn backends(
        capturer: FakeCapturer,
        texts: &[&str],
        input: RecordingInput,
        notifier: RecordingNotifier,
    ) -> Backends {
        Backends {
            capturer: Box::new(capturer),
            recognizer: Box::new(ScriptedRecognizer::new(texts)),
            input: Box::new(input),
            notifier: Box::new(notifier),
        }
    }

    fn session(threshold: f64) -> SessionConfig {
        SessionConfig {
            region: Region::new(10, 10, 60, 20),
            interval: Duration::from_millis(10),
            delta_threshold: threshold,
            click_target: None,
            stop_on_alert: false,
        }
    }

    fn config() -> MonitorConfig {
        MonitorConfig {
            region: Some(Region::new(10, 10, 60, 20)),
            interval_seconds: 0.01,
            delta_threshold: 5.0,
            ..MonitorConfig::default()
        }
    }

    fn drain(receiver: &Receiver<MonitorEvent>) -> Vec<MonitorEvent> {
        receiver.try_iter().collect()
    }

    #[test]
    fn test_capture_failure_skips_only_that_tick() {
        let capturer = FakeCapturer {
            fail_on: vec![3],
            ..FakeCapturer::new()
        };
        let b = backends(
            capturer,
            &["100", "101", "102", "103"],
            RecordingInput::default(),
            RecordingNotifier::default(),
        );
        let mut monitor = Monitor::new(session(5.0), b);

        let outcomes: Vec<TickOutcome> = (0..5).map(|_| monitor.tick()).collect();

        assert!(matches!(outcomes[0], TickOutcome::Baseline(_)));
        assert!(matches!(outcomes[1], TickOutcome::Steady(_)));
        assert!(matches!(
            outcomes[2],
            TickOutcome::Skipped(TickError::Capture(_))
        ));
        assert!(matches!(outcomes[3], TickOutcome::Steady(_)));
        assert!(matches!(outcomes[4], TickOutcome::Steady(_)));
        assert_eq!(monitor.state().last_accepted(), Some(100.0));
    }

    #[test]
    fn test_unreadable_text_is_no_value() {
        let notifier = RecordingNotifier::default();
        let b = backends(
            FakeCapturer::new(),
            &["100", "Score: ??"],
            RecordingInput::default(),
            notifier.clone(),
        );
        let mut monitor = Monitor::new(session(5.0), b);

        monitor.tick();
        let outcome = monitor.tick();

        let TickOutcome::NoValue(reading) = outcome else {
            panic!("expected no value, got {:?}", outcome);
        };
        assert_eq!(reading.raw_text, "Score: ??");
        assert_eq!(reading.value, None);
        assert_eq!(monitor.state().last_accepted(), Some(100.0));
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_recognition_error_skips_tick() {
        let b = backends(
            FakeCapturer::new(),
            &["100", "ENGINE_ERROR", "200"],
            RecordingInput::default(),
            RecordingNotifier::default(),
        );
        let mut monitor = Monitor::new(session(5.0), b);

        monitor.tick();
        assert!(matches!(
            monitor.tick(),
            TickOutcome::Skipped(TickError::Recognition(_))
        ));
        assert_eq!(monitor.state().last_accepted(), Some(100.0));
        assert!(matches!(monitor.tick(), TickOutcome::Alert { .. }));
    }

    #[test]
    fn test_alert_clicks_then_notifies() {
        let journal = Journal::default();
        let input = RecordingInput {
            journal: journal.clone(),
            ..RecordingInput::default()
        };
        let notifier = RecordingNotifier {
            journal: journal.clone(),
            ..RecordingNotifier::default()
        };
        let b = backends(FakeCapturer::new(), &["100", "106"], input.clone(), notifier.clone());
        let mut s = session(5.0);
        s.click_target = Some(Point::new(300, 400));
        let (sender, receiver) = create_event_queue();
        let mut monitor = Monitor::new(s, b).with_events(sender);

        monitor.tick();
        let outcome = monitor.tick();

        let TickOutcome::Alert { event, click, .. } = outcome else {
            panic!("expected an alert");
        };
        assert_eq!((event.previous, event.current, event.delta), (100.0, 106.0, 6.0));
        assert_eq!(click, ClickOutcome::Clicked(Point::new(300, 400)));
        assert_eq!(*input.clicks.lock().unwrap(), vec![Point::new(300, 400)]);

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("previous 100 → current 106 (change: +6)"));
        assert!(messages[0].ends_with("Clicked at (300, 400)"));
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["click (300, 400)".to_string(), "notify".to_string()]
        );

        assert_eq!(monitor.state.take_pending_alert(), None);
        assert_eq!(monitor.state().last_accepted(), Some(106.0));

        let events = drain(&receiver);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], MonitorEvent::Alert { .. }));
    }

    #[test]
    fn test_click_failure_does_not_stop_monitoring() {
        let notifier = RecordingNotifier::default();
        let input = RecordingInput {
            fail: true,
            ..RecordingInput::default()
        };
        let b = backends(
            FakeCapturer::new(),
            &["100", "110", "111", "130"],
            input,
            notifier.clone(),
        );
        let mut s = session(5.0);
        s.click_target = Some(Point::new(1, 1));
        let mut monitor = Monitor::new(s, b);

        monitor.tick();
        let TickOutcome::Alert { click, .. } = monitor.tick() else {
            panic!("expected an alert");
        };
        assert!(matches!(click, ClickOutcome::Failed { .. }));
        assert!(notifier.messages.lock().unwrap()[0]
            .ends_with("Click at (1, 1) was requested but did not execute: simulator unavailable"));

        assert!(matches!(monitor.tick(), TickOutcome::Steady(_)));
        assert!(matches!(monitor.tick(), TickOutcome::Alert { .. }));
        assert_eq!(monitor.state().last_accepted(), Some(130.0));
    }

    #[test]
    fn test_start_fails_without_click_target() {
        let mut monitor = DeltaMonitor::new(
            MonitorConfig {
                click_on_alert: true,
                ..config()
            },
            backends(
                FakeCapturer::new(),
                &["1"],
                RecordingInput::default(),
                RecordingNotifier::default(),
            ),
        );

        assert_eq!(monitor.start(), Err(ConfigError::MissingClickTarget));
        assert_eq!(monitor.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_fails_when_region_outside_display() {
        let capturer = FakeCapturer {
            display: Region::new(0, 0, 50, 50),
            ..FakeCapturer::new()
        };
        let mut monitor = DeltaMonitor::new(
            config(),
            backends(
                capturer,
                &["1"],
                RecordingInput::default(),
                RecordingNotifier::default(),
            ),
        );

        assert!(matches!(
            monitor.start(),
            Err(ConfigError::RegionOutOfBounds { .. })
        ));
        assert_eq!(monitor.state(), SessionState::Idle);

        // Backends are kept, so a corrected region can start
        let mut fixed = config();
        fixed.region = Some(Region::new(0, 0, 40, 20));
        monitor.set_config(fixed);
        assert!(monitor.start().is_ok());
        monitor.stop();
        monitor.join();
    }

    #[test]
    fn test_start_stop_lifecycle() {
        let (sender, receiver) = create_event_queue();
        let mut monitor = DeltaMonitor::new(
            config(),
            backends(
                FakeCapturer::new(),
                &["5"],
                RecordingInput::default(),
                RecordingNotifier::default(),
            ),
        )
        .with_events(sender);

        assert_eq!(monitor.state(), SessionState::Idle);
        monitor.start().unwrap();
        assert_eq!(monitor.state(), SessionState::Polling);
        assert_eq!(monitor.start(), Err(ConfigError::AlreadyRunning));

        thread::sleep(Duration::from_millis(50));
        monitor.stop();
        monitor.stop();
        monitor.join();

        assert_eq!(monitor.state(), SessionState::Idle);
        let events = drain(&receiver);
        assert!(events.iter().any(|e| matches!(e, MonitorEvent::Reading(_))));
        assert_eq!(
            events.last(),
            Some(&MonitorEvent::Stopped(StopReason::Requested))
        );

        // Restartable after stop
        monitor.start().unwrap();
        monitor.stop();
        monitor.join();
        assert_eq!(monitor.state(), SessionState::Idle);
    }

    #[test]
    fn test_stop_on_alert_ends_session() {
        let (sender, receiver) = create_event_queue();
        let notifier = RecordingNotifier::default();
        let mut monitor = DeltaMonitor::new(
            MonitorConfig {
                stop_on_alert: true,
                ..config()
            },
            backends(
                FakeCapturer::new(),
                &["100", "101", "120"],
                RecordingInput::default(),
                notifier.clone(),
            ),
        )
        .with_events(sender);

        monitor.start().unwrap();
        monitor.join();

        assert_eq!(monitor.state(), SessionState::Idle);
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);
        let events = drain(&receiver);
        assert_eq!(
            events.last(),
            Some(&MonitorEvent::Stopped(StopReason::AlertFired))
        );
    }

    #[test]
    fn test_run_exits_when_stopped_before_first_tick() {
        let stop = StopSignal::new();
        stop.stop();
        let monitor = Monitor::new(
            session(5.0),
            backends(
                FakeCapturer::new(),
                &["1"],
                RecordingInput::default(),
                RecordingNotifier::default(),
            ),
        );

        let (sender, receiver) = create_event_queue();
        monitor.with_events(sender).run(&stop);

        assert_eq!(
            drain(&receiver),
            vec![MonitorEvent::Stopped(StopReason::Requested)]
        );
    }

    /// Takes `delay` per call, records when each call started, and
    /// requests stop after `ticks` calls.
    struct TimedRecognizer {
        delay: Duration,
        ticks: usize,
        starts: Arc<Mutex<Vec<Instant>>>,
        stop: StopSignal,
    }

    impl TextRecognizer for TimedRecognizer {
        fn recognize(&self, _frame: &RgbaImage) -> Result<String, RecognitionError> {
            let mut starts = self.starts.lock().unwrap();
            starts.push(Instant::now());
            if starts.len() >= self.ticks {
                self.stop.stop();
            }
            drop(starts);
            thread::sleep(self.delay);
            Ok("100".to_string())
        }
    }

    /// Gaps between consecutive tick starts.
    fn tick_gaps(interval: Duration, delay: Duration, ticks: usize) -> Vec<Duration> {
        let stop = StopSignal::new();
        let starts = Arc::new(Mutex::new(Vec::new()));
        let backends = Backends {
            capturer: Box::new(FakeCapturer::new()),
            recognizer: Box::new(TimedRecognizer {
                delay,
                ticks,
                starts: starts.clone(),
                stop: stop.clone(),
            }),
            input: Box::new(RecordingInput::default()),
            notifier: Box::new(RecordingNotifier::default()),
        };
        let mut s = session(5.0);
        s.interval = interval;

        Monitor::new(s, backends).run(&stop);

        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), ticks);
        starts.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[test]
    fn test_ticks_are_spaced_from_tick_start() {
        // 60 ms of work inside a 100 ms interval: next tick 100 ms after the
        // previous one started, not 160 ms.
        let gaps = tick_gaps(Duration::from_millis(100), Duration::from_millis(60), 4);

        for gap in gaps {
            assert!(gap >= Duration::from_millis(95), "gap {:?}", gap);
            assert!(gap < Duration::from_millis(150), "gap {:?}", gap);
        }
    }

    #[test]
    fn test_overrunning_tick_is_followed_immediately() {
        // Work takes 100 ms with a 30 ms interval: no extra wait between ticks.
        let gaps = tick_gaps(Duration::from_millis(30), Duration::from_millis(100), 3);

        for gap in gaps {
            assert!(gap >= Duration::from_millis(100), "gap {:?}", gap);
            assert!(gap < Duration::from_millis(125), "gap {:?}", gap);
        }
    }

    #[test]
    fn test_wait_until_deadline_and_stop() {
        let stop = StopSignal::new();

        let started = Instant::now();
        assert!(!stop.wait_until(Some(started + Duration::from_millis(20))));
        assert!(started.elapsed() >= Duration::from_millis(20));

        let remote = stop.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.stop();
        });
        let started = Instant::now();
        assert!(stop.wait_until(Some(started + Duration::from_secs(30))));
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();

        stop.reset();
        assert!(!stop.is_stopped());
    }
}
