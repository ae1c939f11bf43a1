//! GUI module for the application.
//!
//! Provides the control surface using egui/eframe: settings, start/stop,
//! the readings list, alert dialog, and the region/click pickers.

pub mod render;
pub mod state;

use std::sync::mpsc::Receiver;
use std::time::Duration;

use eframe::egui::{self, Vec2, ViewportCommand};

use crate::monitor::{
    create_event_queue, Backends, DeltaMonitor, MonitorConfig, MonitorEvent, SessionState,
};
use crate::ocr::TesseractPaths;
use crate::selector::{self, overlay, PendingCapture, PickResult, PickTarget, PickerSession};

use render::GuiAction;
use state::{GuiState, MonitorStatus, ProbeView};

/// Main GUI application struct.
pub struct GuiApp {
    /// Application state.
    state: GuiState,
    monitor: DeltaMonitor,
    /// Events from the monitor thread, drained every frame.
    events: Receiver<MonitorEvent>,
    /// Display capture in progress for a pick.
    pending_capture: Option<PendingCapture>,
    /// Open fullscreen picker.
    picker: Option<PickerSession>,
}

impl GuiApp {
    /// Create a new GUI application instance.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: MonitorConfig,
        tesseract: TesseractPaths,
    ) -> Self {
        let (sender, receiver) = create_event_queue();
        let monitor =
            DeltaMonitor::new(config.clone(), Backends::system(tesseract)).with_events(sender);

        Self {
            state: GuiState::new(config),
            monitor,
            events: receiver,
            pending_capture: None,
            picker: None,
        }
    }

    /// Apply events from the monitor thread and detect a vanished worker.
    fn update_monitor_status(&mut self) {
        // Read before draining: the worker sends `Stopped` before it clears the flag
        let idle = self.monitor.state() == SessionState::Idle;

        while let Ok(event) = self.events.try_recv() {
            self.state.apply_event(event);
        }

        if idle && self.state.status.is_running() {
            self.state.status =
                MonitorStatus::Error("Monitoring thread ended unexpectedly".to_string());
        }
    }

    /// Handle start button click.
    fn handle_start(&mut self) {
        if let Err(msg) = self.state.apply_settings() {
            self.state.status = MonitorStatus::Error(msg);
            return;
        }

        self.monitor.set_config(self.state.config.clone());
        match self.monitor.start() {
            Ok(()) => {
                self.state.status = MonitorStatus::Monitoring;
                crate::log("GUI: Started monitoring");
                self.save_config();
            }
            Err(e) => {
                crate::log(&format!("GUI: Failed to start monitoring: {}", e));
                self.state.status = MonitorStatus::Error(e.to_string());
            }
        }
    }

    /// Handle stop button click.
    fn handle_stop(&mut self) {
        self.monitor.stop();
        crate::log("GUI: Requested monitoring stop");
    }

    /// Handle test region button click.
    fn handle_test_region(&mut self) {
        let Some(region) = self.state.config.region else {
            return;
        };

        self.state.probe = Some(match self.monitor.probe(&region) {
            Ok(report) => ProbeView::Report(report),
            Err(e) => {
                crate::log(&format!("GUI: Test region failed: {:#}", e));
                ProbeView::Failed(format!("{:#}", e))
            }
        });
    }

    /// Hide the window and capture the display for a pick.
    fn begin_pick(&mut self, ctx: &egui::Context, target: PickTarget) {
        crate::log(&format!("GUI: Picking {:?}", target));
        ctx.send_viewport_cmd(ViewportCommand::Minimized(true));
        self.pending_capture = Some(selector::begin_capture(ctx, target));
    }

    /// Open the picker once the display capture has finished.
    fn poll_capture(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_capture else {
            return;
        };

        let Some(result) = pending.poll() else {
            ctx.request_repaint_after(Duration::from_millis(50));
            return;
        };
        self.pending_capture = None;

        ctx.send_viewport_cmd(ViewportCommand::Minimized(false));
        match result {
            Ok(session) => {
                ctx.send_viewport_cmd(ViewportCommand::Decorations(false));
                ctx.send_viewport_cmd(ViewportCommand::Fullscreen(true));
                ctx.send_viewport_cmd(ViewportCommand::Focus);
                self.picker = Some(session);
            }
            Err(e) => {
                crate::log(&format!("GUI: Screen capture failed: {}", e));
                self.state.status = MonitorStatus::Error(format!("Screen capture failed: {}", e));
            }
        }
    }

    /// Restore the window and store the picked value.
    fn finish_pick(&mut self, ctx: &egui::Context, result: PickResult) {
        self.picker = None;
        ctx.send_viewport_cmd(ViewportCommand::Fullscreen(false));
        ctx.send_viewport_cmd(ViewportCommand::Decorations(true));

        match result {
            PickResult::Region(region) => {
                crate::log(&format!("GUI: Region selected: {}", region));
                self.state.config.region = Some(region);
            }
            PickResult::Point(point) => {
                crate::log(&format!("GUI: Click position selected: {}", point));
                self.state.config.click_target = Some(point);
            }
            PickResult::Cancelled => {
                crate::log("GUI: Pick cancelled");
                return;
            }
        }
        self.save_config();
    }

    fn save_config(&self) {
        if let Err(e) = self.state.config.save() {
            crate::log(&format!("GUI: Failed to save config: {:#}", e));
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_monitor_status();
        self.poll_capture(ctx);

        if let Some(picker) = &mut self.picker {
            if let Some(result) = overlay::show(ctx, picker) {
                self.finish_pick(ctx, result);
            }
            return;
        }

        if self.pending_capture.is_some() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.label("Capturing screen...");
            });
            return;
        }

        // Request repaint while monitoring (for readings and alerts)
        if self.state.status.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Delta Monitor");
            ui.add_space(16.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                actions.extend(render::render_settings(ui, &mut self.state));
                actions.extend(render::render_on_delta(ui, &mut self.state));
                actions.extend(render::render_controls(ui, &self.state));
                render::render_status(ui, &self.state);
                render::render_readings(ui, &self.state);
            });
        });

        render::render_alert(ctx, &mut self.state);
        render::render_probe(ctx, &mut self.state);

        for action in actions {
            match action {
                GuiAction::SelectRegion => self.begin_pick(ctx, PickTarget::Region),
                GuiAction::SelectClickPoint => self.begin_pick(ctx, PickTarget::ClickPoint),
                GuiAction::TestRegion => self.handle_test_region(),
                GuiAction::Start => self.handle_start(),
                GuiAction::Stop => self.handle_stop(),
            }
        }
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(config: MonitorConfig, tesseract: TesseractPaths) -> eframe::Result<()> {
    crate::log("GUI: Creating native options...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(460.0, 640.0))
            .with_min_inner_size(Vec2::new(380.0, 480.0))
            .with_title("Delta Monitor")
            .with_icon(window_icon()),
        ..Default::default()
    };

    crate::log("GUI: Calling eframe::run_native...");

    eframe::run_native(
        "Delta Monitor",
        options,
        Box::new(move |cc| {
            crate::log("GUI: Creating GuiApp instance...");
            Ok(Box::new(GuiApp::new(cc, config, tesseract)))
        }),
    )
}

/// Shows a fatal startup error in a small window and returns once it is closed.
pub fn show_startup_error(error: &anyhow::Error) -> eframe::Result<()> {
    let message = state::startup_error_text(error);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(440.0, 180.0))
            .with_resizable(false)
            .with_title("Delta Monitor")
            .with_icon(window_icon()),
        ..Default::default()
    };

    eframe::run_simple_native("Delta Monitor", options, move |ctx, _frame| {
        egui::CentralPanel::default().show(ctx, |ui| {
            if render::render_startup_error(ui, &message) {
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        });
    })
}

fn window_icon() -> egui::IconData {
    let icon = crate::desktop::icon_image();
    let (width, height) = icon.dimensions();
    egui::IconData {
        rgba: icon.into_raw(),
        width,
        height,
    }
}
