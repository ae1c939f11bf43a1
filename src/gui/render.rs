//! GUI rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText};

use super::state::{GuiState, MonitorStatus, ProbeView};

/// Button actions handled by the app after rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiAction {
    SelectRegion,
    TestRegion,
    SelectClickPoint,
    Start,
    Stop,
}

/// Render the interval/delta fields and region buttons.
pub fn render_settings(ui: &mut egui::Ui, state: &mut GuiState) -> Option<GuiAction> {
    let mut action = None;
    let editable = !state.status.is_running();

    ui.heading("Settings");
    ui.add_space(8.0);

    ui.add_enabled_ui(editable, |ui| {
        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Interval (seconds):");
                ui.add(egui::TextEdit::singleline(&mut state.interval_text).desired_width(80.0));
                ui.end_row();

                ui.label("Delta:");
                ui.add(egui::TextEdit::singleline(&mut state.delta_text).desired_width(80.0));
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.label(state.region_text());

        ui.horizontal(|ui| {
            if ui.button("Select region").clicked() {
                action = Some(GuiAction::SelectRegion);
            }
            ui.add_enabled_ui(state.config.region.is_some(), |ui| {
                if ui.button("Test region").clicked() {
                    action = Some(GuiAction::TestRegion);
                }
            });
        });
    });

    action
}

/// Render the click and stop-after-alert options.
pub fn render_on_delta(ui: &mut egui::Ui, state: &mut GuiState) -> Option<GuiAction> {
    let mut action = None;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.heading("On delta");
    ui.add_space(8.0);

    ui.add_enabled_ui(!state.status.is_running(), |ui| {
        ui.checkbox(&mut state.config.click_on_alert, "Click at position");
        ui.horizontal(|ui| {
            if ui.button("Select click position").clicked() {
                action = Some(GuiAction::SelectClickPoint);
            }
            ui.label(state.click_text());
        });
        ui.checkbox(&mut state.config.stop_on_alert, "Stop after alert");
    });

    action
}

/// Render the start/stop buttons.
pub fn render_controls(ui: &mut egui::Ui, state: &GuiState) -> Option<GuiAction> {
    let mut action = None;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let is_running = state.status.is_running();

        ui.add_enabled_ui(!is_running, |ui| {
            if ui.button(RichText::new("▶ Start").size(16.0)).clicked() {
                action = Some(GuiAction::Start);
            }
        });

        ui.add_space(20.0);

        ui.add_enabled_ui(is_running, |ui| {
            if ui.button(RichText::new("◼ Stop").size(16.0)).clicked() {
                action = Some(GuiAction::Stop);
            }
        });
    });

    action
}

/// Render the status line.
pub fn render_status(ui: &mut egui::Ui, state: &GuiState) {
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Status:");

        let status_color = match &state.status {
            MonitorStatus::Idle => Color32::GRAY,
            MonitorStatus::Monitoring => Color32::from_rgb(0, 120, 200),
            MonitorStatus::StoppedByUser => Color32::from_rgb(200, 150, 0),
            MonitorStatus::StoppedByAlert => Color32::from_rgb(0, 150, 0),
            MonitorStatus::Error(_) => Color32::from_rgb(200, 0, 0),
        };

        ui.label(RichText::new(state.status.status_text()).color(status_color));
    });
}

/// Render the recent readings list, newest at the bottom.
pub fn render_readings(ui: &mut egui::Ui, state: &GuiState) {
    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("Readings").strong());

    egui::ScrollArea::vertical()
        .id_salt("readings")
        .max_height(220.0)
        .stick_to_bottom(true)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for line in &state.readings {
                ui.monospace(line);
            }
        });
}

/// Render the alert dialog while one is open.
pub fn render_alert(ctx: &egui::Context, state: &mut GuiState) {
    let Some(message) = &state.alert else {
        return;
    };

    let mut close = false;
    egui::Window::new("Delta alert")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(message).size(15.0));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                close = true;
            }
        });

    if close {
        state.alert = None;
    }
}

/// Render the test-region result window.
pub fn render_probe(ctx: &egui::Context, state: &mut GuiState) {
    let Some(probe) = &state.probe else {
        return;
    };

    let mut open = true;
    egui::Window::new("Test region")
        .collapsible(false)
        .open(&mut open)
        .show(ctx, |ui| match probe {
            ProbeView::Report(report) => {
                ui.label("OCR text:");
                ui.monospace(&report.raw_text);
                ui.add_space(4.0);
                match report.value {
                    Some(value) => ui.label(format!("Parsed number: {}", value)),
                    None => ui.label("Parsed number: (none)"),
                };
                ui.add_space(4.0);
                ui.label(format!("Saved {}", report.capture_path.display()));
                ui.label(format!("Saved {}", report.preprocessed_path.display()));
            }
            ProbeView::Failed(msg) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(200, 0, 0)));
            }
        });

    if !open {
        state.probe = None;
    }
}

/// Fatal startup error with a Close button. Returns true when Close is clicked.
pub fn render_startup_error(ui: &mut egui::Ui, message: &str) -> bool {
    ui.label(
        RichText::new("Delta Monitor cannot start")
            .strong()
            .color(Color32::from_rgb(200, 0, 0)),
    );
    ui.add_space(8.0);
    ui.label(message);
    ui.add_space(12.0);
    ui.button("Close").clicked()
}
