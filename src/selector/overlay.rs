//! Fullscreen picker drawn over the frozen screenshot.

use eframe::egui::{
    self, pos2, Align2, Color32, ColorImage, FontId, Key, Rect, Sense, Stroke, TextureOptions,
};

use super::coords::ScreenMapping;
use super::state::{PickResult, PickTarget, PickerSession};

const SELECTION_COLOR: Color32 = Color32::from_rgb(255, 60, 60);

/// Draws the picker and handles pointer input for one frame.
///
/// Returns a result once the user finishes or cancels.
pub fn show(ctx: &egui::Context, session: &mut PickerSession) -> Option<PickResult> {
    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return Some(PickResult::Cancelled);
    }

    if session.texture.is_none() {
        let image = &session.snapshot.image;
        let size = [image.width() as usize, image.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        session.texture =
            Some(ctx.load_texture("picker_snapshot", color_image, TextureOptions::LINEAR));
    }
    let texture_id = session.texture.as_ref().map(|t| t.id());

    let mut result = None;

    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let view = ui.max_rect();
            let response = ui.allocate_rect(view, Sense::click_and_drag());
            let painter = ui.painter_at(view);
            let mapping = ScreenMapping::new(view, session.snapshot.display);

            if let Some(texture_id) = texture_id {
                painter.image(
                    texture_id,
                    view,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            painter.rect_filled(view, 0.0, Color32::from_black_alpha(60));

            let pointer = response
                .interact_pointer_pos()
                .or_else(|| ctx.input(|i| i.pointer.latest_pos()));
            if let Some(pos) = pointer {
                if response.drag_started() {
                    // Drag is detected a few pixels after the press
                    let origin = ctx.input(|i| i.pointer.press_origin()).unwrap_or(pos);
                    session.press(origin);
                    session.drag(pos);
                } else if response.dragged() {
                    session.drag(pos);
                }

                if response.drag_stopped() {
                    result = session.release(pos, &mapping);
                } else if response.clicked() && session.target == PickTarget::ClickPoint {
                    result = session.release(pos, &mapping);
                }
            }

            if let Some((start, current)) = session.drag_rect() {
                let selection = Rect::from_two_pos(start, current);
                painter.rect_filled(selection, 0.0, Color32::from_white_alpha(30));
                painter.rect_stroke(selection, 0.0, Stroke::new(2.0, SELECTION_COLOR));
            }

            if session.target == PickTarget::ClickPoint {
                if let Some(pos) = response.hover_pos() {
                    painter.circle_stroke(pos, 8.0, Stroke::new(2.0, SELECTION_COLOR));
                    painter.text(
                        pos + egui::vec2(12.0, 12.0),
                        Align2::LEFT_TOP,
                        mapping.to_screen(pos).to_string(),
                        FontId::proportional(14.0),
                        Color32::WHITE,
                    );
                }
            }

            let galley =
                painter.layout_no_wrap(session.hint(), FontId::proportional(20.0), Color32::WHITE);
            let hint_rect = Align2::CENTER_TOP
                .anchor_size(pos2(view.center().x, view.top() + 24.0), galley.size());
            painter.rect_filled(hint_rect.expand(8.0), 4.0, Color32::from_black_alpha(160));
            painter.galley(hint_rect.min, galley, Color32::WHITE);
        });

    result
}
