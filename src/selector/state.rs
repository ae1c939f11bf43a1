//! Picker state: what is being picked and the drag in progress.

use eframe::egui::{Pos2, TextureHandle};

use super::coords::ScreenMapping;
use crate::capture::{DisplaySnapshot, Point, Region};

/// What the user is picking on the frozen screenshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickTarget {
    /// Drag a rectangle around the number to monitor
    Region,
    /// Click the position to click on alert
    ClickPoint,
}

impl PickTarget {
    /// Instruction shown at the top of the picker.
    pub fn instructions(&self) -> &'static str {
        match self {
            PickTarget::Region => "Drag a rectangle around the number. Esc to cancel.",
            PickTarget::ClickPoint => "Click the position to click on delta. Esc to cancel.",
        }
    }
}

/// Outcome of a pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickResult {
    Region(Region),
    Point(Point),
    Cancelled,
}

/// An open picker over a frozen screenshot.
pub struct PickerSession {
    pub target: PickTarget,
    pub snapshot: DisplaySnapshot,
    /// Uploaded on the first frame the picker is shown
    pub texture: Option<TextureHandle>,
    drag_start: Option<Pos2>,
    drag_current: Option<Pos2>,
    /// Set after a too-small selection was rejected
    rejected: bool,
}

impl PickerSession {
    pub fn new(target: PickTarget, snapshot: DisplaySnapshot) -> Self {
        Self {
            target,
            snapshot,
            texture: None,
            drag_start: None,
            drag_current: None,
            rejected: false,
        }
    }

    pub fn press(&mut self, pos: Pos2) {
        self.drag_start = Some(pos);
        self.drag_current = Some(pos);
        self.rejected = false;
    }

    pub fn drag(&mut self, pos: Pos2) {
        if self.drag_start.is_some() {
            self.drag_current = Some(pos);
        }
    }

    /// Finishes a press or drag. Returns the pick, or `None` to keep picking.
    pub fn release(&mut self, pos: Pos2, mapping: &ScreenMapping) -> Option<PickResult> {
        match self.target {
            PickTarget::ClickPoint => {
                self.reset_drag();
                Some(PickResult::Point(mapping.to_screen(pos)))
            }
            PickTarget::Region => {
                let start = self.drag_start?;
                self.reset_drag();
                match mapping.region_between(start, pos) {
                    Some(region) => Some(PickResult::Region(region)),
                    None => {
                        self.rejected = true;
                        None
                    }
                }
            }
        }
    }

    /// Current drag rectangle in view coordinates, for drawing.
    pub fn drag_rect(&self) -> Option<(Pos2, Pos2)> {
        Some((self.drag_start?, self.drag_current?))
    }

    /// Text shown at the top of the picker.
    pub fn hint(&self) -> String {
        if self.rejected {
            format!(
                "Selection too small (minimum {0}×{0} px). {1}",
                super::coords::MIN_SELECTION,
                self.target.instructions()
            )
        } else {
            self.target.instructions().to_string()
        }
    }

    fn reset_drag(&mut self) {
        self.drag_start = None;
        self.drag_current = None;
    }
}
