//! Coordinate conversion between the picker view and the screen.
//!
//! The frozen screenshot is drawn scaled into the picker window; pointer
//! positions are mapped back to absolute screen pixels here.

use eframe::egui::{pos2, Pos2, Rect};

use crate::capture::{Point, Region};

/// Smallest accepted selection, in screen pixels per side.
pub const MIN_SELECTION: u32 = 5;

/// Maps between a view rectangle and the display it shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenMapping {
    view: Rect,
    display: Region,
}

impl ScreenMapping {
    pub fn new(view: Rect, display: Region) -> Self {
        Self { view, display }
    }

    fn scale(&self) -> (f32, f32) {
        let sx = if self.view.width() > 0.0 {
            self.display.width as f32 / self.view.width()
        } else {
            1.0
        };
        let sy = if self.view.height() > 0.0 {
            self.display.height as f32 / self.view.height()
        } else {
            1.0
        };
        (sx, sy)
    }

    /// Converts a view position to a screen pixel, clamped to the display.
    pub fn to_screen(&self, pos: Pos2) -> Point {
        self.map_clamped(pos, 1)
    }

    /// Converts a view position to a pixel boundary for a selection edge.
    ///
    /// Unlike `to_screen` this may land one past the last pixel, so a drag
    /// to the right or bottom edge covers the last column or row.
    fn to_screen_edge(&self, pos: Pos2) -> Point {
        self.map_clamped(pos, 0)
    }

    fn map_clamped(&self, pos: Pos2, inset: i64) -> Point {
        let (sx, sy) = self.scale();
        let x = ((pos.x - self.view.min.x) * sx).floor() as i64;
        let y = ((pos.y - self.view.min.y) * sy).floor() as i64;

        let max_x = (self.display.width as i64 - inset).max(0);
        let max_y = (self.display.height as i64 - inset).max(0);

        Point::new(
            (self.display.left as i64 + x.clamp(0, max_x)) as i32,
            (self.display.top as i64 + y.clamp(0, max_y)) as i32,
        )
    }

    /// Converts a screen pixel to its position in the view.
    pub fn to_view(&self, point: Point) -> Pos2 {
        let (sx, sy) = self.scale();
        pos2(
            self.view.min.x + (point.x - self.display.left) as f32 / sx,
            self.view.min.y + (point.y - self.display.top) as f32 / sy,
        )
    }

    /// Screen region spanned by a drag from `a` to `b`, in either direction.
    ///
    /// Returns `None` if either side is below `MIN_SELECTION` pixels.
    pub fn region_between(&self, a: Pos2, b: Pos2) -> Option<Region> {
        let p1 = self.to_screen_edge(a);
        let p2 = self.to_screen_edge(b);

        let left = p1.x.min(p2.x);
        let top = p1.y.min(p2.y);
        let width = p1.x.abs_diff(p2.x);
        let height = p1.y.abs_diff(p2.y);

        if width < MIN_SELECTION || height < MIN_SELECTION {
            return None;
        }
        Some(Region::new(left, top, width, height))
    }

    /// View rectangle covering a screen region, for drawing the selection.
    pub fn region_to_view(&self, region: &Region) -> Rect {
        let min = self.to_view(Point::new(region.left, region.top));
        let max = self.to_view(Point::new(region.right() as i32, region.bottom() as i32));
        Rect::from_min_max(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Half-size view of a 1920×1080 display.
    fn half_scale(display_left: i32) -> ScreenMapping {
        ScreenMapping::new(
            Rect::from_min_max(pos2(0.0, 0.0), pos2(960.0, 540.0)),
            Region::new(display_left, 0, 1920, 1080),
        )
    }

    #[test]
    fn test_to_screen_scales_and_offsets() {
        let mapping = half_scale(0);
        assert_eq!(mapping.to_screen(pos2(10.0, 20.0)), Point::new(20, 40));

        let mapping = half_scale(1920);
        assert_eq!(mapping.to_screen(pos2(10.0, 20.0)), Point::new(1940, 40));
    }

    #[test]
    fn test_to_screen_clamps_to_display() {
        let mapping = half_scale(0);
        assert_eq!(mapping.to_screen(pos2(-5.0, -5.0)), Point::new(0, 0));
        assert_eq!(mapping.to_screen(pos2(5000.0, 5000.0)), Point::new(1919, 1079));
    }

    #[test]
    fn test_to_view_inverts_to_screen() {
        let mapping = half_scale(0);
        assert_eq!(mapping.to_view(Point::new(20, 40)), pos2(10.0, 20.0));
    }

    #[test]
    fn test_region_between_any_direction() {
        let mapping = half_scale(0);
        let expected = Some(Region::new(20, 20, 100, 40));

        assert_eq!(mapping.region_between(pos2(10.0, 10.0), pos2(60.0, 30.0)), expected);
        assert_eq!(mapping.region_between(pos2(60.0, 30.0), pos2(10.0, 10.0)), expected);
        assert_eq!(mapping.region_between(pos2(10.0, 30.0), pos2(60.0, 10.0)), expected);
    }

    #[test]
    fn test_region_between_rejects_tiny_selection() {
        let mapping = ScreenMapping::new(
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1920.0, 1080.0)),
            Region::new(0, 0, 1920, 1080),
        );

        assert_eq!(mapping.region_between(pos2(10.0, 10.0), pos2(14.0, 100.0)), None);
        assert_eq!(mapping.region_between(pos2(10.0, 10.0), pos2(100.0, 10.0)), None);
        assert_eq!(
            mapping.region_between(pos2(10.0, 10.0), pos2(15.0, 15.0)),
            Some(Region::new(10, 10, 5, 5))
        );
    }

    #[test]
    fn test_region_between_reaches_display_edge() {
        let mapping = half_scale(0);

        assert_eq!(
            mapping.region_between(pos2(900.0, 500.0), pos2(960.0, 540.0)),
            Some(Region::new(1800, 1000, 120, 80))
        );
        // Dragging past the edge stops at the last pixel
        assert_eq!(
            mapping.region_between(pos2(900.0, 500.0), pos2(5000.0, 5000.0)),
            Some(Region::new(1800, 1000, 120, 80))
        );
        assert_eq!(
            mapping.region_between(pos2(-20.0, -20.0), pos2(960.0, 540.0)),
            Some(Region::new(0, 0, 1920, 1080))
        );
    }

    #[test]
    fn test_region_to_view() {
        let mapping = half_scale(0);
        let rect = mapping.region_to_view(&Region::new(20, 20, 100, 40));
        assert_eq!(rect, Rect::from_min_max(pos2(10.0, 10.0), pos2(60.0, 30.0)));
    }
}
