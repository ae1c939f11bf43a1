//! Screen geometry shared by the capturer, the picker and the monitor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in absolute screen pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// X position of the top-left corner
    pub left: i32,
    /// Y position of the top-left corner
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// True if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Region) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if the point lies inside this rectangle.
    pub fn contains_point(&self, point: Point) -> bool {
        let (x, y) = (point.x as i64, point.y as i64);
        x >= self.left as i64 && y >= self.top as i64 && x < self.right() && y < self.bottom()
    }

    /// Offset of `other`'s top-left corner relative to this rectangle's origin.
    ///
    /// Only meaningful when `self.contains(other)`.
    pub fn offset_of(&self, other: &Region) -> (u32, u32) {
        (
            (other.left - self.left).max(0) as u32,
            (other.top - self.top).max(0) as u32,
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) {}×{}",
            self.left, self.top, self.width, self.height
        )
    }
}

/// A single screen position, used as the click target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
