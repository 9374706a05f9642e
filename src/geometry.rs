//! Plain geometry types in points
//!
//! Coordinates follow the usual UI convention: origin at the top-left, `y`
//! growing downwards.

use serde::{Deserialize, Serialize};

/// A location in a 2D coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width and a height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Extent
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its origin and size components
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Smallest x coordinate
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    /// Smallest y coordinate
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    /// Largest x coordinate
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Largest y coordinate
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Height of the rectangle
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Returns the overlapping region of two rectangles, or `None` when they
    /// share no area.
    ///
    /// Rectangles that only touch along an edge produce `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());

        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Returns the rectangle shifted by `dx`, `dy`
    pub fn offset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width,
            self.size.height,
        )
    }

    /// Re-expresses a rectangle given in the coordinate space that contains
    /// `self` in the local coordinate space of `self`.
    pub fn convert_to_local(&self, rect: &Rect) -> Rect {
        rect.offset_by(-self.origin.x, -self.origin.y)
    }
}

/// Insets from each edge of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    /// Inset from the top edge
    pub top: f64,
    /// Inset from the left edge
    pub left: f64,
    /// Inset from the bottom edge
    pub bottom: f64,
    /// Inset from the right edge
    pub right: f64,
}

impl EdgeInsets {
    /// No inset on any edge
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Insets with only the bottom edge set
    pub const fn bottom(bottom: f64) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            bottom,
            right: 0.0,
        }
    }
}
