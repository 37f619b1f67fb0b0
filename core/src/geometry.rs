//! Integer grid geometry shared by the editor grid and the client map.

use serde::{Deserialize, Serialize};

/// A square position on a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height of a grid, both non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size2D {
    pub width: i32,
    pub height: i32,
}

impl Size2D {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "size must not be negative: {width}x{height}"
        );
        Self { width, height }
    }

    /// Number of squares covered by this size.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        0 <= x && x < self.width && 0 <= y && y < self.height
    }
}

/// Number of squares in `min..=max`, capped at `i32::MAX`.
fn extent(min: i32, max: i32) -> i32 {
    i32::try_from(u64::from(max.abs_diff(min)) + 1).unwrap_or(i32::MAX)
}

/// An axis aligned rectangle of squares.
///
/// `width` and `height` count squares, so a single square is `(x, y, 1, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the inclusive rectangle spanned by two opposite corners.
    ///
    /// The corners may be given in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let max_x = p1.x.max(p2.x);
        let max_y = p1.y.max(p2.y);
        Self::new(min_x, min_y, extent(min_x, max_x), extent(min_y, max_y))
    }

    /// Rectangle covering a whole grid of the given size.
    pub fn from_size(size: Size2D) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Right-most column (inclusive), saturating at `i32::MAX`.
    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.width.saturating_sub(1))
    }

    /// Bottom-most row (inclusive), saturating at `i32::MAX`.
    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.height.saturating_sub(1))
    }

    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty() && self.x <= p.x && p.x <= self.max_x() && self.y <= p.y && p.y <= self.max_y()
    }

    /// Returns the intersection of both rectangles, or `None` if they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.x.max(other.x);
        let min_y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Rect::new(min_x, min_y, extent(min_x, max_x), extent(min_y, max_y)))
    }

    /// Iterates all squares of the rectangle, column by column.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (x0, y0, x1, y1) = (self.x, self.y, self.max_x(), self.max_y());
        (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| Point::new(x, y)))
    }
}
