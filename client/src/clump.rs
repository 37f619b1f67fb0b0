//! Groups dirty map squares into screen-space clusters so the renderer can
//! redraw each cluster in one pass.

use wograld_core::{Point, Rect};

/// Squares within this many screen units of a clump join it.
const NEAR_X: i32 = 2;
const NEAR_Y: i32 = 2;

/// Isometric screen position of view square `p`, in square units.
pub fn screen_position(p: Point) -> Point {
    Point::new(p.x + p.y - 10, p.y - p.x + 8)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clump {
    squares: Vec<Point>,
    /// Screen-space box, `max` exclusive.
    min: Point,
    max: Point,
}

impl Clump {
    pub fn new(p: Point) -> Self {
        let s = screen_position(p);
        Self {
            squares: vec![p],
            min: s,
            max: s.offset(1, 1),
        }
    }

    pub fn add(&mut self, p: Point) {
        let s = screen_position(p);
        self.min = Point::new(self.min.x.min(s.x), self.min.y.min(s.y));
        self.max = Point::new(self.max.x.max(s.x + 1), self.max.y.max(s.y + 1));
        self.squares.push(p);
    }

    /// True if `p` is too far away on screen to join this clump.
    pub fn is_far(&self, p: Point) -> bool {
        let s = screen_position(p);
        s.x < self.min.x - NEAR_X
            || s.x >= self.max.x + NEAR_X
            || s.y < self.min.y - NEAR_Y
            || s.y >= self.max.y + NEAR_Y
    }

    pub fn contains(&self, p: Point) -> bool {
        self.squares.contains(&p)
    }

    /// Takes over all squares of `other`.
    pub fn merge(&mut self, other: Clump) {
        self.min = Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y));
        self.max = Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y));
        self.squares.extend(other.squares);
    }

    /// Screen-space bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.min.x,
            self.min.y,
            self.max.x - self.min.x,
            self.max.y - self.min.y,
        )
    }

    pub fn squares(&self) -> &[Point] {
        &self.squares
    }
}

/// Clusters `points`; a point close to several clumps joins them together.
pub fn group_into_clumps(points: &[Point]) -> Vec<Clump> {
    let mut clumps: Vec<Clump> = Vec::new();
    for &p in points {
        let near: Vec<usize> = clumps
            .iter()
            .enumerate()
            .filter(|(_, clump)| !clump.is_far(p))
            .map(|(i, _)| i)
            .collect();
        let Some((&first, rest)) = near.split_first() else {
            clumps.push(Clump::new(p));
            continue;
        };
        clumps[first].add(p);
        for &i in rest.iter().rev() {
            let other = clumps.remove(i);
            clumps[first].merge(other);
        }
    }
    clumps
}
