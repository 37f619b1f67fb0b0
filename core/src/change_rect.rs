use crate::geometry::Rect;

/// Bounding box of all squares touched since the last `begin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeRect {
    bounds: Option<(i32, i32, i32, i32)>,
}

impl ChangeRect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all recorded squares.
    pub fn begin(&mut self) {
        self.bounds = None;
    }

    pub fn update(&mut self, x: i32, y: i32) {
        self.bounds = Some(match self.bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// The recorded bounding box, or `None` if nothing changed.
    pub fn rect(&self) -> Option<Rect> {
        self.bounds
            .map(|(min_x, min_y, max_x, max_y)| Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Drops everything outside `clip`.
    pub fn clip(&mut self, clip: &Rect) {
        self.bounds = self
            .rect()
            .and_then(|r| r.intersection(clip))
            .map(|r| (r.x, r.y, r.max_x(), r.max_y()));
    }
}
