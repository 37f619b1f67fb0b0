//! Map cursor: tracks the highlighted square and the drag-selection gesture
//! on a [`MapGrid`].

use crate::constants::GridFlags;
use crate::error::Result;
use crate::events::{ListenerId, ListenerList};
use crate::geometry::{Point, Rect};
use crate::map_grid::MapGrid;
use crate::selection::SelectionMode;

/// Receives map cursor notifications.
pub trait MapCursorListener: Send {
    /// The cursor moved, appeared (`Some`) or disappeared (`None`).
    fn cursor_moved(&mut self, location: Option<Point>);

    /// A drag started or ended.
    fn mode_changed(&mut self, dragging: bool);
}

#[derive(Debug, Default)]
pub struct MapCursor {
    location: Option<Point>,
    /// Corners of the pre-selected rectangle while dragging.
    drag: Option<(Point, Point)>,
    listeners: ListenerList<dyn MapCursorListener>,
}

impl MapCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Box<dyn MapCursorListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn location(&self) -> Option<Point> {
        self.location
    }

    pub fn is_active(&self) -> bool {
        self.location.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_start_location(&self) -> Option<Point> {
        self.drag.map(|(start, _)| start)
    }

    /// The rectangle currently pre-selected by a drag.
    pub fn drag_rect(&self) -> Option<Rect> {
        self.drag.map(|(start, end)| Rect::from_corners(start, end))
    }

    pub fn is_on_grid(grid: &MapGrid, p: Point) -> bool {
        grid.map_rec().contains(p)
    }

    /// Moves the cursor. While dragging, the pre-selection follows.
    ///
    /// Returns `false` and leaves the cursor alone if `location` is off the grid.
    pub fn set_location(&mut self, grid: &mut MapGrid, location: Option<Point>) -> Result<bool> {
        let Some(location) = location else {
            self.deactivate(grid)?;
            return Ok(true);
        };
        if !Self::is_on_grid(grid, location) {
            return Ok(false);
        }
        if self.location == Some(location) {
            return Ok(true);
        }

        let previous = self.location;
        let drag = self.drag;
        // a drag whose start square was cut off by a resize cannot go on
        let keeps_drag = drag.is_some_and(|(start, _)| Self::is_on_grid(grid, start));
        grid.transaction(|grid| {
            if let Some(previous) = previous {
                grid.unset_cursor(previous)?;
            }
            grid.set_cursor(location)?;
            if let Some((start, end)) = drag {
                if keeps_drag && Self::is_on_grid(grid, end) {
                    grid.update_pre_select(start, end, location)?;
                } else {
                    Self::clear_pre_selection(grid, start, end)?;
                    if keeps_drag {
                        grid.pre_select(start, location)?;
                    }
                }
            }
            Ok(())
        })?;

        self.location = Some(location);
        self.listeners.for_each(|l| l.cursor_moved(Some(location)));
        if let Some((start, _)) = drag {
            if keeps_drag {
                self.drag = Some((start, location));
            } else {
                self.drag = None;
                self.listeners.for_each(|l| l.mode_changed(false));
            }
        }
        Ok(true)
    }

    /// Removes the pre-selection of a drag rectangle, as far as it is still
    /// on the grid.
    fn clear_pre_selection(grid: &mut MapGrid, start: Point, end: Point) -> Result<()> {
        match Rect::from_corners(start, end).intersection(&grid.map_rec()) {
            Some(visible) => grid.unset_flags(visible, GridFlags::SELECTING),
            None => Ok(()),
        }
    }

    /// Like [`MapCursor::set_location`], but clamps the point onto the grid.
    ///
    /// Returns `false` only for a grid without squares.
    pub fn set_location_safe(&mut self, grid: &mut MapGrid, location: Point) -> Result<bool> {
        let size = grid.size();
        if size.width == 0 || size.height == 0 {
            self.deactivate(grid)?;
            return Ok(false);
        }
        let clamped = Point::new(
            location.x.clamp(0, size.width - 1),
            location.y.clamp(0, size.height - 1),
        );
        self.set_location(grid, Some(clamped))
    }

    /// Same as [`MapCursor::set_location`] with a point; reads better while dragging.
    pub fn drag_to(&mut self, grid: &mut MapGrid, location: Point) -> Result<bool> {
        self.set_location(grid, Some(location))
    }

    /// Removes the cursor; an ongoing drag is released.
    pub fn deactivate(&mut self, grid: &mut MapGrid) -> Result<()> {
        let Some(previous) = self.location else {
            return Ok(());
        };
        self.drag_release(grid)?;
        grid.unset_cursor(previous)?;
        self.location = None;
        self.listeners.for_each(|l| l.cursor_moved(None));
        Ok(())
    }

    /// Starts a drag at the cursor. Returns `false` if there is no cursor.
    pub fn drag_start(&mut self, grid: &mut MapGrid) -> Result<bool> {
        let Some(location) = self.location else {
            return Ok(false);
        };
        if let Some((start, end)) = self.drag {
            Self::clear_pre_selection(grid, start, end)?;
        }
        grid.pre_select(location, location)?;
        self.drag = Some((location, location));
        self.listeners.for_each(|l| l.mode_changed(true));
        Ok(true)
    }

    /// Ends a drag without changing the selection.
    pub fn drag_release(&mut self, grid: &mut MapGrid) -> Result<bool> {
        let Some((start, end)) = self.drag else {
            return Ok(false);
        };
        Self::clear_pre_selection(grid, start, end)?;
        self.drag = None;
        self.listeners.for_each(|l| l.mode_changed(false));
        Ok(true)
    }

    /// Ends a drag and applies the dragged rectangle to the selection.
    ///
    /// Only the part of the rectangle still on the grid is selected.
    pub fn drag_select(&mut self, grid: &mut MapGrid, mode: SelectionMode) -> Result<bool> {
        let Some((start, end)) = self.drag else {
            return Ok(false);
        };
        let visible = Rect::from_corners(start, end).intersection(&grid.map_rec());
        grid.transaction(|grid| {
            let Some(visible) = visible else {
                return Ok(());
            };
            grid.unset_flags(visible, GridFlags::SELECTING)?;
            let far = Point::new(visible.max_x(), visible.max_y());
            grid.select_area(Point::new(visible.x, visible.y), far, mode)
        })?;
        self.drag = None;
        self.listeners.for_each(|l| l.mode_changed(false));
        Ok(true)
    }
}
