//! Editor map grid: per-square selection, cursor and highlight flags.
//!
//! Selection flags are not changed directly. A drag first sets the
//! pre-selection flags with [`MapGrid::pre_select`], then
//! [`MapGrid::select_area`] combines the area with the selection according
//! to a [`SelectionMode`]. Every change fires a [`MapGridEvent`] to the
//! registered listeners, once per outermost transaction.

use std::cell::Cell;

use crate::change_rect::ChangeRect;
use crate::constants::{GridFlags, HighlightLevel};
use crate::error::{GridError, Result};
use crate::events::{ListenerId, ListenerList, MapGridEvent, MapGridListener};
use crate::geometry::{Point, Rect, Size2D};
use crate::selection::SelectionMode;
use crate::transaction::TransactionState;

/// Directions used for the selection edge flags: offset, own flag, neighbour's flag.
const BORDERS: [(i32, i32, GridFlags, GridFlags); 4] = [
    (0, -1, GridFlags::SELECTION_NORTH, GridFlags::SELECTION_SOUTH),
    (0, 1, GridFlags::SELECTION_SOUTH, GridFlags::SELECTION_NORTH),
    (-1, 0, GridFlags::SELECTION_WEST, GridFlags::SELECTION_EAST),
    (1, 0, GridFlags::SELECTION_EAST, GridFlags::SELECTION_WEST),
];

/// Inclusive rectangle from two corners already in min/max order.
fn span(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Rect {
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

#[derive(Debug)]
pub struct MapGrid {
    flags: Vec<GridFlags>,
    size: Size2D,
    /// Squares touched by the open transaction.
    pending_change: ChangeRect,
    /// Bounding box reported by the last change event.
    rec_change: Rect,
    /// `None` when stale; `Some(None)` when nothing is selected.
    selected_rec: Cell<Option<Option<Rect>>>,
    transaction: TransactionState,
    listeners: ListenerList<dyn MapGridListener>,
}

impl MapGrid {
    pub fn new(size: Size2D) -> Self {
        Self {
            flags: vec![GridFlags::empty(); size.area()],
            size,
            pending_change: ChangeRect::new(),
            rec_change: Rect::default(),
            selected_rec: Cell::new(Some(None)),
            transaction: TransactionState::new(),
            listeners: ListenerList::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn MapGridListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn size(&self) -> Size2D {
        self.size
    }

    /// Position and dimension of this grid.
    pub fn map_rec(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Bounding box of the squares changed by the last committed transaction.
    pub fn rec_change(&self) -> Rect {
        self.rec_change
    }

    pub fn transaction_depth(&self) -> u32 {
        self.transaction.depth()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size.width + x) as usize
    }

    fn check_point(&self, x: i32, y: i32) -> Result<()> {
        if self.size.contains(x, y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.size.width,
                height: self.size.height,
            })
        }
    }

    fn check_rect(&self, rect: &Rect) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        self.check_point(rect.x, rect.y)?;
        // the origin is on the grid, so the subtractions stay in range
        if rect.width > self.size.width - rect.x || rect.height > self.size.height - rect.y {
            return Err(GridError::OutOfBounds {
                x: rect.max_x(),
                y: rect.max_y(),
                width: self.size.width,
                height: self.size.height,
            });
        }
        Ok(())
    }

    pub fn flags_at(&self, x: i32, y: i32) -> Result<GridFlags> {
        self.check_point(x, y)?;
        Ok(self.flags[self.index(x, y)])
    }

    pub fn flags(&self, p: Point) -> Result<GridFlags> {
        self.flags_at(p.x, p.y)
    }

    pub fn has_error(&self, p: Point) -> Result<bool> {
        Ok(self.flags(p)?.contains(GridFlags::ERROR))
    }

    pub fn is_selected(&self, p: Point) -> Result<bool> {
        Ok(self.flags(p)?.contains(GridFlags::SELECTION))
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Starts a (possibly nested) transaction.
    ///
    /// Change events are held back until the outermost transaction ends.
    /// Every call needs its own [`MapGrid::end_transaction`].
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.transaction.begin()? {
            self.pending_change.begin();
        }
        Ok(())
    }

    /// Ends a transaction; the outermost one commits and notifies listeners
    /// if any square changed.
    pub fn end_transaction(&mut self) -> Result<()> {
        if self.transaction.end()? {
            if let Some(rect) = self.pending_change.rect() {
                self.rec_change = rect;
                self.fire_changed();
            }
        }
        Ok(())
    }

    /// Runs `f` inside a transaction that is ended even if `f` fails.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.begin_transaction()?;
        let result = f(self);
        let ended = self.end_transaction();
        let value = result?;
        ended?;
        Ok(value)
    }

    fn fire_changed(&mut self) {
        let event = MapGridEvent {
            rec_change: self.rec_change,
            size: self.size,
        };
        self.listeners.for_each(|l| l.map_grid_changed(&event));
    }

    fn fire_resized(&mut self) {
        let event = MapGridEvent {
            rec_change: self.map_rec(),
            size: self.size,
        };
        self.listeners.for_each(|l| l.map_grid_resized(&event));
    }

    // -------------------------------------------------------------------------
    // Flag primitives
    // -------------------------------------------------------------------------

    /// Sets `mask` on every square of `rect`.
    ///
    /// Fails without touching the grid if `rect` reaches outside of it.
    pub fn set_flags(&mut self, rect: Rect, mask: GridFlags) -> Result<()> {
        self.transaction(|grid| {
            grid.check_rect(&rect)?;
            grid.apply_set(&rect, mask);
            Ok(())
        })
    }

    /// Clears `mask` on every square of `rect`.
    pub fn unset_flags(&mut self, rect: Rect, mask: GridFlags) -> Result<()> {
        self.transaction(|grid| {
            grid.check_rect(&rect)?;
            grid.apply_unset(&rect, mask);
            Ok(())
        })
    }

    /// Flips `mask` on every square of `rect`.
    pub fn toggle_flags(&mut self, rect: Rect, mask: GridFlags) -> Result<()> {
        self.transaction(|grid| {
            grid.check_rect(&rect)?;
            grid.apply_toggle(&rect, mask);
            Ok(())
        })
    }

    fn apply_set(&mut self, rect: &Rect, mask: GridFlags) {
        let mask = mask - GridFlags::SELECTION_BORDERS;
        if mask.is_empty() {
            return;
        }
        for p in rect.points() {
            let idx = self.index(p.x, p.y);
            let cell = self.flags[idx];
            if cell.contains(mask) {
                continue;
            }
            if mask.contains(GridFlags::SELECTION) && !cell.contains(GridFlags::SELECTION) {
                self.update_selection_borders(p.x, p.y, true);
                self.selected_rec.set(None);
            }
            self.flags[idx].insert(mask);
            self.pending_change.update(p.x, p.y);
        }
    }

    fn apply_unset(&mut self, rect: &Rect, mask: GridFlags) {
        let mask = mask - GridFlags::SELECTION_BORDERS;
        if mask.is_empty() {
            return;
        }
        for p in rect.points() {
            let idx = self.index(p.x, p.y);
            let cell = self.flags[idx];
            if !cell.intersects(mask) {
                continue;
            }
            if mask.contains(GridFlags::SELECTION) && cell.contains(GridFlags::SELECTION) {
                self.update_selection_borders(p.x, p.y, false);
                self.selected_rec.set(None);
            }
            self.flags[idx].remove(mask);
            self.pending_change.update(p.x, p.y);
        }
    }

    fn apply_toggle(&mut self, rect: &Rect, mask: GridFlags) {
        let mask = mask - GridFlags::SELECTION_BORDERS;
        if mask.is_empty() {
            return;
        }
        let flips_selection = mask.contains(GridFlags::SELECTION);
        for p in rect.points() {
            let idx = self.index(p.x, p.y);
            if flips_selection {
                let selected = self.flags[idx].contains(GridFlags::SELECTION);
                self.update_selection_borders(p.x, p.y, !selected);
            }
            self.flags[idx].toggle(mask);
            self.pending_change.update(p.x, p.y);
        }
        if flips_selection {
            self.selected_rec.set(None);
        }
    }

    /// Updates the edge flags of a square and its four neighbours for a
    /// square whose selection state is about to become `selected`.
    fn update_selection_borders(&mut self, x: i32, y: i32, selected: bool) {
        let own = self.index(x, y);
        for (dx, dy, flag, neighbour_flag) in BORDERS {
            let (nx, ny) = (x + dx, y + dy);
            let neighbour = self
                .size
                .contains(nx, ny)
                .then(|| self.index(nx, ny))
                .filter(|&n| self.flags[n].contains(GridFlags::SELECTION));

            match (neighbour, selected) {
                (Some(n), true) => {
                    self.flags[n].remove(neighbour_flag);
                    self.pending_change.update(nx, ny);
                }
                (Some(n), false) => {
                    self.flags[n].insert(neighbour_flag);
                    self.pending_change.update(nx, ny);
                }
                (None, true) => {
                    self.flags[own].insert(flag);
                    self.pending_change.update(x, y);
                }
                (None, false) => {
                    self.flags[own].remove(flag);
                    self.pending_change.update(x, y);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Selects or deselects a single square.
    pub fn select(&mut self, pos: Point, mode: SelectionMode) -> Result<()> {
        self.select_area(pos, pos, mode)
    }

    /// Selects or deselects all squares between two opposite corners.
    pub fn select_area(&mut self, pos1: Point, pos2: Point, mode: SelectionMode) -> Result<()> {
        let rect = Rect::from_corners(pos1, pos2);
        match mode {
            SelectionMode::Add => self.set_flags(rect, GridFlags::SELECTION),
            SelectionMode::Sub => self.unset_flags(rect, GridFlags::SELECTION),
            SelectionMode::Flip => self.toggle_flags(rect, GridFlags::SELECTION),
        }
    }

    pub fn select_all(&mut self) -> Result<()> {
        self.set_flags(self.map_rec(), GridFlags::SELECTION)
    }

    pub fn invert_selection(&mut self) -> Result<()> {
        self.toggle_flags(self.map_rec(), GridFlags::SELECTION)
    }

    /// Clears all selection and pre-selection flags.
    pub fn unselect(&mut self) -> Result<()> {
        self.unset_flags(self.map_rec(), GridFlags::SELECTION | GridFlags::SELECTING)
    }

    /// Pre-selects the rectangle between two opposite corners.
    pub fn pre_select(&mut self, start: Point, end: Point) -> Result<()> {
        self.set_flags(Rect::from_corners(start, end), GridFlags::SELECTING)
    }

    /// Removes the pre-selection of the rectangle between two opposite corners.
    pub fn un_pre_select(&mut self, start: Point, end: Point) -> Result<()> {
        self.unset_flags(Rect::from_corners(start, end), GridFlags::SELECTING)
    }

    /// Moves the pre-selected rectangle `start..old_end` to `start..new_end`.
    ///
    /// Same result as `un_pre_select(start, old_end); pre_select(start, new_end)`
    /// but only the strips that differ are touched, so the change event is
    /// smaller. Assumes exactly the squares of `start..old_end` are pre-selected.
    pub fn update_pre_select(&mut self, start: Point, old_end: Point, new_end: Point) -> Result<()> {
        let old = Rect::from_corners(start, old_end);
        let new = Rect::from_corners(start, new_end);
        self.transaction(|grid| {
            grid.check_rect(&old)?;
            grid.check_rect(&new)?;

            let (mut o1x, mut o1y, mut o2x, mut o2y) = (old.x, old.y, old.max_x(), old.max_y());
            let (n1x, n1y, n2x, n2y) = (new.x, new.y, new.max_x(), new.max_y());
            let selecting = GridFlags::SELECTING;

            if o1x < n1x {
                grid.apply_unset(&span(o1x, o1y, n1x - 1, o2y), selecting);
                o1x = n1x;
            }
            if n2x < o2x {
                grid.apply_unset(&span(n2x + 1, o1y, o2x, o2y), selecting);
                o2x = n2x;
            }
            if o1y < n1y {
                grid.apply_unset(&span(o1x, o1y, o2x, n1y - 1), selecting);
                o1y = n1y;
            }
            if n2y < o2y {
                grid.apply_unset(&span(o1x, n2y + 1, o2x, o2y), selecting);
                o2y = n2y;
            }

            if n1x < o1x {
                grid.apply_set(&span(n1x, n1y, o1x - 1, n2y), selecting);
                o1x = n1x;
            }
            if o2x < n2x {
                grid.apply_set(&span(o2x + 1, n1y, n2x, n2y), selecting);
                o2x = n2x;
            }
            if n1y < o1y {
                grid.apply_set(&span(n1x, n1y, n2x, o1y - 1), selecting);
                o1y = n1y;
            }
            if o2y < n2y {
                grid.apply_set(&span(n1x, o2y + 1, n2x, n2y), selecting);
                o2y = n2y;
            }

            debug_assert_eq!((o1x, o1y, o2x, o2y), (n1x, n1y, n2x, n2y));
            Ok(())
        })
    }

    /// Smallest rectangle containing every selected square, or `None` if
    /// nothing is selected.
    pub fn selected_rec(&self) -> Option<Rect> {
        if let Some(cached) = self.selected_rec.get() {
            return cached;
        }
        let rect = self.scan_selected_rec();
        self.selected_rec.set(Some(rect));
        rect
    }

    fn scan_selected_rec(&self) -> Option<Rect> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                if !self.flags[self.index(x, y)].contains(GridFlags::SELECTION) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
                });
            }
        }
        bounds.map(|(x1, y1, x2, y2)| span(x1, y1, x2, y2))
    }

    /// All selected squares, column by column.
    pub fn selection(&self) -> Vec<Point> {
        match self.selected_rec() {
            Some(rect) => rect
                .points()
                .filter(|p| self.flags[self.index(p.x, p.y)].contains(GridFlags::SELECTION))
                .collect(),
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Cursor and highlights
    // -------------------------------------------------------------------------

    pub fn set_cursor(&mut self, pos: Point) -> Result<()> {
        self.set_flags(Rect::from_corners(pos, pos), GridFlags::CURSOR)
    }

    /// Removes the cursor highlight. Positions outside of the grid are
    /// ignored: the cursor may have been cut off by a resize.
    pub fn unset_cursor(&mut self, pos: Point) -> Result<()> {
        if !self.size.contains(pos.x, pos.y) {
            return Ok(());
        }
        self.unset_flags(Rect::from_corners(pos, pos), GridFlags::CURSOR)
    }

    pub fn set_error(&mut self, pos: Point) -> Result<()> {
        self.set_highlight(pos, HighlightLevel::Error)
    }

    pub fn clear_errors(&mut self) -> Result<()> {
        self.clear_highlights(HighlightLevel::Error)
    }

    pub fn set_highlight(&mut self, pos: Point, level: HighlightLevel) -> Result<()> {
        self.set_flags(Rect::from_corners(pos, pos), level.flag())
    }

    pub fn clear_highlights(&mut self, level: HighlightLevel) -> Result<()> {
        self.unset_flags(self.map_rec(), level.flag())
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Resizes the grid, keeping the flags of the overlapping region.
    ///
    /// Selected squares in the cut off region are deselected first so the
    /// remaining edge flags stay consistent. Fires one resize event and no
    /// change event.
    pub fn resize(&mut self, new_size: Size2D) {
        if self.size == new_size {
            return;
        }
        log::debug!(
            "resizing map grid from {}x{} to {}x{}",
            self.size.width,
            self.size.height,
            new_size.width,
            new_size.height
        );

        let pending = self.pending_change;
        if new_size.width < self.size.width {
            let cut = span(new_size.width, 0, self.size.width - 1, self.size.height - 1);
            self.apply_unset(&cut, GridFlags::SELECTION);
        }
        if new_size.height < self.size.height {
            let cut = span(0, new_size.height, self.size.width - 1, self.size.height - 1);
            self.apply_unset(&cut, GridFlags::SELECTION);
        }
        self.pending_change = pending;

        let min_width = new_size.width.min(self.size.width);
        let min_height = new_size.height.min(self.size.height);
        let mut flags = vec![GridFlags::empty(); new_size.area()];
        for y in 0..min_height {
            for x in 0..min_width {
                flags[(y * new_size.width + x) as usize] = self.flags[self.index(x, y)];
            }
        }

        self.flags = flags;
        self.size = new_size;
        self.pending_change.clip(&Rect::from_size(new_size));
        self.selected_rec.set(None);
        self.fire_resized();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Seen {
        Changed(Rect),
        Resized(Size2D),
    }

    struct Recorder(Arc<Mutex<Vec<Seen>>>);

    impl MapGridListener for Recorder {
        fn map_grid_changed(&mut self, event: &MapGridEvent) {
            self.0.lock().unwrap().push(Seen::Changed(event.rec_change));
        }

        fn map_grid_resized(&mut self, event: &MapGridEvent) {
            self.0.lock().unwrap().push(Seen::Resized(event.size));
        }
    }

    fn grid_with_recorder(w: i32, h: i32) -> (MapGrid, Arc<Mutex<Vec<Seen>>>) {
        let mut grid = MapGrid::new(Size2D::new(w, h));
        let seen = Arc::new(Mutex::new(Vec::new()));
        grid.add_listener(Box::new(Recorder(seen.clone())));
        (grid, seen)
    }

    fn borders_consistent(grid: &MapGrid) -> bool {
        let size = grid.size();
        (0..size.height).all(|y| {
            (0..size.width).all(|x| {
                let cell = grid.flags_at(x, y).unwrap();
                let selected = cell.contains(GridFlags::SELECTION);
                BORDERS.iter().all(|&(dx, dy, flag, _)| {
                    let neighbour_selected = grid
                        .flags_at(x + dx, y + dy)
                        .map(|f| f.contains(GridFlags::SELECTION))
                        .unwrap_or(false);
                    cell.contains(flag) == (selected && !neighbour_selected)
                })
            })
        })
    }

    #[test]
    fn select_single_square_sets_all_borders() {
        let mut grid = MapGrid::new(Size2D::new(3, 3));
        grid.select(Point::new(1, 1), SelectionMode::Add).unwrap();
        let f = grid.flags_at(1, 1).unwrap();
        assert!(f.contains(GridFlags::SELECTION | GridFlags::SELECTION_BORDERS));
        assert_eq!(grid.flags_at(0, 1).unwrap(), GridFlags::empty());
        assert!(borders_consistent(&grid));
    }

    #[test]
    fn adjacent_selection_removes_shared_border() {
        let mut grid = MapGrid::new(Size2D::new(3, 3));
        grid.select(Point::new(0, 0), SelectionMode::Add).unwrap();
        grid.select(Point::new(1, 0), SelectionMode::Add).unwrap();
        assert!(!grid.flags_at(0, 0).unwrap().contains(GridFlags::SELECTION_EAST));
        assert!(!grid.flags_at(1, 0).unwrap().contains(GridFlags::SELECTION_WEST));
        assert!(borders_consistent(&grid));

        grid.select(Point::new(1, 0), SelectionMode::Sub).unwrap();
        assert!(grid.flags_at(0, 0).unwrap().contains(GridFlags::SELECTION_EAST));
        assert!(grid.flags_at(1, 0).unwrap().is_empty());
        assert!(borders_consistent(&grid));
    }

    #[test]
    fn set_then_unset_restores_grid() {
        let mut grid = MapGrid::new(Size2D::new(5, 4));
        grid.set_cursor(Point::new(2, 2)).unwrap();
        grid.select(Point::new(4, 0), SelectionMode::Add).unwrap();
        let before = grid.flags.clone();

        let rect = Rect::new(1, 1, 3, 2);
        grid.set_flags(rect, GridFlags::SELECTION).unwrap();
        grid.unset_flags(rect, GridFlags::SELECTION).unwrap();
        assert_eq!(grid.flags, before);
    }

    #[test]
    fn border_flags_cannot_be_set_directly() {
        let mut grid = MapGrid::new(Size2D::new(2, 2));
        grid.set_flags(Rect::new(0, 0, 2, 2), GridFlags::SELECTION_NORTH)
            .unwrap();
        assert!(grid.flags.iter().all(|f| f.is_empty()));
    }

    #[test]
    fn toggle_without_selection_leaves_borders() {
        let mut grid = MapGrid::new(Size2D::new(3, 3));
        grid.select(Point::new(1, 1), SelectionMode::Add).unwrap();
        grid.toggle_flags(Rect::new(0, 0, 3, 3), GridFlags::WARNING)
            .unwrap();
        assert!(borders_consistent(&grid));
        assert!(grid.flags_at(2, 2).unwrap().contains(GridFlags::WARNING));
        assert_eq!(grid.selected_rec(), Some(Rect::new(1, 1, 1, 1)));
    }

    #[test]
    fn out_of_bounds_fails_without_changes() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        let err = grid
            .set_flags(Rect::new(2, 2, 3, 1), GridFlags::SELECTION)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                x: 4,
                y: 2,
                width: 4,
                height: 4
            }
        );
        assert!(grid.flags.iter().all(|f| f.is_empty()));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(grid.transaction_depth(), 0);
        assert!(grid.flags_at(-1, 0).is_err());
    }

    #[test]
    fn huge_rect_is_rejected() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        let err = grid
            .set_flags(Rect::new(3, 0, i32::MAX, 1), GridFlags::SELECTION)
            .unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { x: i32::MAX, y: 0, .. }));
        let far = Rect::from_corners(Point::new(0, 0), Point::new(i32::MAX, i32::MIN));
        assert!(grid.toggle_flags(far, GridFlags::SELECTION).is_err());
        assert!(grid.flags.iter().all(|f| f.is_empty()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn one_event_per_outer_transaction() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        grid.begin_transaction().unwrap();
        grid.begin_transaction().unwrap();
        grid.select(Point::new(0, 0), SelectionMode::Add).unwrap();
        grid.end_transaction().unwrap();
        grid.set_error(Point::new(3, 3)).unwrap();
        assert!(seen.lock().unwrap().is_empty());
        grid.end_transaction().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![Seen::Changed(Rect::new(0, 0, 4, 4))]);
        assert_eq!(grid.rec_change(), Rect::new(0, 0, 4, 4));
    }

    #[test]
    fn no_event_without_change() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        grid.unselect().unwrap();
        grid.unset_cursor(Point::new(10, 10)).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn removed_listener_is_silent() {
        let mut grid = MapGrid::new(Size2D::new(2, 2));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let id = grid.add_listener(Box::new(Recorder(seen.clone())));
        assert!(grid.remove_listener(id));
        grid.select_all().unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn change_rect_includes_neighbour_border_updates() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        grid.select(Point::new(1, 1), SelectionMode::Add).unwrap();
        seen.lock().unwrap().clear();
        grid.select(Point::new(2, 1), SelectionMode::Add).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Seen::Changed(Rect::new(1, 1, 2, 1))]
        );
    }

    #[test]
    fn selected_rec_and_selection() {
        let mut grid = MapGrid::new(Size2D::new(4, 4));
        assert_eq!(grid.selected_rec(), None);
        assert!(grid.selection().is_empty());

        grid.select_area(Point::new(2, 2), Point::new(1, 1), SelectionMode::Add)
            .unwrap();
        assert_eq!(grid.selected_rec(), Some(Rect::new(1, 1, 2, 2)));
        assert_eq!(
            grid.selection(),
            vec![
                Point::new(1, 1),
                Point::new(1, 2),
                Point::new(2, 1),
                Point::new(2, 2)
            ]
        );

        grid.invert_selection().unwrap();
        assert_eq!(grid.selected_rec(), Some(Rect::new(0, 0, 4, 4)));
        assert_eq!(grid.selection().len(), 12);
        assert!(borders_consistent(&grid));
    }

    #[test]
    fn flip_mode_toggles() {
        let mut grid = MapGrid::new(Size2D::new(4, 4));
        grid.select_area(Point::new(0, 0), Point::new(1, 1), SelectionMode::Add)
            .unwrap();
        grid.select_area(Point::new(1, 1), Point::new(2, 2), SelectionMode::Flip)
            .unwrap();
        assert!(!grid.is_selected(Point::new(1, 1)).unwrap());
        assert!(grid.is_selected(Point::new(2, 2)).unwrap());
        assert!(grid.is_selected(Point::new(0, 0)).unwrap());
        assert!(borders_consistent(&grid));
    }

    #[test]
    fn update_pre_select_matches_full_reselect() {
        let start = Point::new(3, 3);
        let ends = [
            Point::new(3, 3),
            Point::new(5, 4),
            Point::new(1, 6),
            Point::new(0, 0),
            Point::new(6, 1),
            Point::new(4, 4),
        ];
        let mut grid = MapGrid::new(Size2D::new(7, 7));
        grid.pre_select(start, ends[0]).unwrap();
        for pair in ends.windows(2) {
            grid.update_pre_select(start, pair[0], pair[1]).unwrap();

            let mut expected = MapGrid::new(Size2D::new(7, 7));
            expected.pre_select(start, pair[1]).unwrap();
            assert_eq!(grid.flags, expected.flags, "moving to {:?}", pair[1]);
        }
        grid.un_pre_select(start, Point::new(4, 4)).unwrap();
        assert!(grid.flags.iter().all(|f| f.is_empty()));
    }

    #[test]
    fn unselect_clears_selection_and_pre_selection() {
        let mut grid = MapGrid::new(Size2D::new(3, 3));
        grid.select_all().unwrap();
        grid.pre_select(Point::new(0, 0), Point::new(1, 1)).unwrap();
        grid.set_cursor(Point::new(2, 2)).unwrap();
        grid.unselect().unwrap();
        assert_eq!(grid.flags_at(2, 2).unwrap(), GridFlags::CURSOR);
        assert_eq!(grid.selected_rec(), None);
        assert!(borders_consistent(&grid));
    }

    #[test]
    fn errors_and_highlights() {
        let mut grid = MapGrid::new(Size2D::new(3, 3));
        grid.set_error(Point::new(1, 2)).unwrap();
        grid.set_highlight(Point::new(1, 2), HighlightLevel::Warning)
            .unwrap();
        assert!(grid.has_error(Point::new(1, 2)).unwrap());
        grid.clear_errors().unwrap();
        assert!(!grid.has_error(Point::new(1, 2)).unwrap());
        assert_eq!(grid.flags_at(1, 2).unwrap(), GridFlags::WARNING);
        assert!(grid.set_error(Point::new(3, 0)).is_err());
    }

    #[test]
    fn shrink_drops_cut_selection_and_fires_only_resize() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        grid.select_all().unwrap();
        seen.lock().unwrap().clear();

        grid.resize(Size2D::new(2, 3));
        assert_eq!(*seen.lock().unwrap(), vec![Seen::Resized(Size2D::new(2, 3))]);
        assert_eq!(grid.selected_rec(), Some(Rect::new(0, 0, 2, 3)));
        assert!(borders_consistent(&grid));
        assert!(grid.flags_at(1, 2).unwrap().contains(GridFlags::SELECTION_EAST | GridFlags::SELECTION_SOUTH));

        grid.resize(Size2D::new(5, 5));
        assert_eq!(grid.selected_rec(), Some(Rect::new(0, 0, 2, 3)));
        assert!(borders_consistent(&grid));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn resize_to_same_size_is_silent() {
        let (mut grid, seen) = grid_with_recorder(4, 4);
        grid.resize(Size2D::new(4, 4));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn transaction_helper_ends_on_error() {
        let mut grid = MapGrid::new(Size2D::new(2, 2));
        let result = grid.transaction(|g| {
            g.select(Point::new(0, 0), SelectionMode::Add)?;
            g.select(Point::new(5, 5), SelectionMode::Add)
        });
        assert!(result.is_err());
        assert_eq!(grid.transaction_depth(), 0);
        assert!(grid.is_selected(Point::new(0, 0)).unwrap());
        assert_eq!(grid.end_transaction(), Err(GridError::NoTransaction));
    }
}
