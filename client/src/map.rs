//! Client side copy of the map the server streams to the player.
//!
//! Squares live in lazily allocated [`MapPatch`] blocks addressed by map
//! coordinates. Callers use view coordinates; the scroll offset translates
//! between the two (`map = view - offset`). Modified squares collect in a
//! dirty set until [`ClientMap::take_dirty_squares`] drains them.
//!
//! View coordinates and the scroll offset are limited to
//! `±MAX_COORDINATE`, so the translation never overflows.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use wograld_core::constants::{
    DEFAULT_DARKNESS, DEFAULT_SMOOTH, FACE_COLOR_MASK, FIRST_UPPER_FLOOR, FLOORS, FLOOR_OFFSETS,
};
use wograld_core::Point;

use crate::error::{floor_index, layer_index, MapError, Result};
use crate::map_patch::MapPatch;
use crate::map_square::{layer_floor, FaceId, MapSquare, SquareChange};

/// Number of upper floors `erase_floor` accepts.
pub const UPPER_FLOORS: i32 = 3;

/// Largest accepted view coordinate and scroll offset, in either direction.
pub const MAX_COORDINATE: i32 = 1 << 20;

const COORDINATES: RangeInclusive<i32> = -MAX_COORDINATE..=MAX_COORDINATE;

#[derive(Debug, Default)]
pub struct ClientMap {
    patches: HashMap<(i32, i32), MapPatch>,
    offset: Point,
    /// Dirty squares in map coordinates.
    dirty: HashSet<Point>,
    /// Squares waiting for a face image, in map coordinates.
    pending_faces: HashMap<FaceId, HashSet<Point>>,
}

impl ClientMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    fn to_map(&self, x: i32, y: i32) -> Result<Point> {
        if !COORDINATES.contains(&x) || !COORDINATES.contains(&y) {
            return Err(MapError::OutOfRange { x, y });
        }
        Ok(Point::new(x - self.offset.x, y - self.offset.y))
    }

    /// Map position of view square `(x, y)` as drawn on `floor`.
    fn to_map_on_floor(&self, x: i32, y: i32, floor: usize) -> Result<Point> {
        let (ox, oy) = FLOOR_OFFSETS[floor];
        match (x.checked_add(ox), y.checked_add(oy)) {
            (Some(fx), Some(fy)) => self.to_map(fx, fy),
            _ => Err(MapError::OutOfRange { x, y }),
        }
    }

    fn square_at(&self, p: Point) -> Option<&MapSquare> {
        let (px, py) = MapPatch::index_of(p.x, p.y);
        self.patches.get(&(px, py)).map(|patch| patch.square(p.x, p.y))
    }

    fn existing_square_mut(&mut self, p: Point) -> Option<&mut MapSquare> {
        let (px, py) = MapPatch::index_of(p.x, p.y);
        self.patches
            .get_mut(&(px, py))
            .map(|patch| patch.square_mut(p.x, p.y))
    }

    fn square_at_mut(&mut self, p: Point) -> &mut MapSquare {
        let (px, py) = MapPatch::index_of(p.x, p.y);
        self.patches
            .entry((px, py))
            .or_insert_with(|| MapPatch::new(px, py))
            .square_mut(p.x, p.y)
    }

    fn mark(&mut self, p: Point, change: SquareChange) {
        if change.contains(SquareChange::DIRTY) {
            self.dirty.insert(p);
        }
    }

    /// Forgets everything and starts a map of the given view size.
    ///
    /// The two view corners start dirty on every floor so that a redraw
    /// covers the whole view.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.patches.clear();
        self.dirty.clear();
        self.pending_faces.clear();
        self.offset = Point::default();
        let far = (width.saturating_sub(1), height.saturating_sub(1));
        for floor in 0..FLOORS {
            for (x, y) in [(0, 0), far] {
                if let Ok(p) = self.to_map_on_floor(x, y, floor) {
                    self.dirty.insert(p);
                }
            }
        }
    }

    /// Marks the square at view position `(x, y)` for redraw.
    pub fn dirty(&mut self, x: i32, y: i32) -> Result<()> {
        let p = self.to_map(x, y)?;
        self.dirty.insert(p);
        Ok(())
    }

    pub fn is_dirty(&self, x: i32, y: i32) -> bool {
        self.to_map(x, y).is_ok_and(|p| self.dirty.contains(&p))
    }

    pub fn has_dirty_squares(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Drains the dirty set; the squares come back in view coordinates,
    /// row by row.
    pub fn take_dirty_squares(&mut self) -> Vec<Point> {
        let offset = self.offset;
        let mut squares: Vec<Point> = self
            .dirty
            .drain()
            .map(|p| p.offset(offset.x, offset.y))
            .collect();
        squares.sort_by_key(|p| (p.y, p.x));
        squares
    }

    /// Puts `floor` of a square into fog of war. The square is redrawn
    /// even if nothing changed.
    pub fn clear_square(&mut self, x: i32, y: i32, floor: i32) -> Result<()> {
        floor_index(floor)?;
        let p = self.to_map(x, y)?;
        if let Some(square) = self.existing_square_mut(p) {
            square.clear(floor)?;
        }
        self.dirty.insert(p);
        Ok(())
    }

    /// Stores a face. A face arriving on a fogged floor starts that floor
    /// afresh: darkness returns to default and the other layers empty.
    pub fn set_face(&mut self, x: i32, y: i32, layer: i32, face: Option<FaceId>) -> Result<()> {
        let floor = layer_floor(layer_index(layer)?);
        let p = self.to_map(x, y)?;
        let square = self.square_at_mut(p);
        let mut change = square.reset_fog_of_war(floor as i32)?;
        if change.contains(SquareChange::FOG_CLEARED) {
            change |= square.set_darkness(DEFAULT_DARKNESS, floor as i32)?;
            change |= square.clear_faces(floor);
        }
        change |= square.set_face(layer, face)?;
        self.mark(p, change);
        Ok(())
    }

    pub fn set_darkness(&mut self, x: i32, y: i32, darkness: u8, floor: i32) -> Result<()> {
        let index = floor_index(floor)?;
        let p = self.to_map(x, y)?;
        let square = self.square_at_mut(p);
        let mut change = square.set_darkness(darkness, floor)?;
        if change.contains(SquareChange::FOG_CLEARED) {
            change |= square.clear_faces(index);
        }
        self.mark(p, change);
        Ok(())
    }

    /// Stores a smoothing value. A change redraws the neighbours too,
    /// since smoothing bleeds into them.
    pub fn set_smooth(&mut self, x: i32, y: i32, layer: i32, smooth: u8) -> Result<()> {
        let floor = layer_floor(layer_index(layer)?);
        let p = self.to_map(x, y)?;
        let square = self.square_at_mut(p);
        let mut change = square.set_smooth(layer, smooth)?;
        if change.contains(SquareChange::FOG_CLEARED) {
            change |= square.clear_faces(floor);
        }
        self.mark(p, change);
        if change.contains(SquareChange::SMOOTH_CHANGED) {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    self.dirty.insert(p.offset(dx, dy));
                }
            }
        }
        Ok(())
    }

    /// Applies magic map colours; `rows[y][x]` belongs to view square
    /// `(x0 + x, y0 + y)`. Nothing is applied if any cell is out of range.
    pub fn set_magic_map(&mut self, x0: i32, y0: i32, rows: &[Vec<u8>]) -> Result<()> {
        let shifted = |base: i32, delta: usize| {
            i32::try_from(delta)
                .ok()
                .and_then(|delta| base.checked_add(delta))
        };
        let mut cells = Vec::new();
        for (dy, row) in rows.iter().enumerate() {
            for (dx, &byte) in row.iter().enumerate() {
                let (Some(x), Some(y)) = (shifted(x0, dx), shifted(y0, dy)) else {
                    return Err(MapError::OutOfRange { x: x0, y: y0 });
                };
                cells.push((self.to_map(x, y)?, byte & FACE_COLOR_MASK));
            }
        }

        for (p, color) in cells {
            let square = self.square_at_mut(p);
            let mut change = square.set_color(color);
            if change.contains(SquareChange::FOG_CLEARED) {
                change |= square.clear_faces(0);
            }
            self.mark(p, change);
        }
        Ok(())
    }

    pub fn square(&self, x: i32, y: i32) -> Option<&MapSquare> {
        self.to_map(x, y).ok().and_then(|p| self.square_at(p))
    }

    /// The square, unless it waits for a redraw.
    pub fn square_unless_dirty(&self, x: i32, y: i32) -> Option<&MapSquare> {
        if self.is_dirty(x, y) {
            None
        } else {
            self.square(x, y)
        }
    }

    pub fn is_fog_of_war(&self, x: i32, y: i32, floor: i32) -> Result<bool> {
        match self.square_at(self.to_map(x, y)?) {
            Some(square) => square.is_fog_of_war(floor),
            None => floor_index(floor).map(|_| false),
        }
    }

    pub fn darkness(&self, x: i32, y: i32, floor: i32) -> Result<u8> {
        match self.square_at(self.to_map(x, y)?) {
            Some(square) => square.darkness(floor),
            None => floor_index(floor).map(|_| DEFAULT_DARKNESS),
        }
    }

    pub fn smooth(&self, x: i32, y: i32, layer: i32) -> Result<u8> {
        match self.square_at(self.to_map(x, y)?) {
            Some(square) => square.smooth(layer),
            None => layer_index(layer).map(|_| DEFAULT_SMOOTH),
        }
    }

    pub fn face(&self, x: i32, y: i32, layer: i32) -> Result<Option<FaceId>> {
        match self.square_at(self.to_map(x, y)?) {
            Some(square) => square.face(layer),
            None => layer_index(layer).map(|_| None),
        }
    }

    pub fn color(&self, x: i32, y: i32) -> Option<u8> {
        self.square(x, y).and_then(MapSquare::color)
    }

    /// Remembers that the square shows `face` before its image is known.
    pub fn square_pending_face(&mut self, x: i32, y: i32, face: FaceId) -> Result<()> {
        let p = self.to_map(x, y)?;
        self.pending_faces.entry(face).or_default().insert(p);
        Ok(())
    }

    /// The image of `face` arrived: redraw every view square showing it on
    /// any floor and every square that waited for it.
    pub fn update_face(&mut self, face: FaceId, width: i32, height: i32) {
        for floor in 0..FLOORS {
            for y in 0..height {
                for x in 0..width {
                    let Ok(p) = self.to_map_on_floor(x, y, floor) else {
                        continue;
                    };
                    if self
                        .square_at(p)
                        .is_some_and(|square| square.floor_shows_face(floor, face))
                    {
                        self.dirty.insert(p);
                    }
                }
            }
        }
        if let Some(pending) = self.pending_faces.remove(&face) {
            self.dirty.extend(pending);
        }
    }

    /// Empties the faces of `floor` at view position `(x, y)`, shifted by the
    /// floor's offset.
    fn clear_view_faces(&mut self, x: i32, y: i32, floor: usize) {
        let Ok(p) = self.to_map_on_floor(x, y, floor) else {
            return;
        };
        if let Some(square) = self.existing_square_mut(p) {
            let change = square.clear_faces(floor);
            self.mark(p, change);
        }
    }

    fn clear_view_column(&mut self, x: i32, height: i32) {
        for y in 0..height {
            for floor in 0..FLOORS {
                self.clear_view_faces(x, y, floor);
            }
        }
    }

    fn clear_view_row(&mut self, y: i32, width: i32) {
        for x in 0..width {
            for floor in 0..FLOORS {
                self.clear_view_faces(x, y, floor);
            }
        }
    }

    /// Scrolls the view by `(dx, dy)` squares.
    ///
    /// A jump of a whole view or more empties every face in view and
    /// returns `true`; the caller redraws everything. Smaller scrolls move
    /// one square at a time and empty the faces of the edge that left the
    /// view and of the edge that entered it. A scroll that would move the
    /// offset past `MAX_COORDINATE` is rejected.
    pub fn process_map_scroll(&mut self, dx: i32, dy: i32, width: i32, height: i32) -> Result<bool> {
        let target = match (self.offset.x.checked_sub(dx), self.offset.y.checked_sub(dy)) {
            (Some(ox), Some(oy)) if COORDINATES.contains(&ox) && COORDINATES.contains(&oy) => {
                Point::new(ox, oy)
            }
            _ => return Err(MapError::InvalidScroll { dx, dy }),
        };

        if i64::from(dx).abs() >= i64::from(width) || i64::from(dy).abs() >= i64::from(height) {
            self.offset = target;
            for y in 0..height {
                for x in 0..width {
                    for floor in 0..FLOORS {
                        self.clear_view_faces(x, y, floor);
                    }
                }
            }
            return Ok(true);
        }

        let last_column = width.saturating_sub(1);
        let last_row = height.saturating_sub(1);
        for _ in 0..dx.max(0) {
            self.offset.x -= 1;
            self.clear_view_column(-1, height);
            self.clear_view_column(last_column, height);
        }
        for _ in 0..dx.min(0).unsigned_abs() {
            self.offset.x += 1;
            self.clear_view_column(0, height);
            self.clear_view_column(width, height);
        }
        for _ in 0..dy.max(0) {
            self.offset.y -= 1;
            self.clear_view_row(-1, width);
            self.clear_view_row(last_row, width);
        }
        for _ in 0..dy.min(0).unsigned_abs() {
            self.offset.y += 1;
            self.clear_view_row(0, width);
            self.clear_view_row(height, width);
        }
        Ok(false)
    }

    /// Empties upper floor `upper_floor` (1..=3) across the view.
    pub fn erase_floor(&mut self, upper_floor: i32, width: i32, height: i32) -> Result<()> {
        if !(1..=UPPER_FLOORS).contains(&upper_floor) {
            return Err(MapError::InvalidFloor(upper_floor));
        }
        let floor = FIRST_UPPER_FLOOR + upper_floor as usize - 1;
        for y in 0..height {
            for x in 0..width {
                self.clear_view_faces(x, y, floor);
            }
        }
        Ok(())
    }

    /// Current view position of a square.
    pub fn view_position(&self, square: &MapSquare) -> Point {
        Point::new(square.x(), square.y()).offset(self.offset.x, self.offset.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(width: i32, height: i32) -> ClientMap {
        let mut map = ClientMap::new();
        map.reset(width, height);
        map.take_dirty_squares();
        map
    }

    #[test]
    fn reset_dirties_view_corners_on_every_floor() {
        let mut map = ClientMap::new();
        map.reset(5, 4);
        let dirty = map.take_dirty_squares();
        assert!(dirty.contains(&Point::new(0, 0)));
        assert!(dirty.contains(&Point::new(4, 3)));
        assert!(dirty.contains(&Point::new(-3, 3)));
        assert!(dirty.contains(&Point::new(7, 0)));
        assert_eq!(dirty.len(), 14);
        assert!(map.take_dirty_squares().is_empty());
    }

    #[test]
    fn unknown_squares_read_as_defaults() {
        let map = map(3, 3);
        assert_eq!(map.darkness(100, -4, 2).unwrap(), DEFAULT_DARKNESS);
        assert_eq!(map.face(1, 1, 20).unwrap(), None);
        assert!(!map.is_fog_of_war(0, 0, 6).unwrap());
        assert_eq!(map.face(1, 1, 21), Err(MapError::InvalidLayer(21)));
        assert!(map.square(1, 1).is_none());
    }

    #[test]
    fn face_on_fogged_floor_starts_afresh() {
        let mut map = map(5, 5);
        map.set_face(2, 2, 0, Some(FaceId(1))).unwrap();
        map.set_face(2, 2, 1, Some(FaceId(2))).unwrap();
        map.set_darkness(2, 2, 90, 0).unwrap();
        map.clear_square(2, 2, 0).unwrap();
        assert!(map.is_fog_of_war(2, 2, 0).unwrap());
        map.take_dirty_squares();

        map.set_face(2, 2, 2, Some(FaceId(3))).unwrap();
        assert!(!map.is_fog_of_war(2, 2, 0).unwrap());
        assert_eq!(map.darkness(2, 2, 0).unwrap(), DEFAULT_DARKNESS);
        assert_eq!(map.face(2, 2, 0).unwrap(), None);
        assert_eq!(map.face(2, 2, 1).unwrap(), None);
        assert_eq!(map.face(2, 2, 2).unwrap(), Some(FaceId(3)));
        assert_eq!(map.take_dirty_squares(), vec![Point::new(2, 2)]);
    }

    #[test]
    fn darkness_on_fogged_floor_drops_faces() {
        let mut map = map(5, 5);
        map.set_face(1, 1, 4, Some(FaceId(8))).unwrap();
        map.clear_square(1, 1, 1).unwrap();
        map.set_darkness(1, 1, 30, 1).unwrap();
        assert_eq!(map.face(1, 1, 4).unwrap(), None);
        assert_eq!(map.darkness(1, 1, 1).unwrap(), 30);
    }

    #[test]
    fn clear_square_always_dirties() {
        let mut map = map(4, 4);
        map.clear_square(3, 0, 0).unwrap();
        assert!(!map.is_fog_of_war(3, 0, 0).unwrap());
        assert_eq!(map.take_dirty_squares(), vec![Point::new(3, 0)]);
        assert_eq!(map.clear_square(0, 0, 9), Err(MapError::InvalidFloor(9)));
    }

    #[test]
    fn smooth_change_dirties_neighbourhood() {
        let mut map = map(5, 5);
        map.set_smooth(2, 2, 0, 4).unwrap();
        assert_eq!(map.take_dirty_squares().len(), 9);
        map.set_smooth(2, 2, 0, 4).unwrap();
        assert!(map.take_dirty_squares().is_empty());
    }

    #[test]
    fn magic_map_uses_origin_and_mask() {
        let mut map = map(6, 6);
        map.set_magic_map(2, 3, &[vec![0x31, 0x02], vec![0x0F]]).unwrap();
        assert_eq!(map.color(2, 3), Some(1));
        assert_eq!(map.color(3, 3), Some(2));
        assert_eq!(map.color(2, 4), Some(15));
        assert_eq!(map.color(0, 0), None);
        assert_eq!(
            map.take_dirty_squares(),
            vec![Point::new(2, 3), Point::new(3, 3), Point::new(2, 4)]
        );
    }

    #[test]
    fn dirty_squares_come_back_row_major() {
        let mut map = map(5, 5);
        map.dirty(4, 0).unwrap();
        map.dirty(0, 1).unwrap();
        map.dirty(1, 0).unwrap();
        assert_eq!(
            map.take_dirty_squares(),
            vec![Point::new(1, 0), Point::new(4, 0), Point::new(0, 1)]
        );
        assert!(map.take_dirty_squares().is_empty());
    }

    #[test]
    fn square_unless_dirty_hides_pending_redraws() {
        let mut map = map(3, 3);
        map.set_face(1, 1, 0, Some(FaceId(5))).unwrap();
        assert!(map.square_unless_dirty(1, 1).is_none());
        map.take_dirty_squares();
        assert!(map.square_unless_dirty(1, 1).is_some());
    }

    #[test]
    fn update_face_dirties_showing_and_pending_squares() {
        let mut map = map(4, 4);
        map.set_face(0, 0, 0, Some(FaceId(7))).unwrap();
        map.set_face(3, 3, 0, Some(FaceId(6))).unwrap();
        map.square_pending_face(2, 1, FaceId(7)).unwrap();
        map.take_dirty_squares();

        map.update_face(FaceId(7), 4, 4);
        assert_eq!(
            map.take_dirty_squares(),
            vec![Point::new(0, 0), Point::new(2, 1)]
        );
        map.update_face(FaceId(7), 4, 4);
        assert_eq!(map.take_dirty_squares(), vec![Point::new(0, 0)]);
    }

    #[test]
    fn scroll_keeps_squares_at_map_position() {
        let mut map = map(5, 5);
        map.set_darkness(2, 2, 17, 0).unwrap();
        assert!(!map.process_map_scroll(1, 0, 5, 5).unwrap());
        assert_eq!(map.offset(), Point::new(-1, 0));
        assert_eq!(map.darkness(1, 2, 0).unwrap(), 17);
        assert_eq!(map.darkness(2, 2, 0).unwrap(), DEFAULT_DARKNESS);

        assert!(!map.process_map_scroll(-1, -2, 5, 5).unwrap());
        assert_eq!(map.offset(), Point::new(0, 2));
        assert_eq!(map.darkness(2, 4, 0).unwrap(), 17);
    }

    #[test]
    fn scroll_empties_entering_edge() {
        let mut map = map(5, 5);
        // map column 5 is just outside the view and enters it when scrolling east
        map.set_face(5, 1, 0, Some(FaceId(3))).unwrap();
        map.set_face(2, 1, 0, Some(FaceId(4))).unwrap();
        map.process_map_scroll(1, 0, 5, 5).unwrap();
        assert_eq!(map.face(4, 1, 0).unwrap(), None);
        assert_eq!(map.face(1, 1, 0).unwrap(), Some(FaceId(4)));
    }

    #[test]
    fn big_scroll_empties_view() {
        let mut map = map(4, 4);
        map.set_face(1, 1, 0, Some(FaceId(1))).unwrap();
        map.set_face(3, 3, 3, Some(FaceId(2))).unwrap();
        assert!(map.process_map_scroll(4, 0, 4, 4).unwrap());
        assert_eq!(map.offset(), Point::new(-4, 0));
        for y in 0..4 {
            for x in 0..4 {
                for layer in 0..3 {
                    assert_eq!(map.face(x, y, layer).unwrap(), None);
                }
            }
        }
    }

    #[test]
    fn erase_floor_only_touches_upper_floor() {
        let mut map = map(3, 3);
        // upper floor 1 is floor 4, offset (1, -1)
        map.set_face(2, 0, 12, Some(FaceId(9))).unwrap();
        map.set_face(1, 1, 0, Some(FaceId(1))).unwrap();
        map.erase_floor(1, 3, 3).unwrap();
        assert_eq!(map.face(2, 0, 12).unwrap(), None);
        assert_eq!(map.face(1, 1, 0).unwrap(), Some(FaceId(1)));
        assert_eq!(map.erase_floor(4, 3, 3), Err(MapError::InvalidFloor(4)));
        assert_eq!(map.erase_floor(0, 3, 3), Err(MapError::InvalidFloor(0)));
    }

    #[test]
    fn squares_report_view_position_after_scroll() {
        let mut map = map(5, 5);
        map.set_face(3, 3, 0, Some(FaceId(1))).unwrap();
        map.process_map_scroll(0, 1, 5, 5).unwrap();
        let square = map.square(3, 2).unwrap();
        assert_eq!(map.view_position(square), Point::new(3, 2));
    }

    #[test]
    fn update_face_finds_upper_floor_faces() {
        let mut map = map(4, 4);
        // layer 12 is floor 4, drawn at view (1, 1) with offset (1, -1)
        map.set_face(2, 0, 12, Some(FaceId(7))).unwrap();
        map.take_dirty_squares();

        map.update_face(FaceId(7), 4, 4);
        assert_eq!(map.take_dirty_squares(), vec![Point::new(2, 0)]);
    }

    #[test]
    fn coordinates_beyond_limit_are_rejected() {
        let mut map = map(4, 4);
        let far = MAX_COORDINATE + 1;
        assert_eq!(
            map.set_face(i32::MAX, 0, 12, Some(FaceId(1))),
            Err(MapError::OutOfRange { x: i32::MAX, y: 0 })
        );
        assert_eq!(map.dirty(0, -far), Err(MapError::OutOfRange { x: 0, y: -far }));
        assert!(map.square(i32::MIN, i32::MIN).is_none());
        assert!(!map.is_dirty(i32::MAX, 0));
        assert!(!map.has_dirty_squares());
    }

    #[test]
    fn magic_map_past_limit_applies_nothing() {
        let mut map = map(4, 4);
        let rows = [vec![1, 2, 3]];
        assert!(map.set_magic_map(MAX_COORDINATE - 1, 0, &rows).is_err());
        assert!(map.set_magic_map(i32::MAX, 0, &rows).is_err());
        assert_eq!(map.color(MAX_COORDINATE - 1, 0), None);
        assert!(!map.has_dirty_squares());
    }

    #[test]
    fn scroll_past_limit_is_rejected() {
        let mut map = map(4, 4);
        map.set_face(1, 1, 0, Some(FaceId(1))).unwrap();
        assert_eq!(
            map.process_map_scroll(i32::MIN, 0, 4, 4),
            Err(MapError::InvalidScroll { dx: i32::MIN, dy: 0 })
        );
        assert_eq!(
            map.process_map_scroll(0, MAX_COORDINATE + 1, 4, 4),
            Err(MapError::InvalidScroll { dx: 0, dy: MAX_COORDINATE + 1 })
        );
        assert_eq!(map.offset(), Point::new(0, 0));
        assert_eq!(map.face(1, 1, 0).unwrap(), Some(FaceId(1)));

        assert!(map.process_map_scroll(-MAX_COORDINATE, 0, 4, 4).unwrap());
        assert_eq!(map.offset(), Point::new(MAX_COORDINATE, 0));
    }
}
