//! Applies the server's map protocol to a [`ClientMap`] and tells the
//! renderer what to redraw.

use serde::{Deserialize, Serialize};
use wograld_core::constants::FLOOR_OFFSETS;
use wograld_core::events::ListenerList;
use wograld_core::{ListenerId, Point};

use crate::error::{floor_index, layer_index, MapError, Result};
use crate::map::ClientMap;
use crate::map_square::{layer_floor, FaceId};

/// Default view size until the server announces one.
pub const DEFAULT_MAP_WIDTH: i32 = 25;
pub const DEFAULT_MAP_HEIGHT: i32 = 25;

/// Largest view width or height `new_map` accepts.
pub const MAX_MAP_SIZE: i32 = 1024;

/// Receives map updates. All methods default to doing nothing.
pub trait MapUpdateListener: Send {
    /// A batch of updates ended; `squares` are the view squares to redraw.
    fn map_changed(&mut self, _map: &ClientMap, _squares: &[Point]) {}

    /// The map was reset.
    fn new_map(&mut self, _width: i32, _height: i32) {}

    fn map_scrolled(&mut self, _dx: i32, _dy: i32) {}

    /// Fired before `new_map` when the view size differs from the previous one.
    fn map_size_changed(&mut self, _width: i32, _height: i32) {}
}

/// One map command as received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MapCommand {
    NewMap {
        width: i32,
        height: i32,
    },
    Face {
        x: i32,
        y: i32,
        layer: i32,
        face: Option<FaceId>,
    },
    Clear {
        x: i32,
        y: i32,
        floor: i32,
    },
    Darkness {
        x: i32,
        y: i32,
        darkness: u8,
        floor: i32,
    },
    Smooth {
        x: i32,
        y: i32,
        layer: i32,
        smooth: u8,
    },
    MagicMap {
        x: i32,
        y: i32,
        rows: Vec<Vec<u8>>,
    },
    Scroll {
        dx: i32,
        dy: i32,
    },
    EraseFloor {
        upper_floor: i32,
    },
    FaceUpdated {
        face: FaceId,
    },
    End,
}

#[derive(Debug)]
pub struct MapUpdater {
    map: ClientMap,
    width: i32,
    height: i32,
    listeners: ListenerList<dyn MapUpdateListener>,
}

impl Default for MapUpdater {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT)
    }
}

/// View position of `(x, y)` drawn on `floor`.
fn floor_position(x: i32, y: i32, floor: usize) -> Result<(i32, i32)> {
    let (ox, oy) = FLOOR_OFFSETS[floor];
    match (x.checked_add(ox), y.checked_add(oy)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(MapError::OutOfRange { x, y }),
    }
}

fn drop_invalid(command: &str, result: Result<()>) {
    if let Err(err) = result {
        log::warn!("ignoring {command} command: {err}");
    }
}

impl MapUpdater {
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = ClientMap::new();
        map.reset(width, height);
        Self {
            map,
            width,
            height,
            listeners: ListenerList::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn MapUpdateListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn map(&self) -> &ClientMap {
        &self.map
    }

    pub fn map_width(&self) -> i32 {
        self.width
    }

    pub fn map_height(&self) -> i32 {
        self.height
    }

    /// Starts a new map of the given view size. Sizes outside
    /// `1..=MAX_MAP_SIZE` are dropped.
    pub fn new_map(&mut self, width: i32, height: i32) {
        let sizes = 1..=MAX_MAP_SIZE;
        if !sizes.contains(&width) || !sizes.contains(&height) {
            drop_invalid("new map", Err(MapError::InvalidMapSize { width, height }));
            return;
        }
        log::debug!("new map {width}x{height}");
        let resized = width != self.width || height != self.height;
        self.width = width;
        self.height = height;
        self.map.reset(width, height);
        if resized {
            self.listeners.for_each(|l| l.map_size_changed(width, height));
        }
        self.listeners.for_each(|l| l.new_map(width, height));
    }

    /// Starts over with the current view size.
    pub fn reset(&mut self) {
        self.new_map(self.width, self.height);
    }

    pub fn map_face(&mut self, x: i32, y: i32, layer: i32, face: Option<FaceId>) {
        let result = layer_index(layer).and_then(|index| {
            let (x, y) = floor_position(x, y, layer_floor(index))?;
            self.map.set_face(x, y, layer, face)
        });
        drop_invalid("face", result);
    }

    pub fn map_clear(&mut self, x: i32, y: i32, floor: i32) {
        let result = floor_index(floor).and_then(|index| {
            let (x, y) = floor_position(x, y, index)?;
            self.map.clear_square(x, y, floor)
        });
        drop_invalid("clear", result);
    }

    pub fn map_darkness(&mut self, x: i32, y: i32, darkness: u8, floor: i32) {
        let result = floor_index(floor).and_then(|index| {
            let (x, y) = floor_position(x, y, index)?;
            self.map.set_darkness(x, y, darkness, floor)
        });
        drop_invalid("darkness", result);
    }

    pub fn map_smooth(&mut self, x: i32, y: i32, layer: i32, smooth: u8) {
        let result = layer_index(layer).and_then(|index| {
            let (x, y) = floor_position(x, y, layer_floor(index))?;
            self.map.set_smooth(x, y, layer, smooth)
        });
        drop_invalid("smooth", result);
    }

    pub fn magic_map(&mut self, x: i32, y: i32, rows: &[Vec<u8>]) {
        let result = self.map.set_magic_map(x, y, rows);
        drop_invalid("magic map", result);
    }

    pub fn map_scroll(&mut self, dx: i32, dy: i32) {
        match self.map.process_map_scroll(dx, dy, self.width, self.height) {
            Ok(true) => log::debug!("scroll by ({dx}, {dy}) replaced the whole view"),
            Ok(false) => {}
            Err(err) => return drop_invalid("scroll", Err(err)),
        }
        self.listeners.for_each(|l| l.map_scrolled(dx, dy));
    }

    pub fn erase_floor(&mut self, upper_floor: i32) {
        let result = self.map.erase_floor(upper_floor, self.width, self.height);
        drop_invalid("erase floor", result);
    }

    /// The image of `face` became available.
    pub fn face_updated(&mut self, face: FaceId) {
        self.map.update_face(face, self.width, self.height);
        self.map_end();
    }

    /// Ends a batch of updates; listeners are told even if nothing changed.
    pub fn map_end(&mut self) {
        let squares = self.map.take_dirty_squares();
        let map = &self.map;
        self.listeners.for_each(|l| l.map_changed(map, &squares));
    }

    /// Like [`MapUpdater::map_end`], but stays quiet if nothing changed.
    pub fn map_end_if_dirty(&mut self) {
        if self.map.has_dirty_squares() {
            self.map_end();
        }
    }

    pub fn apply(&mut self, command: &MapCommand) {
        match command {
            MapCommand::NewMap { width, height } => self.new_map(*width, *height),
            MapCommand::Face { x, y, layer, face } => self.map_face(*x, *y, *layer, *face),
            MapCommand::Clear { x, y, floor } => self.map_clear(*x, *y, *floor),
            MapCommand::Darkness {
                x,
                y,
                darkness,
                floor,
            } => self.map_darkness(*x, *y, *darkness, *floor),
            MapCommand::Smooth {
                x,
                y,
                layer,
                smooth,
            } => self.map_smooth(*x, *y, *layer, *smooth),
            MapCommand::MagicMap { x, y, rows } => self.magic_map(*x, *y, rows),
            MapCommand::Scroll { dx, dy } => self.map_scroll(*dx, *dy),
            MapCommand::EraseFloor { upper_floor } => self.erase_floor(*upper_floor),
            MapCommand::FaceUpdated { face } => self.face_updated(*face),
            MapCommand::End => self.map_end(),
        }
    }
}
