//! One square of the client map: faces, smoothing and per-floor lighting.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use wograld_core::constants::{
    DEFAULT_DARKNESS, DEFAULT_SMOOTH, FLOORS, LAYERS_PER_FLOOR, NUM_LAYERS,
};

use crate::error::{floor_index, layer_index, Result};

/// Face number as sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

bitflags! {
    /// What a square mutation did.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SquareChange: u8 {
        /// the square must be redrawn
        const DIRTY = 1 << 0;
        /// the floor was in fog of war and no longer is
        const FOG_CLEARED = 1 << 1;
        /// the smoothing value of a layer changed
        const SMOOTH_CHANGED = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorState {
    pub fog_of_war: bool,
    pub darkness: u8,
}

impl Default for FloorState {
    fn default() -> Self {
        Self {
            fog_of_war: false,
            darkness: DEFAULT_DARKNESS,
        }
    }
}

/// Floor a layer belongs to.
pub fn layer_floor(layer: usize) -> usize {
    layer / LAYERS_PER_FLOOR
}

/// Layer indices of one floor.
pub fn floor_layers(floor: usize) -> std::ops::Range<usize> {
    floor * LAYERS_PER_FLOOR..(floor + 1) * LAYERS_PER_FLOOR
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSquare {
    x: i32,
    y: i32,
    floors: [FloorState; FLOORS],
    faces: [Option<FaceId>; NUM_LAYERS],
    smooths: [u8; NUM_LAYERS],
    /// Magic map colour; `None` until the square was magic mapped.
    color: Option<u8>,
}

impl MapSquare {
    /// Creates an empty square at map coordinates `(x, y)`.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            floors: [FloorState::default(); FLOORS],
            faces: [None; NUM_LAYERS],
            smooths: [DEFAULT_SMOOTH; NUM_LAYERS],
            color: None,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn floor(&self, floor: i32) -> Result<&FloorState> {
        Ok(&self.floors[floor_index(floor)?])
    }

    pub fn is_fog_of_war(&self, floor: i32) -> Result<bool> {
        Ok(self.floor(floor)?.fog_of_war)
    }

    pub fn darkness(&self, floor: i32) -> Result<u8> {
        Ok(self.floor(floor)?.darkness)
    }

    pub fn face(&self, layer: i32) -> Result<Option<FaceId>> {
        Ok(self.faces[layer_index(layer)?])
    }

    pub fn smooth(&self, layer: i32) -> Result<u8> {
        Ok(self.smooths[layer_index(layer)?])
    }

    pub fn color(&self) -> Option<u8> {
        self.color
    }

    /// True if any layer of `floor` shows a face.
    fn has_faces(&self, floor: usize) -> bool {
        self.faces[floor_layers(floor)].iter().any(Option::is_some)
    }

    /// Puts `floor` into fog of war.
    ///
    /// A square that is already fogged, or that has nothing to remember on
    /// this floor, stays as it is.
    pub fn clear(&mut self, floor: i32) -> Result<SquareChange> {
        let floor = floor_index(floor)?;
        let state = self.floors[floor];
        if state.fog_of_war || (state.darkness == DEFAULT_DARKNESS && !self.has_faces(floor)) {
            return Ok(SquareChange::empty());
        }
        self.floors[floor].fog_of_war = true;
        Ok(SquareChange::DIRTY)
    }

    pub fn set_darkness(&mut self, darkness: u8, floor: i32) -> Result<SquareChange> {
        let floor = floor_index(floor)?;
        let state = &mut self.floors[floor];
        let mut change = SquareChange::empty();
        if state.fog_of_war {
            state.fog_of_war = false;
            change |= SquareChange::FOG_CLEARED | SquareChange::DIRTY;
        }
        if state.darkness != darkness {
            state.darkness = darkness;
            change |= SquareChange::DIRTY;
        }
        Ok(change)
    }

    /// Sets the smoothing of `layer`; clears the fog of the layer's floor.
    pub fn set_smooth(&mut self, layer: i32, smooth: u8) -> Result<SquareChange> {
        let layer = layer_index(layer)?;
        let state = &mut self.floors[layer_floor(layer)];
        let mut change = SquareChange::empty();
        if state.fog_of_war {
            state.fog_of_war = false;
            change |= SquareChange::FOG_CLEARED | SquareChange::DIRTY;
        }
        if self.smooths[layer] != smooth {
            self.smooths[layer] = smooth;
            change |= SquareChange::SMOOTH_CHANGED | SquareChange::DIRTY;
        }
        Ok(change)
    }

    /// Stores a magic map colour. Magic mapping reveals the ground floor.
    pub fn set_color(&mut self, color: u8) -> SquareChange {
        let mut change = SquareChange::empty();
        let ground = &mut self.floors[0];
        if ground.fog_of_war {
            ground.fog_of_war = false;
            change |= SquareChange::FOG_CLEARED | SquareChange::DIRTY;
        }
        if self.color != Some(color) {
            self.color = Some(color);
            change |= SquareChange::DIRTY;
        }
        change
    }

    pub fn set_face(&mut self, layer: i32, face: Option<FaceId>) -> Result<SquareChange> {
        let layer = layer_index(layer)?;
        if self.faces[layer] == face {
            return Ok(SquareChange::empty());
        }
        self.faces[layer] = face;
        Ok(SquareChange::DIRTY)
    }

    /// Lifts the fog of war of `floor`, if any.
    pub fn reset_fog_of_war(&mut self, floor: i32) -> Result<SquareChange> {
        let state = &mut self.floors[floor_index(floor)?];
        if !state.fog_of_war {
            return Ok(SquareChange::empty());
        }
        state.fog_of_war = false;
        Ok(SquareChange::FOG_CLEARED | SquareChange::DIRTY)
    }

    /// True if a layer of `floor`, which must be a valid index, shows `face`.
    pub(crate) fn floor_shows_face(&self, floor: usize, face: FaceId) -> bool {
        self.faces[floor_layers(floor)].contains(&Some(face))
    }

    /// Empties every layer of `floor`, which must be a valid index.
    pub(crate) fn clear_faces(&mut self, floor: usize) -> SquareChange {
        let mut change = SquareChange::empty();
        for face in &mut self.faces[floor_layers(floor)] {
            if face.take().is_some() {
                change = SquareChange::DIRTY;
            }
        }
        change
    }

    /// True if the square holds nothing worth drawing on `floor`.
    pub fn is_empty_floor(&self, floor: i32) -> Result<bool> {
        let index = floor_index(floor)?;
        Ok(!self.has_faces(index))
    }
}
