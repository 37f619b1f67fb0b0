//! Client side map state: the squares the server streamed to the player,
//! their fog of war and lighting, and the batching of redraws.

pub mod clump;
pub mod error;
pub mod map;
pub mod map_patch;
pub mod map_square;
pub mod map_updater;
pub mod settings;

pub use clump::{group_into_clumps, Clump};
pub use error::{MapError, SettingsError};
pub use map::ClientMap;
pub use map_square::{FaceId, FloorState, MapSquare, SquareChange};
pub use map_updater::{MapCommand, MapUpdateListener, MapUpdater, MAX_MAP_SIZE};
pub use settings::ClientSettings;
