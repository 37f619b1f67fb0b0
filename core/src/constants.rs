use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// =============================================================================
// Map grid flags
// =============================================================================

bitflags! {
    /// Per-square flags of the editor map grid.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct GridFlags: u32 {
        /// square is selected
        const SELECTION = 1 << 0;
        /// square is pre-selected while a selection is being dragged
        const SELECTING = 1 << 1;
        /// highlighted as information
        const INFORMATION = 1 << 2;
        /// highlighted as warning
        const WARNING = 1 << 3;
        /// highlighted as error
        const ERROR = 1 << 4;
        /// highlighted as fatal
        const FATAL = 1 << 5;
        /// part of a connection group
        const CONNECTION = 1 << 6;
        /// map cursor position; normally set on at most one square
        const CURSOR = 1 << 7;
        /// selected square on the north edge of the selected area
        const SELECTION_NORTH = 1 << 8;
        /// selected square on the east edge of the selected area
        const SELECTION_EAST = 1 << 9;
        /// selected square on the south edge of the selected area
        const SELECTION_SOUTH = 1 << 10;
        /// selected square on the west edge of the selected area
        const SELECTION_WEST = 1 << 11;

        /// all four edge flags; derived from the selection, never set by callers
        const SELECTION_BORDERS = Self::SELECTION_NORTH.bits()
            | Self::SELECTION_EAST.bits()
            | Self::SELECTION_SOUTH.bits()
            | Self::SELECTION_WEST.bits();

        /// all validation highlights
        const HIGHLIGHTS = Self::INFORMATION.bits()
            | Self::WARNING.bits()
            | Self::ERROR.bits()
            | Self::FATAL.bits()
            | Self::CONNECTION.bits();
    }
}

/// Highlight levels a validator can put on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightLevel {
    Information,
    Warning,
    Error,
    Fatal,
    Connection,
}

impl HighlightLevel {
    pub fn flag(self) -> GridFlags {
        match self {
            HighlightLevel::Information => GridFlags::INFORMATION,
            HighlightLevel::Warning => GridFlags::WARNING,
            HighlightLevel::Error => GridFlags::ERROR,
            HighlightLevel::Fatal => GridFlags::FATAL,
            HighlightLevel::Connection => GridFlags::CONNECTION,
        }
    }
}

// =============================================================================
// Client map layout
// =============================================================================

/// Number of floors a client map square tracks.
pub const FLOORS: usize = 7;
/// Number of face layers belonging to one floor.
pub const LAYERS_PER_FLOOR: usize = 3;
/// Total number of face layers of a map square.
pub const NUM_LAYERS: usize = FLOORS * LAYERS_PER_FLOOR;

/// Darkness of a fully lit square.
pub const DEFAULT_DARKNESS: u8 = 255;
pub const DEFAULT_SMOOTH: u8 = 0;

/// Bits of a magic map byte holding the colour index.
pub const FACE_COLOR_MASK: u8 = 0x0F;

/// Isometric offset of each floor, added to a view position to get the map position.
///
/// Floors 4..6 are the upper floors 1..3.
pub const FLOOR_OFFSETS: [(i32, i32); FLOORS] = [
    (0, 0),
    (-1, 1),
    (-2, 2),
    (-3, 3),
    (1, -1),
    (2, -2),
    (3, -3),
];

/// First floor index used for upper floor 1.
pub const FIRST_UPPER_FLOOR: usize = 4;
