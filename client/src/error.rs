use thiserror::Error;

/// Rejected client map input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("invalid floor {0}")]
    InvalidFloor(i32),
    #[error("invalid layer {0}")]
    InvalidLayer(i32),
    #[error("coordinates ({x}, {y}) out of range")]
    OutOfRange { x: i32, y: i32 },
    #[error("scroll by ({dx}, {dy}) leaves the coordinate range")]
    InvalidScroll { dx: i32, dy: i32 },
    #[error("invalid map size {width}x{height}")]
    InvalidMapSize { width: i32, height: i32 },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Checks a floor index coming from the server.
pub fn floor_index(floor: i32) -> Result<usize> {
    usize::try_from(floor)
        .ok()
        .filter(|&f| f < wograld_core::constants::FLOORS)
        .ok_or(MapError::InvalidFloor(floor))
}

/// Checks a layer index coming from the server.
pub fn layer_index(layer: i32) -> Result<usize> {
    usize::try_from(layer)
        .ok()
        .filter(|&l| l < wograld_core::constants::NUM_LAYERS)
        .ok_or(MapError::InvalidLayer(layer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_range_checked() {
        assert_eq!(floor_index(6), Ok(6));
        assert_eq!(floor_index(7), Err(MapError::InvalidFloor(7)));
        assert_eq!(floor_index(-1), Err(MapError::InvalidFloor(-1)));
        assert_eq!(layer_index(20), Ok(20));
        assert_eq!(layer_index(21), Err(MapError::InvalidLayer(21)));
    }
}
