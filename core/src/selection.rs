use serde::{Deserialize, Serialize};

/// How a selected area combines with the existing selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Add the area to the selection.
    #[default]
    Add,
    /// Remove the area from the selection.
    Sub,
    /// Invert the selection within the area.
    Flip,
}
