use crate::map_square::MapSquare;

/// log2 of the patch edge length.
pub const PATCH_SIZE_LOG: u32 = 5;
/// Edge length of a patch in squares.
pub const PATCH_SIZE: i32 = 1 << PATCH_SIZE_LOG;

/// A fixed block of `PATCH_SIZE` x `PATCH_SIZE` squares of the client map.
#[derive(Debug, Clone)]
pub struct MapPatch {
    squares: Vec<MapSquare>,
}

impl MapPatch {
    /// Creates the empty patch with index `(px, py)`.
    pub fn new(px: i32, py: i32) -> Self {
        let (x0, y0) = (px << PATCH_SIZE_LOG, py << PATCH_SIZE_LOG);
        let squares = (0..PATCH_SIZE)
            .flat_map(|y| (0..PATCH_SIZE).map(move |x| MapSquare::new(x0 + x, y0 + y)))
            .collect();
        Self { squares }
    }

    /// Patch index holding map coordinates `(x, y)`; negative coordinates
    /// round towards negative infinity.
    pub fn index_of(x: i32, y: i32) -> (i32, i32) {
        (x >> PATCH_SIZE_LOG, y >> PATCH_SIZE_LOG)
    }

    fn slot(x: i32, y: i32) -> usize {
        let mask = PATCH_SIZE - 1;
        ((y & mask) * PATCH_SIZE + (x & mask)) as usize
    }

    /// Square at map coordinates `(x, y)`, which must lie in this patch.
    pub fn square(&self, x: i32, y: i32) -> &MapSquare {
        &self.squares[Self::slot(x, y)]
    }

    pub fn square_mut(&mut self, x: i32, y: i32) -> &mut MapSquare {
        &mut self.squares[Self::slot(x, y)]
    }
}
