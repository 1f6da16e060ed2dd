use thiserror::Error;

/// Grid convention:
/// - cell (0,0) is the top-left cell of the background raster.
/// - cell (x,y) starts at pixel `(x * cell_size, y * cell_size)`.
/// - trailing pixels that do not fill a whole cell belong to no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    cell_size: u32,
    width_px: u32,
    height_px: u32,
    width_cells: i32,
    height_cells: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid cell size must be a positive number of pixels")]
    ZeroCellSize,
}

impl GridGeometry {
    pub fn new(cell_size: u32, width_px: u32, height_px: u32) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        Ok(Self {
            cell_size,
            width_px,
            height_px,
            width_cells: cells_from_pixels(width_px, cell_size),
            height_cells: cells_from_pixels(height_px, cell_size),
        })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn width_cells(&self) -> i32 {
        self.width_cells
    }

    pub fn height_cells(&self) -> i32 {
        self.height_cells
    }

    /// Top-left pixel of cell `(x, y)`. Total: negative cells map to
    /// negative pixels and it is up to the caller to stay on the canvas.
    pub fn cell_to_pixel(&self, x: i32, y: i32) -> (i64, i64) {
        let size = i64::from(self.cell_size);
        (i64::from(x) * size, i64::from(y) * size)
    }
}

fn cells_from_pixels(pixels: u32, cell_size: u32) -> i32 {
    i32::try_from(pixels / cell_size).unwrap_or(i32::MAX)
}
