use crate::{Coords, GridInt};

/// Smallest board that still fits the starting snake with room to turn.
pub const MIN_CELLS_PER_SIDE: GridInt = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("board size and cell size must be positive (got {extent} and {cell_size})")]
    NotPositive { extent: GridInt, cell_size: GridInt },
    #[error("board size {extent} is not a multiple of cell size {cell_size}")]
    NotDivisible { extent: GridInt, cell_size: GridInt },
    #[error("board has {cells} cells per side, need at least {min}", min = MIN_CELLS_PER_SIDE)]
    TooSmall { cells: GridInt },
}

/// Square board of `extent` units split into cells of `cell_size` units.
///
/// Cells are addressed in board units and are always aligned to the cell
/// size, so `(100, 200)` on a 20-unit grid is column 5, row 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    extent: GridInt,
    cell_size: GridInt,
}

impl Geometry {
    pub fn new(extent: GridInt, cell_size: GridInt) -> Result<Self, GeometryError> {
        if extent <= 0 || cell_size <= 0 {
            return Err(GeometryError::NotPositive { extent, cell_size });
        }
        if extent % cell_size != 0 {
            return Err(GeometryError::NotDivisible { extent, cell_size });
        }

        let cells = extent / cell_size;
        if cells < MIN_CELLS_PER_SIDE {
            return Err(GeometryError::TooSmall { cells });
        }

        Ok(Geometry { extent, cell_size })
    }

    pub fn extent(&self) -> GridInt {
        self.extent
    }

    pub fn cell_size(&self) -> GridInt {
        self.cell_size
    }

    pub fn cells_per_side(&self) -> GridInt {
        self.extent / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        let n = self.cells_per_side() as usize;
        n * n
    }

    pub fn in_bounds(&self, cell: Coords) -> bool {
        (0..self.extent).contains(&cell.0) && (0..self.extent).contains(&cell.1)
    }

    pub fn cell_at(&self, col: GridInt, row: GridInt) -> Coords {
        (col * self.cell_size, row * self.cell_size)
    }

    /// Column and row of a cell, for drawing.
    pub fn to_grid(&self, cell: Coords) -> (GridInt, GridInt) {
        (cell.0.div_euclid(self.cell_size), cell.1.div_euclid(self.cell_size))
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coords> + '_ {
        let n = self.cells_per_side();
        (0..n).flat_map(move |row| (0..n).map(move |col| self.cell_at(col, row)))
    }

    /// Where the head of a fresh snake goes: a quarter of the way in,
    /// halfway down.
    pub fn spawn_head(&self) -> Coords {
        let n = self.cells_per_side();
        self.cell_at((n / 4).max(2), n / 2)
    }
}
