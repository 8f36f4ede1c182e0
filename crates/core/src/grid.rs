//! Grid state store: the 2D cell array behind the cellular automaton
//!
//! Owns per-cell burn state and the bounds-checked accessors the fire-spread
//! engine operates through. Cells are stored row-major in a flat `Vec`,
//! indexed as `row * size + col`.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::terrain::TerrainKind;

/// Fire lifecycle of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnState {
    Unburned,
    Burning,
    Burned,
}

/// One grid position's terrain class and continuous physical state.
///
/// Invariants maintained by the engine: `burn_intensity` is zero unless
/// `burn_state == Burning`; non-flammable terrain never leaves `Unburned`;
/// `fuel_load` never increases while a cell burns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Terrain class, fixed at initialization
    pub(crate) terrain: TerrainKind,
    pub(crate) burn_state: BurnState,
    /// Fire strength while burning (0-1)
    pub(crate) burn_intensity: f32,
    /// Ticks spent in the `Burning` state
    pub(crate) burn_duration: u32,
    /// Water content (0-1); suppresses ignition, evaporates while burning
    pub(crate) moisture: f32,
    /// Remaining combustible material (0-1); zero for non-flammable terrain
    pub(crate) fuel_load: f32,
    /// Cell temperature (°C); rises while burning, ambient otherwise
    pub(crate) temperature: f32,
}

impl Cell {
    /// Create a fresh unburned cell for the given terrain.
    pub(crate) fn new(terrain: TerrainKind, moisture_override: Option<f32>, ambient: f32) -> Self {
        let flammable = terrain.behavior().is_flammable;
        Cell {
            terrain,
            burn_state: BurnState::Unburned,
            burn_intensity: 0.0,
            burn_duration: 0,
            moisture: moisture_override.unwrap_or_else(|| terrain.default_moisture()),
            fuel_load: if flammable { 1.0 } else { 0.0 },
            temperature: ambient,
        }
    }

    /// Restore initialization state, keeping the terrain class. Moisture
    /// returns to the terrain-keyed default; per-cell overrides do not
    /// survive a reset.
    pub(crate) fn reset(&mut self, ambient: f32) {
        *self = Cell::new(self.terrain, None, ambient);
    }

    /// Enter the `Burning` state at the given intensity.
    pub(crate) fn set_burning(&mut self, intensity: f32) {
        self.burn_state = BurnState::Burning;
        self.burn_intensity = intensity;
        self.burn_duration = 1;
    }

    /// Leave the `Burning` state: zero intensity, cool to ambient.
    pub(crate) fn burn_out(&mut self, ambient: f32) {
        self.burn_state = BurnState::Burned;
        self.burn_intensity = 0.0;
        self.temperature = ambient;
    }

    pub fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    pub fn burn_state(&self) -> BurnState {
        self.burn_state
    }

    /// Fire strength (0-1); zero unless the cell is burning.
    pub fn burn_intensity(&self) -> f32 {
        self.burn_intensity
    }

    /// Ticks spent burning.
    pub fn burn_duration(&self) -> u32 {
        self.burn_duration
    }

    /// Water content (0-1).
    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    /// Remaining combustible material (0-1).
    pub fn fuel_load(&self) -> f32 {
        self.fuel_load
    }

    /// Cell temperature (°C).
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Per-cell input from the upstream terrain classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainTile {
    pub kind: TerrainKind,
    /// Optional per-cell moisture override (0-1); defaults come from the
    /// terrain-keyed table
    #[serde(default)]
    pub moisture: Option<f32>,
}

impl TerrainTile {
    pub fn new(kind: TerrainKind) -> Self {
        TerrainTile {
            kind,
            moisture: None,
        }
    }
}

/// Neighbor connectivity pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Neighborhood {
    /// 8-connected (includes diagonals)
    #[default]
    Moore,
    /// 4-connected (orthogonal only)
    VonNeumann,
}

const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

impl Neighborhood {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Neighborhood::Moore => &MOORE_OFFSETS,
            Neighborhood::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }
}

/// Square grid of cells, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Build an N×N grid from a terrain classification.
    ///
    /// Every tile seeds an unburned cell: full fuel when flammable, moisture
    /// from the terrain default table unless the tile overrides it,
    /// temperature at `ambient`.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidDimension` when the classification is not
    /// `size`×`size`.
    pub fn from_terrain(
        size: usize,
        tiles: &[Vec<TerrainTile>],
        ambient: f32,
    ) -> Result<Self, GridError> {
        if tiles.len() != size {
            return Err(GridError::InvalidDimension {
                expected: size,
                rows: tiles.len(),
                cols: tiles.first().map_or(0, Vec::len),
            });
        }
        for row in tiles {
            if row.len() != size {
                return Err(GridError::InvalidDimension {
                    expected: size,
                    rows: tiles.len(),
                    cols: row.len(),
                });
            }
        }

        let mut cells = Vec::with_capacity(size * size);
        for row in tiles {
            for tile in row {
                cells.push(Cell::new(tile.kind, tile.moisture, ambient));
            }
        }

        Ok(CellGrid { size, cells })
    }

    /// Grid side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether (row, col) lies inside the grid.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Read a cell.
    ///
    /// # Errors
    ///
    /// `GridError::OutOfBounds` outside `[0, size)`.
    pub fn get(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        if self.in_bounds(row, col) {
            Ok(&self.cells[self.index(row, col)])
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    /// Mutable access to a cell.
    ///
    /// # Errors
    ///
    /// `GridError::OutOfBounds` outside `[0, size)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        if self.in_bounds(row, col) {
            let idx = self.index(row, col);
            Ok(&mut self.cells[idx])
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    /// Overwrite a cell wholesale.
    ///
    /// # Errors
    ///
    /// `GridError::OutOfBounds` outside `[0, size)`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        *self.get_mut(row, col)? = cell;
        Ok(())
    }

    /// In-bounds neighbor coordinates of (row, col) under the given
    /// connectivity pattern. Offsets falling off the grid are silently
    /// excluded; there is no wraparound.
    pub fn neighbors(
        &self,
        row: usize,
        col: usize,
        pattern: Neighborhood,
    ) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);
        for &(dr, dc) in pattern.offsets() {
            let nr = row as i32 + dr;
            let nc = col as i32 + dc;
            if nr >= 0 && nc >= 0 && self.in_bounds(nr as usize, nc as usize) {
                result.push((nr as usize, nc as usize));
            }
        }
        result
    }

    /// Mutable iteration for whole-grid operations (reset).
    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Iterate cells with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx / self.size, idx % self.size, cell))
    }
}
