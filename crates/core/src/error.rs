//! Error taxonomy for grid access and initialization
//!
//! All errors are local and recoverable; a failed query or a rejected
//! classification never corrupts grid state. Ignition rejection is not an
//! error at all, it is the `false` branch of [`ignite`].
//!
//! [`ignite`]: crate::engine::CellularAutomaton::ignite

use thiserror::Error;

/// Failure modes of the grid state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Row or column outside `[0, size)`.
    #[error("position ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        size: usize,
    },

    /// Terrain classification does not form the configured square grid.
    #[error("terrain classification must be {expected}x{expected}, got {rows}x{cols}")]
    InvalidDimension {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}
