//! Probabilistic cellular-automaton wildfire simulation core
//!
//! Simulates fire spread over a square terrain grid. Each cell carries a
//! terrain classification and continuous physical state (fuel, moisture,
//! temperature, burn intensity); one run-scoped set of environmental
//! conditions (wind, humidity, temperature, rain) modulates how fire
//! propagates between neighbors on every tick.
//!
//! The engine is single-threaded and synchronous. Every tick snapshots the
//! burning-cell set before mutating anything, so fire advances at most one
//! cell per tick and results never depend on iteration order. Randomized
//! spread trials come from a caller-seedable RNG, making whole runs
//! reproducible.
//!
//! Terrain classification, rendering and request handling are external
//! collaborators: they feed [`TerrainTile`] grids in and read
//! [`GridSnapshot`]s and [`TickSummary`]s out.

pub mod engine;
pub mod error;
pub mod grid;
pub mod registry;
pub mod terrain;
pub mod weather;

pub use engine::{CellSnapshot, CellularAutomaton, FireStatistics, GridSnapshot, TickSummary};
pub use error::GridError;
pub use grid::{BurnState, Cell, CellGrid, Neighborhood, TerrainTile};
pub use registry::{SimulationId, SimulationRegistry};
pub use terrain::{FireBehavior, TerrainKind};
pub use weather::{ConditionsUpdate, EnvironmentalConditions, Vec2, WindDirection};
