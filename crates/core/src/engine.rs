//! Probabilistic cellular-automaton fire-spread engine
//!
//! Owns the grid and all state-transition logic: ignition, the synchronous
//! per-tick update, spread-probability computation, statistics and reset.
//! One tick reads the complete pre-tick set of burning cells before mutating
//! anything, so fire advances at most one cell per tick regardless of the
//! order burning cells are visited in.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GridError;
use crate::grid::{BurnState, Cell, CellGrid, Neighborhood, TerrainTile};
use crate::terrain::TerrainKind;
use crate::weather::{ConditionsUpdate, EnvironmentalConditions};

/// Intensity handed to a neighbor ignited by spread, as a fraction of the
/// source intensity.
const SPREAD_ATTENUATION: f32 = 0.8;

/// Cells with this much fuel or less burn out.
const BURNOUT_FUEL: f32 = 0.1;

/// Temperature ceiling for burning cells (°C).
const MAX_CELL_TEMPERATURE: f32 = 1000.0;

/// Read-only aggregate over the whole grid. Recomputable at any time
/// without mutating state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireStatistics {
    pub unburned: usize,
    pub burning: usize,
    pub burned: usize,
    pub total_cells: usize,
    /// Mean intensity over burning cells; 0 when none burn
    pub mean_intensity: f32,
    /// Mean temperature over all cells (°C)
    pub mean_temperature: f32,
    /// Mean remaining fuel over all cells (0-1)
    pub mean_fuel: f32,
}

/// Result of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Tick number after this update
    pub tick: u64,
    /// Cells that were burning when the tick started
    pub burning_before: usize,
    /// Cells ignited by spread during this tick
    pub newly_ignited: usize,
    pub statistics: FireStatistics,
    /// True when the tick started with at least one burning cell
    pub is_active: bool,
}

/// One cell of a published grid snapshot, the contract consumed by
/// visualization and web layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub terrain_kind: TerrainKind,
    pub burn_state: BurnState,
    pub burn_intensity: f32,
    pub burn_duration: u32,
    pub moisture: f32,
    pub fuel_load: f32,
    pub temperature: f32,
    pub row: usize,
    pub col: usize,
}

/// Fully-settled post-tick view of the grid, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub tick: u64,
    pub cells: Vec<CellSnapshot>,
}

/// The fire-spread engine. Exclusively owns and mutates its grid; external
/// readers only see snapshots taken between ticks.
#[derive(Debug)]
pub struct CellularAutomaton {
    grid: CellGrid,
    conditions: EnvironmentalConditions,
    neighborhood: Neighborhood,
    tick_count: u64,
    rng: StdRng,
}

impl CellularAutomaton {
    /// Create an engine over a terrain classification, with an OS-seeded RNG.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidDimension` when the classification is not
    /// `size`×`size`.
    pub fn new(size: usize, tiles: &[Vec<TerrainTile>]) -> Result<Self, GridError> {
        Self::from_parts(size, tiles, StdRng::from_os_rng())
    }

    /// Create an engine with a deterministic RNG seed. The same seed over
    /// the same terrain and conditions yields an identical sequence of
    /// spread ignitions.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidDimension` when the classification is not
    /// `size`×`size`.
    pub fn with_seed(size: usize, tiles: &[Vec<TerrainTile>], seed: u64) -> Result<Self, GridError> {
        Self::from_parts(size, tiles, StdRng::seed_from_u64(seed))
    }

    fn from_parts(size: usize, tiles: &[Vec<TerrainTile>], rng: StdRng) -> Result<Self, GridError> {
        let conditions = EnvironmentalConditions::default();
        let grid = CellGrid::from_terrain(size, tiles, conditions.temperature)?;
        info!("initialized {size}x{size} fire simulation grid");
        Ok(CellularAutomaton {
            grid,
            conditions,
            neighborhood: Neighborhood::default(),
            tick_count: 0,
            rng,
        })
    }

    /// Grid side length in cells.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Ticks advanced since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Read-only view of the grid state store.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Current environmental conditions.
    pub fn conditions(&self) -> &EnvironmentalConditions {
        &self.conditions
    }

    /// Switch the spread connectivity pattern (Moore by default).
    pub fn set_neighborhood(&mut self, pattern: Neighborhood) {
        self.neighborhood = pattern;
    }

    /// True while at least one cell burns.
    pub fn is_active(&self) -> bool {
        self.grid
            .cells()
            .any(|(_, _, cell)| cell.burn_state() == BurnState::Burning)
    }

    /// Attempt to ignite a cell. Returns `false` without mutating anything
    /// when the position is out of bounds, the terrain is non-flammable, the
    /// cell is not `Unburned`, the fuel is exhausted, or the intensity fails
    /// to beat the cell's moisture resistance
    /// (`moisture * ignition_threshold`).
    pub fn ignite(&mut self, row: usize, col: usize, intensity: f32) -> bool {
        let Ok(cell) = self.grid.get_mut(row, col) else {
            return false;
        };
        let behavior = cell.terrain().behavior();
        if !behavior.is_flammable
            || cell.burn_state() != BurnState::Unburned
            || cell.fuel_load() <= 0.0
        {
            return false;
        }

        let moisture_resistance = cell.moisture() * behavior.ignition_threshold;
        if intensity <= moisture_resistance {
            return false;
        }

        cell.set_burning(intensity.min(1.0));
        debug!(
            "ignited ({row}, {col}): {} at intensity {:.2}",
            cell.terrain().name(),
            cell.burn_intensity()
        );
        true
    }

    /// Ignite flammable cells at random. With `count`, exactly that many
    /// candidates are sampled (capped at the candidate count); otherwise
    /// every candidate ignites independently with `probability`. Returns the
    /// number of cells actually ignited.
    pub fn ignite_random(&mut self, count: Option<usize>, probability: f32) -> usize {
        let candidates: Vec<(usize, usize)> = self
            .grid
            .cells()
            .filter(|(_, _, cell)| {
                cell.burn_state() == BurnState::Unburned
                    && cell.terrain().behavior().is_flammable
                    && cell.fuel_load() > 0.0
            })
            .map(|(row, col, _)| (row, col))
            .collect();
        if candidates.is_empty() {
            return 0;
        }

        let mut ignited = 0;
        match count {
            Some(n) => {
                let picks =
                    rand::seq::index::sample(&mut self.rng, candidates.len(), n.min(candidates.len()));
                for idx in picks {
                    let (row, col) = candidates[idx];
                    if self.ignite(row, col, 1.0) {
                        ignited += 1;
                    }
                }
            }
            None => {
                for &(row, col) in &candidates {
                    if self.rng.random::<f32>() < probability && self.ignite(row, col, 1.0) {
                        ignited += 1;
                    }
                }
            }
        }
        info!("random ignition started {ignited} fires");
        ignited
    }

    /// Unburned cells on flammable terrain with fuel remaining.
    pub fn flammable_cell_count(&self) -> usize {
        self.grid
            .cells()
            .filter(|(_, _, cell)| {
                cell.burn_state() == BurnState::Unburned
                    && cell.terrain().behavior().is_flammable
                    && cell.fuel_load() > 0.0
            })
            .count()
    }

    /// Probability that fire spreads from `source` to the neighboring
    /// `target` at offset (d_row, d_col): the product of the target
    /// terrain's baseline, the source intensity, target dryness and fuel,
    /// the weather composite and the wind alignment factor, clamped to
    /// [0, 1]. A zero terrain baseline (water) short-circuits the product.
    fn spread_probability(&self, source: &Cell, target: &Cell, d_row: i32, d_col: i32) -> f32 {
        if target.burn_state() != BurnState::Unburned || target.fuel_load() <= 0.0 {
            return 0.0;
        }
        let base = target.terrain().behavior().spread_probability;
        if base <= 0.0 {
            return 0.0;
        }

        let probability = base
            * source.burn_intensity()
            * (1.0 - target.moisture()).max(0.0)
            * target.fuel_load()
            * self.conditions.spread_modifier()
            * self.conditions.wind_effect(d_row, d_col);
        probability.clamp(0.0, 1.0)
    }

    /// Advance the simulation by one tick.
    ///
    /// The set of burning cells is snapshotted before any mutation; cells
    /// ignited during this tick join the automaton but do not burn, spread
    /// or age until the next tick.
    pub fn step(&mut self) -> TickSummary {
        self.tick_count += 1;

        let burning: Vec<(usize, usize)> = self
            .grid
            .cells()
            .filter(|(_, _, cell)| cell.burn_state() == BurnState::Burning)
            .map(|(row, col, _)| (row, col))
            .collect();

        let mut newly_ignited = 0;
        for &(row, col) in &burning {
            newly_ignited += self.update_burning_cell(row, col);
        }

        let statistics = self.statistics();
        let summary = TickSummary {
            tick: self.tick_count,
            burning_before: burning.len(),
            newly_ignited,
            statistics,
            is_active: !burning.is_empty(),
        };
        debug!(
            "tick {}: {} burning, {} newly ignited, {} burned",
            summary.tick, summary.burning_before, summary.newly_ignited, statistics.burned
        );
        summary
    }

    /// Advance until no cell burns or `max_steps` is exhausted, returning
    /// one summary per executed tick.
    pub fn run(&mut self, max_steps: usize) -> Vec<TickSummary> {
        let mut summaries = Vec::with_capacity(max_steps.min(64));
        for _ in 0..max_steps {
            if !self.is_active() {
                break;
            }
            summaries.push(self.step());
        }
        summaries
    }

    /// Burn one snapshotted cell for a tick and try to spread to its
    /// neighbors. Returns how many neighbors ignited.
    fn update_burning_cell(&mut self, row: usize, col: usize) -> usize {
        let Ok(source) = self.grid.get(row, col) else {
            return 0;
        };
        let terrain = source.terrain();
        let intensity = source.burn_intensity();
        let behavior = terrain.behavior();
        let ambient = self.conditions.temperature;

        if let Ok(cell) = self.grid.get_mut(row, col) {
            cell.fuel_load =
                (cell.fuel_load() - behavior.fuel_consumption_rate * intensity).max(0.0);
            cell.temperature = (cell.temperature()
                + behavior.heat_generation * intensity * 50.0)
                .min(MAX_CELL_TEMPERATURE);
            cell.moisture = (cell.moisture() - behavior.moisture_loss_rate * intensity).max(0.0);
            cell.burn_duration += 1;
        }

        // One Bernoulli draw per neighbor, whatever the probability, so a
        // fixed seed replays the same trial sequence.
        let mut ignited = 0;
        for (n_row, n_col) in self.grid.neighbors(row, col, self.neighborhood) {
            let d_row = n_row as i32 - row as i32;
            let d_col = n_col as i32 - col as i32;
            let probability = match (self.grid.get(row, col), self.grid.get(n_row, n_col)) {
                (Ok(source), Ok(target)) => self.spread_probability(source, target, d_row, d_col),
                _ => 0.0,
            };
            if self.rng.random::<f32>() < probability {
                if let Ok(target) = self.grid.get_mut(n_row, n_col) {
                    target.set_burning((intensity * SPREAD_ATTENUATION).min(1.0));
                    ignited += 1;
                }
            }
        }

        if let Ok(cell) = self.grid.get_mut(row, col) {
            if cell.burn_duration() >= behavior.max_burn_duration || cell.fuel_load() <= BURNOUT_FUEL
            {
                cell.burn_out(ambient);
            }
        }

        ignited
    }

    /// Aggregate statistics over the whole grid. Pure read; calling it twice
    /// without an intervening tick yields identical results.
    pub fn statistics(&self) -> FireStatistics {
        let mut unburned = 0;
        let mut burning = 0;
        let mut burned = 0;
        let mut intensity_sum = 0.0;
        let mut temperature_sum = 0.0;
        let mut fuel_sum = 0.0;

        for (_, _, cell) in self.grid.cells() {
            match cell.burn_state() {
                BurnState::Unburned => unburned += 1,
                BurnState::Burning => {
                    burning += 1;
                    intensity_sum += cell.burn_intensity();
                }
                BurnState::Burned => burned += 1,
            }
            temperature_sum += cell.temperature();
            fuel_sum += cell.fuel_load();
        }

        let total_cells = self.grid.size() * self.grid.size();
        let cell_count = total_cells.max(1) as f32;
        FireStatistics {
            unburned,
            burning,
            burned,
            total_cells,
            mean_intensity: if burning > 0 {
                intensity_sum / burning as f32
            } else {
                0.0
            },
            mean_temperature: temperature_sum / cell_count,
            mean_fuel: fuel_sum / cell_count,
        }
    }

    /// Publish a row-major snapshot of every cell for rendering and web
    /// layers. The engine never formats pixels or colors.
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = self
            .grid
            .cells()
            .map(|(row, col, cell)| CellSnapshot {
                terrain_kind: cell.terrain(),
                burn_state: cell.burn_state(),
                burn_intensity: cell.burn_intensity(),
                burn_duration: cell.burn_duration(),
                moisture: cell.moisture(),
                fuel_load: cell.fuel_load(),
                temperature: cell.temperature(),
                row,
                col,
            })
            .collect();
        GridSnapshot {
            size: self.grid.size(),
            tick: self.tick_count,
            cells,
        }
    }

    /// Return every cell to its initialization state and zero the tick
    /// counter. Terrain classes are untouched; moisture returns to the
    /// terrain-keyed defaults.
    pub fn reset(&mut self) {
        self.tick_count = 0;
        let ambient = self.conditions.temperature;
        for cell in self.grid.cells_mut() {
            cell.reset(ambient);
        }
        info!("simulation reset");
    }

    /// Apply a partial environmental update; unspecified fields keep their
    /// prior values.
    pub fn update_conditions(&mut self, update: &ConditionsUpdate) {
        self.conditions.apply(update);
        info!(
            "conditions updated: {:.1}°C, {:.0}% humidity, {:.0} km/h {:?}, rain {:.2}",
            self.conditions.temperature,
            self.conditions.humidity,
            self.conditions.wind_speed,
            self.conditions.wind_direction,
            self.conditions.rain_probability
        );
    }
}
