//! End-to-end fire behavior tests against the public API
//!
//! Validates the synchronous-update discipline (fire moves at most one cell
//! per tick), the terrain-driven spread rules, and the full
//! ignite/step/statistics/reset lifecycle the web and rendering layers
//! build on.

use fire_ca_core::{
    BurnState, CellularAutomaton, ConditionsUpdate, SimulationRegistry, TerrainKind, TerrainTile,
};

fn uniform_tiles(size: usize, kind: TerrainKind) -> Vec<Vec<TerrainTile>> {
    vec![vec![TerrainTile::new(kind); size]; size]
}

/// Tiles with per-cell moisture forced to zero so fuel dryness never
/// limits spread.
fn dry_tiles(size: usize, kind: TerrainKind) -> Vec<Vec<TerrainTile>> {
    let mut tiles = uniform_tiles(size, kind);
    for row in &mut tiles {
        for tile in row {
            tile.moisture = Some(0.0);
        }
    }
    tiles
}

fn ambient_still_air() -> ConditionsUpdate {
    ConditionsUpdate {
        temperature: Some(25.0),
        humidity: Some(50.0),
        wind_speed: Some(0.0),
        rain_probability: Some(0.0),
        ..ConditionsUpdate::default()
    }
}

#[test]
fn test_grass_ignition_scenario() {
    let mut sim =
        CellularAutomaton::with_seed(10, &uniform_tiles(10, TerrainKind::Grass), 11).unwrap();
    sim.update_conditions(&ambient_still_air());

    assert!(sim.ignite(5, 5, 1.0));
    let cell = sim.grid().get(5, 5).unwrap();
    assert_eq!(cell.burn_state(), BurnState::Burning);
    assert_eq!(cell.burn_intensity(), 1.0);
}

#[test]
fn test_damp_grass_resists_weak_ignition() {
    let mut sim =
        CellularAutomaton::with_seed(10, &uniform_tiles(10, TerrainKind::Grass), 11).unwrap();
    sim.update_conditions(&ambient_still_air());

    // Default grass moisture 0.5 * ignition threshold 0.2 = 0.1 resistance,
    // so an intensity of 0.05 is rejected outright.
    assert!(!sim.ignite(5, 5, 0.05));
    assert_eq!(sim.grid().get(5, 5).unwrap().burn_state(), BurnState::Unburned);
}

#[test]
fn test_water_grid_is_inert() {
    let mut sim =
        CellularAutomaton::with_seed(5, &uniform_tiles(5, TerrainKind::Water), 23).unwrap();

    for row in 0..5 {
        for col in 0..5 {
            assert!(!sim.ignite(row, col, 1.0), "water ignited at ({row}, {col})");
        }
    }

    for _ in 0..20 {
        let summary = sim.step();
        assert_eq!(summary.statistics.burning, 0);
        assert_eq!(summary.statistics.unburned, 25);
    }
}

#[test]
fn test_fuel_is_monotonic_while_burning() {
    let mut sim =
        CellularAutomaton::with_seed(9, &uniform_tiles(9, TerrainKind::Forest), 31).unwrap();
    sim.ignite(4, 4, 1.0);

    for _ in 0..12 {
        let before: Vec<f32> = sim.grid().cells().map(|(_, _, c)| c.fuel_load()).collect();
        let burning_before: Vec<bool> = sim
            .grid()
            .cells()
            .map(|(_, _, c)| c.burn_state() == BurnState::Burning)
            .collect();

        sim.step();

        for (idx, (_, _, cell)) in sim.grid().cells().enumerate() {
            if burning_before[idx] {
                assert!(
                    cell.fuel_load() <= before[idx],
                    "fuel increased on a burning cell (index {idx})"
                );
            }
        }
    }
}

#[test]
fn test_fire_spreads_at_most_one_cell_per_tick() {
    let mut sim =
        CellularAutomaton::with_seed(15, &dry_tiles(15, TerrainKind::Grass), 47).unwrap();
    sim.ignite(7, 7, 1.0);

    // After k ticks nothing beyond Chebyshev distance k from the origin may
    // have left the Unburned state.
    for tick in 1..=6 {
        sim.step();
        for (row, col, cell) in sim.grid().cells() {
            let distance = (row as i32 - 7).abs().max((col as i32 - 7).abs());
            if distance > tick {
                assert_eq!(
                    cell.burn_state(),
                    BurnState::Unburned,
                    "tick {tick}: ({row}, {col}) burned beyond the one-cell-per-tick front"
                );
            }
        }
    }
}

#[test]
fn test_water_column_blocks_spread() {
    let mut tiles = dry_tiles(9, TerrainKind::Grass);
    for row in &mut tiles {
        row[4] = TerrainTile::new(TerrainKind::Water);
    }
    let mut sim = CellularAutomaton::with_seed(9, &tiles, 3).unwrap();

    sim.ignite(4, 1, 1.0);
    sim.run(30);

    for (row, col, cell) in sim.grid().cells() {
        if col >= 4 {
            assert_eq!(
                cell.burn_state(),
                BurnState::Unburned,
                "fire crossed the river at ({row}, {col})"
            );
        }
    }
    // The west bank burned through
    assert!(sim.statistics().burned > 0);
}

#[test]
fn test_state_counts_are_conserved_every_tick() {
    let mut sim =
        CellularAutomaton::with_seed(12, &dry_tiles(12, TerrainKind::Shrub), 59).unwrap();
    sim.ignite(6, 6, 1.0);

    for _ in 0..25 {
        let summary = sim.step();
        let stats = summary.statistics;
        assert_eq!(stats.unburned + stats.burning + stats.burned, 144);
    }
}

#[test]
fn test_statistics_are_idempotent() {
    let mut sim =
        CellularAutomaton::with_seed(8, &uniform_tiles(8, TerrainKind::Grass), 67).unwrap();
    sim.ignite(3, 3, 1.0);
    sim.step();

    let first = sim.statistics();
    let second = sim.statistics();
    assert_eq!(first, second);
}

#[test]
fn test_full_lifecycle_burns_out_and_resets() {
    let mut sim = CellularAutomaton::with_seed(10, &dry_tiles(10, TerrainKind::Grass), 71).unwrap();
    sim.update_conditions(&ambient_still_air());
    sim.ignite(5, 5, 1.0);

    let summaries = sim.run(100);
    assert!(!sim.is_active());
    assert!(!summaries.is_empty());

    let stats = sim.statistics();
    assert_eq!(stats.burning, 0);
    assert!(stats.burned > 0);
    assert!(stats.mean_fuel < 1.0);

    sim.reset();
    let stats = sim.statistics();
    assert_eq!(stats.unburned, 100);
    assert_eq!(stats.burned, 0);
    assert_eq!(sim.tick_count(), 0);
    assert_eq!(sim.flammable_cell_count(), 100);
}

#[test]
fn test_saturating_rain_and_humidity_stop_spread() {
    let mut sim = CellularAutomaton::with_seed(7, &dry_tiles(7, TerrainKind::Grass), 83).unwrap();
    sim.update_conditions(&ConditionsUpdate {
        humidity: Some(150.0),
        rain_probability: Some(1.0),
        ..ConditionsUpdate::default()
    });

    sim.ignite(3, 3, 1.0);
    let summary = sim.step();

    // The weather composite multiplies to zero, so the fire cannot spread
    // no matter how dry the fuel is.
    assert_eq!(summary.newly_ignited, 0);
    assert_eq!(sim.statistics().burning, 1);
}

#[test]
fn test_registry_drives_independent_simulations() {
    let mut registry = SimulationRegistry::new();

    let first = registry.create(
        CellularAutomaton::with_seed(6, &dry_tiles(6, TerrainKind::Grass), 1).unwrap(),
    );
    let second = registry.create(
        CellularAutomaton::with_seed(6, &uniform_tiles(6, TerrainKind::Water), 2).unwrap(),
    );

    registry.get_mut(&first).unwrap().ignite(3, 3, 1.0);
    registry.get_mut(&first).unwrap().step();
    registry.get_mut(&second).unwrap().step();

    assert!(registry.get(&first).unwrap().statistics().burning > 0);
    assert_eq!(registry.get(&second).unwrap().statistics().burning, 0);

    assert!(registry.remove(&first).is_some());
    assert_eq!(registry.len(), 1);
    assert!(registry.get(&first).is_none());
}

#[test]
fn test_snapshot_matches_statistics() {
    let mut sim =
        CellularAutomaton::with_seed(8, &dry_tiles(8, TerrainKind::Grass), 97).unwrap();
    sim.ignite(4, 4, 1.0);
    sim.run(3);

    let snapshot = sim.snapshot();
    let stats = sim.statistics();

    let burning = snapshot
        .cells
        .iter()
        .filter(|c| c.burn_state == BurnState::Burning)
        .count();
    let burned = snapshot
        .cells
        .iter()
        .filter(|c| c.burn_state == BurnState::Burned)
        .count();
    assert_eq!(burning, stats.burning);
    assert_eq!(burned, stats.burned);
    assert_eq!(snapshot.cells.len(), stats.total_cells);
    assert_eq!(snapshot.tick, sim.tick_count());
}
