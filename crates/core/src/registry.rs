//! Registry of active simulations
//!
//! Web or CLI layers juggling several concurrent runs hold one
//! [`SimulationRegistry`] and pass it into their handlers explicitly; there
//! is no process-wide singleton. The registry owns its engines outright and
//! exposes a create/get/delete lifecycle keyed by opaque generated ids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::engine::CellularAutomaton;

/// Opaque handle for one registered simulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(String);

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl SimulationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Owned collection of live simulations, keyed by generated id.
#[derive(Debug)]
pub struct SimulationRegistry {
    simulations: FxHashMap<SimulationId, CellularAutomaton>,
    rng: StdRng,
}

impl SimulationRegistry {
    /// Empty registry with an OS-seeded id generator.
    pub fn new() -> Self {
        SimulationRegistry {
            simulations: FxHashMap::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Register a simulation; returns its new id.
    pub fn create(&mut self, simulation: CellularAutomaton) -> SimulationId {
        let id = SimulationId(format!("{:032x}", self.rng.random::<u128>()));
        info!("registered simulation {id}");
        self.simulations.insert(id.clone(), simulation);
        id
    }

    /// Look up a simulation for reading.
    pub fn get(&self, id: &SimulationId) -> Option<&CellularAutomaton> {
        self.simulations.get(id)
    }

    /// Look up a simulation for ticking or mutation.
    pub fn get_mut(&mut self, id: &SimulationId) -> Option<&mut CellularAutomaton> {
        self.simulations.get_mut(id)
    }

    /// Remove a simulation, returning it if it existed.
    pub fn remove(&mut self, id: &SimulationId) -> Option<CellularAutomaton> {
        let removed = self.simulations.remove(id);
        if removed.is_some() {
            info!("removed simulation {id}");
        }
        removed
    }

    /// Ids of every registered simulation, in no particular order.
    pub fn ids(&self) -> Vec<SimulationId> {
        self.simulations.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }
}

impl Default for SimulationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
