//! Terrain classification and fire-behavior parameter tables
//!
//! Each grid cell carries a [`TerrainKind`] assigned at initialization. All
//! fire-relevant physical parameters live in an immutable [`FireBehavior`]
//! bundle keyed by kind, so cells never duplicate lookup data and parameter
//! tables can be unit-tested in isolation.

use serde::{Deserialize, Serialize};

/// Land-cover category produced by the upstream terrain classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Forest,
    Grass,
    Shrub,
    Agriculture,
    Urban,
    Water,
    BareGround,
    Beach,
    Desert,
}

/// Immutable fire-behavior parameters for one terrain kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireBehavior {
    /// Ticks a cell burns before forced burnout
    pub max_burn_duration: u32,
    /// Baseline neighbor-spread probability (0-1)
    pub spread_probability: f32,
    /// Fuel consumed per tick at full intensity (fraction of load)
    pub fuel_consumption_rate: f32,
    /// Heat output scale while burning
    pub heat_generation: f32,
    /// Moisture driven off per tick at full intensity
    pub moisture_loss_rate: f32,
    /// Scales moisture into an ignition-resistance term
    pub ignition_threshold: f32,
    /// Water and beach never ignite regardless of other inputs
    pub is_flammable: bool,
}

const FOREST: FireBehavior = FireBehavior {
    max_burn_duration: 8,
    spread_probability: 0.8,
    fuel_consumption_rate: 0.12,
    heat_generation: 0.9,
    moisture_loss_rate: 0.15,
    ignition_threshold: 0.3,
    is_flammable: true,
};

const GRASS: FireBehavior = FireBehavior {
    max_burn_duration: 3,
    spread_probability: 0.95,
    fuel_consumption_rate: 0.25,
    heat_generation: 0.7,
    moisture_loss_rate: 0.3,
    ignition_threshold: 0.2,
    is_flammable: true,
};

const SHRUB: FireBehavior = FireBehavior {
    max_burn_duration: 5,
    spread_probability: 0.75,
    fuel_consumption_rate: 0.18,
    heat_generation: 0.8,
    moisture_loss_rate: 0.2,
    ignition_threshold: 0.25,
    is_flammable: true,
};

const AGRICULTURE: FireBehavior = FireBehavior {
    max_burn_duration: 4,
    spread_probability: 0.6,
    fuel_consumption_rate: 0.2,
    heat_generation: 0.6,
    moisture_loss_rate: 0.25,
    ignition_threshold: 0.3,
    is_flammable: true,
};

const URBAN: FireBehavior = FireBehavior {
    max_burn_duration: 12,
    spread_probability: 0.1,
    fuel_consumption_rate: 0.05,
    heat_generation: 0.3,
    moisture_loss_rate: 0.1,
    ignition_threshold: 0.6,
    is_flammable: true,
};

const WATER: FireBehavior = FireBehavior {
    max_burn_duration: 0,
    spread_probability: 0.0,
    fuel_consumption_rate: 0.0,
    heat_generation: 0.0,
    moisture_loss_rate: 0.0,
    ignition_threshold: 1.0,
    is_flammable: false,
};

const BARE_GROUND: FireBehavior = FireBehavior {
    max_burn_duration: 1,
    spread_probability: 0.1,
    fuel_consumption_rate: 0.8,
    heat_generation: 0.2,
    moisture_loss_rate: 0.4,
    ignition_threshold: 0.5,
    is_flammable: true,
};

const BEACH: FireBehavior = FireBehavior {
    max_burn_duration: 0,
    spread_probability: 0.0,
    fuel_consumption_rate: 0.0,
    heat_generation: 0.0,
    moisture_loss_rate: 0.0,
    ignition_threshold: 1.0,
    is_flammable: false,
};

const DESERT: FireBehavior = FireBehavior {
    max_burn_duration: 2,
    spread_probability: 0.2,
    fuel_consumption_rate: 0.6,
    heat_generation: 0.3,
    moisture_loss_rate: 0.6,
    ignition_threshold: 0.4,
    is_flammable: true,
};

impl TerrainKind {
    /// All kinds, in classifier output order.
    pub const ALL: [TerrainKind; 9] = [
        TerrainKind::Forest,
        TerrainKind::Grass,
        TerrainKind::Shrub,
        TerrainKind::Agriculture,
        TerrainKind::Urban,
        TerrainKind::Water,
        TerrainKind::BareGround,
        TerrainKind::Beach,
        TerrainKind::Desert,
    ];

    /// Fire-behavior parameter bundle for this kind.
    pub fn behavior(self) -> &'static FireBehavior {
        match self {
            TerrainKind::Forest => &FOREST,
            TerrainKind::Grass => &GRASS,
            TerrainKind::Shrub => &SHRUB,
            TerrainKind::Agriculture => &AGRICULTURE,
            TerrainKind::Urban => &URBAN,
            TerrainKind::Water => &WATER,
            TerrainKind::BareGround => &BARE_GROUND,
            TerrainKind::Beach => &BEACH,
            TerrainKind::Desert => &DESERT,
        }
    }

    /// Default moisture content seeded at initialization and reset (0-1).
    pub fn default_moisture(self) -> f32 {
        match self {
            TerrainKind::Water => 1.0,
            TerrainKind::Forest | TerrainKind::Shrub => 0.6,
            TerrainKind::Agriculture | TerrainKind::Grass => 0.5,
            TerrainKind::Urban
            | TerrainKind::BareGround
            | TerrainKind::Beach
            | TerrainKind::Desert => 0.2,
        }
    }

    /// Parse a classifier label, case-insensitively.
    ///
    /// Unrecognized labels fall back to `Grass`, matching the upstream
    /// classifier's behavior for unknown land-cover codes.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "forest" => TerrainKind::Forest,
            "shrub" => TerrainKind::Shrub,
            "agriculture" => TerrainKind::Agriculture,
            "urban" => TerrainKind::Urban,
            "water" => TerrainKind::Water,
            "bare_ground" => TerrainKind::BareGround,
            "beach" => TerrainKind::Beach,
            "desert" => TerrainKind::Desert,
            _ => TerrainKind::Grass,
        }
    }

    /// Snake-case label used in serialized snapshots.
    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Forest => "forest",
            TerrainKind::Grass => "grass",
            TerrainKind::Shrub => "shrub",
            TerrainKind::Agriculture => "agriculture",
            TerrainKind::Urban => "urban",
            TerrainKind::Water => "water",
            TerrainKind::BareGround => "bare_ground",
            TerrainKind::Beach => "beach",
            TerrainKind::Desert => "desert",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_and_beach_are_non_flammable() {
        assert!(!TerrainKind::Water.behavior().is_flammable);
        assert!(!TerrainKind::Beach.behavior().is_flammable);
        assert_eq!(TerrainKind::Water.behavior().spread_probability, 0.0);
    }

    #[test]
    fn test_flammable_kinds_can_sustain_fire() {
        for kind in TerrainKind::ALL {
            let behavior = kind.behavior();
            if behavior.is_flammable {
                assert!(
                    behavior.max_burn_duration > 0,
                    "{:?} is flammable but can never burn a full tick",
                    kind
                );
                assert!(behavior.spread_probability > 0.0);
                assert!(behavior.fuel_consumption_rate > 0.0);
            }
        }
    }

    #[test]
    fn test_spread_probabilities_are_unit_interval() {
        for kind in TerrainKind::ALL {
            let p = kind.behavior().spread_probability;
            assert!((0.0..=1.0).contains(&p), "{:?}: {}", kind, p);
        }
    }

    #[test]
    fn test_default_moisture_table() {
        assert_eq!(TerrainKind::Water.default_moisture(), 1.0);
        assert_eq!(TerrainKind::Forest.default_moisture(), 0.6);
        assert_eq!(TerrainKind::Shrub.default_moisture(), 0.6);
        assert_eq!(TerrainKind::Grass.default_moisture(), 0.5);
        assert_eq!(TerrainKind::Agriculture.default_moisture(), 0.5);
        assert_eq!(TerrainKind::Urban.default_moisture(), 0.2);
        assert_eq!(TerrainKind::Desert.default_moisture(), 0.2);
    }

    #[test]
    fn test_from_name_round_trip() {
        for kind in TerrainKind::ALL {
            assert_eq!(TerrainKind::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(TerrainKind::from_name("FOREST"), TerrainKind::Forest);
        assert_eq!(TerrainKind::from_name("Bare_Ground"), TerrainKind::BareGround);
    }

    #[test]
    fn test_from_name_falls_back_to_grass() {
        assert_eq!(TerrainKind::from_name("lava"), TerrainKind::Grass);
        assert_eq!(TerrainKind::from_name(""), TerrainKind::Grass);
    }
}
