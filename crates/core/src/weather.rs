//! Environmental conditions and wind geometry
//!
//! One [`EnvironmentalConditions`] value is shared by every spread-probability
//! computation during a tick. Wind is an 8-point compass direction; its effect
//! on spread is the cosine alignment between the wind vector and the
//! source-to-target direction on the (row, col) grid.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D vector on the (row, col) grid plane.
pub type Vec2 = Vector2<f32>;

/// Compass wind direction, mapped to grid offsets where north is -row
/// and east is +col.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl WindDirection {
    /// Grid offset (d_row, d_col) the wind blows toward.
    pub fn grid_offset(self) -> (i32, i32) {
        match self {
            WindDirection::North => (-1, 0),
            WindDirection::NorthEast => (-1, 1),
            WindDirection::East => (0, 1),
            WindDirection::SouthEast => (1, 1),
            WindDirection::South => (1, 0),
            WindDirection::SouthWest => (1, -1),
            WindDirection::West => (0, -1),
            WindDirection::NorthWest => (-1, -1),
        }
    }

    /// Unit vector of the wind direction on the (row, col) plane.
    pub fn unit_vector(self) -> Vec2 {
        let (dr, dc) = self.grid_offset();
        Vec2::new(dr as f32, dc as f32).normalize()
    }

    /// Parse a compass name, case-insensitively.
    ///
    /// Unrecognized names fall back to `North`, matching the original
    /// weather-update contract.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "northeast" => WindDirection::NorthEast,
            "east" => WindDirection::East,
            "southeast" => WindDirection::SouthEast,
            "south" => WindDirection::South,
            "southwest" => WindDirection::SouthWest,
            "west" => WindDirection::West,
            "northwest" => WindDirection::NorthWest,
            _ => WindDirection::North,
        }
    }
}

/// Run-scoped weather parameters affecting all spread calculations uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    /// Air temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Wind speed (km/h)
    pub wind_speed: f32,
    /// Compass direction the wind blows toward
    pub wind_direction: WindDirection,
    /// Probability of rain (0-1)
    pub rain_probability: f32,
    /// Hour of day (0-23), advisory only; unused in spread math
    pub time_of_day: u8,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        EnvironmentalConditions {
            temperature: 25.0,
            humidity: 50.0,
            wind_speed: 5.0,
            wind_direction: WindDirection::North,
            rain_probability: 0.0,
            time_of_day: 12,
        }
    }
}

impl EnvironmentalConditions {
    /// Combined temperature, humidity and rain multiplier for spread
    /// probability. Each factor is floored at zero so extreme weather can
    /// suppress spread entirely but never invert it.
    ///
    /// - +2% per °C above 20
    /// - -1% per % humidity above 50
    /// - rain removes up to 80% of spread at certainty
    pub fn spread_modifier(&self) -> f32 {
        let temp_factor = (1.0 + (self.temperature - 20.0) * 0.02).max(0.0);
        let humidity_factor = (1.0 - (self.humidity - 50.0) * 0.01).max(0.0);
        let rain_factor = (1.0 - self.rain_probability * 0.8).max(0.0);
        temp_factor * humidity_factor * rain_factor
    }

    /// Wind multiplier for spread from a source cell toward a neighbor at
    /// offset (d_row, d_col).
    ///
    /// Alignment is the cosine similarity between the source-to-target
    /// direction and the wind vector; spread with the wind gains up to +50%
    /// at 50 km/h and above, spread against it is floored at 0.1 so fire is
    /// never fully wind-blocked.
    pub fn wind_effect(&self, d_row: i32, d_col: i32) -> f32 {
        let toward = Vec2::new(d_row as f32, d_col as f32);
        let norm = toward.norm();
        let alignment = if norm > 0.0 {
            toward.dot(&self.wind_direction.unit_vector()) / norm
        } else {
            0.0
        };
        let speed_factor = (self.wind_speed / 50.0).min(1.0);
        (1.0 + alignment * speed_factor * 0.5).max(0.1)
    }

    /// Apply a partial update; fields absent from `update` keep their value.
    pub fn apply(&mut self, update: &ConditionsUpdate) {
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(humidity) = update.humidity {
            self.humidity = humidity;
        }
        if let Some(wind_speed) = update.wind_speed {
            self.wind_speed = wind_speed;
        }
        if let Some(name) = &update.wind_direction {
            self.wind_direction = WindDirection::from_name(name);
        }
        if let Some(rain_probability) = update.rain_probability {
            self.rain_probability = rain_probability;
        }
        if let Some(time_of_day) = update.time_of_day {
            self.time_of_day = time_of_day;
        }
    }
}

/// Partial environmental update as received from callers; only present
/// fields are applied. Wind direction arrives as a compass-name string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsUpdate {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub wind_speed: Option<f32>,
    pub wind_direction: Option<String>,
    pub rain_probability: Option<f32>,
    pub time_of_day: Option<u8>,
}
