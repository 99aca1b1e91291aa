use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feedback gains
// ---------------------------------------------------------------------------

/// PID law coefficients plus the plant gain applied to the summed terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
    pub plant: f64,
}

impl Gains {
    /// Heading loop: error in rad, output in rad/s^2.
    pub const TURN: Gains = Gains::new(2.0, 0.1, 5.0, 1.0);
    /// Range loop: error in m, output in m/s^2.
    pub const THRUST: Gains = Gains::new(0.5, 0.05, 5.0, 1.0);

    pub const fn new(proportional: f64, integral: f64, derivative: f64, plant: f64) -> Self {
        Self { proportional, integral, derivative, plant }
    }
}

// ---------------------------------------------------------------------------
// Guidance limits
// ---------------------------------------------------------------------------

/// Actuation limits, arrival radius and loop gains for one missile.
///
/// Values are trusted: nothing here is validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub max_linear_acceleration: f64,  // m/s^2
    pub max_angular_acceleration: f64, // rad/s^2
    pub min_seek_distance: f64,        // m
    pub turn_gains: Gains,
    pub thrust_gains: Gains,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            max_linear_acceleration: 100.0,
            max_angular_acceleration: 8.0 * PI,
            min_seek_distance: 8.0,
            turn_gains: Gains::TURN,
            thrust_gains: Gains::THRUST,
        }
    }
}

impl GuidanceConfig {
    pub fn max_linear_acceleration(mut self, v: f64) -> Self {
        self.max_linear_acceleration = v;
        self
    }

    pub fn max_angular_acceleration(mut self, v: f64) -> Self {
        self.max_angular_acceleration = v;
        self
    }

    pub fn min_seek_distance(mut self, v: f64) -> Self {
        self.min_seek_distance = v;
        self
    }

    pub fn turn_gains(mut self, g: Gains) -> Self {
        self.turn_gains = g;
        self
    }

    pub fn thrust_gains(mut self, g: Gains) -> Self {
        self.thrust_gains = g;
        self
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Fixed-step settings. The loop gains are tuned for `dt`; changing the tick
/// rate changes closed-loop behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0, // 60 Hz physics step
            max_time: 120.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: GuidanceConfig = serde_json::from_str(r#"{ "min_seek_distance": 2.5 }"#).unwrap();
        assert_eq!(cfg.min_seek_distance, 2.5);
        assert_eq!(cfg.max_linear_acceleration, 100.0);
        assert_eq!(cfg.turn_gains, Gains::TURN);
    }

    #[test]
    fn builder_overrides_single_fields() {
        let cfg = GuidanceConfig::default()
            .max_linear_acceleration(40.0)
            .thrust_gains(Gains::new(1.0, 0.0, 0.0, 2.0));
        assert_eq!(cfg.max_linear_acceleration, 40.0);
        assert_eq!(cfg.thrust_gains.plant, 2.0);
        assert_eq!(cfg.max_angular_acceleration, 8.0 * PI);
    }
}
