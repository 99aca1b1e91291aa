use std::fs;
use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{GuidanceConfig, SimConfig};
use crate::dynamics::{Body, RigidBody};
use crate::error::Result;
use crate::gnc::{FeedbackController, GuidanceController};
use crate::physics::Hull;
use super::event::{default_detectors, ProximityDetector};
use super::runner::{simulate_with, FlightLog};

// ---------------------------------------------------------------------------
// Scenario: spawn pose, airframe, tuning and a single command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spawn {
    pub position: Vector2<f64>, // m
    pub angle: f64,             // rad
}

/// Command issued once at t = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Idle,
    TurnTowards { target: Vector2<f64> },
    Seek { target: Vector2<f64> },
    FollowPath { waypoints: Vec<Vector2<f64>> },
}

impl Command {
    pub fn issue<B, C>(&self, guidance: &mut GuidanceController<C>, body: &mut B)
    where
        B: RigidBody + ?Sized,
        C: FeedbackController,
    {
        match self {
            Command::Idle => guidance.idle(body),
            Command::TurnTowards { target } => guidance.turn_towards(body, *target),
            Command::Seek { target } => guidance.seek(body, *target),
            Command::FollowPath { waypoints } => {
                guidance.follow_path(body, waypoints.iter().copied())
            }
        }
    }
}

/// Reports the first time the body comes within `radius` of `point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub point: Vector2<f64>,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub spawn: Spawn,
    #[serde(default)]
    pub hull: Hull,
    #[serde(default)]
    pub guidance: GuidanceConfig,
    #[serde(default)]
    pub sim: SimConfig,
    pub command: Command,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn body(&self) -> Result<Body> {
        Body::from_hull(&self.hull, self.spawn.position, self.spawn.angle)
    }

    /// Build the body, issue the command and run to completion.
    pub fn run(&self) -> Result<(Body, FlightLog)> {
        let mut body = self.body()?;
        let mut guidance = GuidanceController::new(self.guidance);
        info!(scenario = %self.name, mass = body.mass(), inertia = body.inertia(), "starting run");

        let mut detectors = default_detectors();
        for m in &self.markers {
            detectors.push(Box::new(ProximityDetector::new(m.point, m.radius)));
        }

        self.command.issue(&mut guidance, &mut body);
        let log = simulate_with(&mut body, &mut guidance, &self.sim, &mut detectors);
        Ok((body, log))
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Fly straight down range to (100, 0) and hold.
    pub fn seek_downrange() -> Scenario {
        Scenario {
            name: "Seek downrange".into(),
            spawn: Spawn::default(),
            hull: Hull::missile(),
            guidance: GuidanceConfig::default(),
            sim: SimConfig { max_time: 60.0, ..SimConfig::default() },
            command: Command::Seek { target: Vector2::new(100.0, 0.0) },
            markers: vec![Marker { point: Vector2::new(50.0, 0.0), radius: 5.0 }],
        }
    }

    /// Square patrol that starts facing away from the first leg.
    pub fn patrol_square() -> Scenario {
        Scenario {
            name: "Patrol square".into(),
            spawn: Spawn { position: Vector2::zeros(), angle: std::f64::consts::PI },
            hull: Hull::missile(),
            guidance: GuidanceConfig::default(),
            sim: SimConfig { max_time: 240.0, ..SimConfig::default() },
            command: Command::FollowPath {
                waypoints: vec![
                    Vector2::new(60.0, 0.0),
                    Vector2::new(60.0, 60.0),
                    Vector2::new(0.0, 60.0),
                    Vector2::new(0.0, 0.0),
                ],
            },
            markers: Vec::new(),
        }
    }
}
