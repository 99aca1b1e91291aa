use serde::Serialize;

use crate::gnc::ModeKind;
use super::runner::Snapshot;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    ModeChange { from: ModeKind, to: ModeKind },
    WaypointReached { index: usize },
    Arrived,
    Custom { message: String },
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub time: f64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind>;
}

/// Reports every mode transition, including automatic ones.
pub struct ModeChangeDetector;

impl EventDetector for ModeChangeDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        (prev.mode != current.mode).then(|| EventKind::ModeChange {
            from: prev.mode,
            to: current.mode,
        })
    }
}

/// Counts waypoint advances: the target moves while the path is still being followed.
#[derive(Default)]
pub struct WaypointDetector {
    reached: usize,
}

impl EventDetector for WaypointDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        let advanced = prev.mode == ModeKind::FollowPath
            && current.mode == ModeKind::FollowPath
            && prev.target != current.target;
        if advanced {
            self.reached += 1;
            Some(EventKind::WaypointReached { index: self.reached - 1 })
        } else {
            None
        }
    }
}

/// Seek entered its hold radius.
pub struct ArrivalDetector;

impl EventDetector for ArrivalDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        (!prev.arrived && current.arrived).then_some(EventKind::Arrived)
    }
}

/// Fires once when the body first comes within `radius` of a fixed point.
pub struct ProximityDetector {
    pub point: nalgebra::Vector2<f64>,
    pub radius: f64,
    fired: bool,
}

impl ProximityDetector {
    pub fn new(point: nalgebra::Vector2<f64>, radius: f64) -> Self {
        Self { point, radius, fired: false }
    }
}

impl EventDetector for ProximityDetector {
    fn check(&mut self, _prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        if self.fired || (current.pos - self.point).norm() >= self.radius {
            return None;
        }
        self.fired = true;
        Some(EventKind::Custom {
            message: format!(
                "within {:.1} m of ({:.1}, {:.1})",
                self.radius, self.point.x, self.point.y
            ),
        })
    }
}

pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(ModeChangeDetector),
        Box::new(WaypointDetector::default()),
        Box::new(ArrivalDetector),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn snap(mode: ModeKind, target: Option<(f64, f64)>, x: f64) -> Snapshot {
        Snapshot {
            time: 0.0,
            pos: Vector2::new(x, 0.0),
            angle: 0.0,
            vel: Vector2::zeros(),
            omega: 0.0,
            mode,
            target: target.map(|(x, y)| Vector2::new(x, y)),
            arrived: false,
            angular_acceleration: 0.0,
            linear_acceleration: 0.0,
        }
    }

    #[test]
    fn mode_change_detected() {
        let mut det = ModeChangeDetector;
        let prev = snap(ModeKind::FollowPath, Some((1.0, 0.0)), 0.0);
        let curr = snap(ModeKind::Idle, None, 0.0);
        assert_eq!(
            det.check(&prev, &curr),
            Some(EventKind::ModeChange { from: ModeKind::FollowPath, to: ModeKind::Idle })
        );
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn waypoints_are_numbered() {
        let mut det = WaypointDetector::default();
        let a = snap(ModeKind::FollowPath, Some((10.0, 0.0)), 0.0);
        let b = snap(ModeKind::FollowPath, Some((20.0, 0.0)), 3.0);
        let c = snap(ModeKind::FollowPath, Some((30.0, 0.0)), 13.0);
        assert_eq!(det.check(&a, &a), None);
        assert_eq!(det.check(&a, &b), Some(EventKind::WaypointReached { index: 0 }));
        assert_eq!(det.check(&b, &c), Some(EventKind::WaypointReached { index: 1 }));
    }

    #[test]
    fn proximity_fires_once() {
        let mut det = ProximityDetector::new(Vector2::new(10.0, 0.0), 2.0);
        let far = snap(ModeKind::Seek, None, 0.0);
        let near = snap(ModeKind::Seek, None, 9.0);
        assert!(det.check(&far, &far).is_none());
        assert!(det.check(&far, &near).is_some());
        assert!(det.check(&near, &near).is_none());
    }
}
