use nalgebra::Vector2;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::SimConfig;
use crate::dynamics::{Body, RigidBody};
use crate::gnc::{FeedbackController, GuidanceController, ModeKind};
use super::event::{default_detectors, EventDetector, SimEvent};

// ---------------------------------------------------------------------------
// Per-tick record
// ---------------------------------------------------------------------------

/// Body and guidance state after one physics step.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time: f64,             // s
    pub pos: Vector2<f64>,     // m, body origin
    pub angle: f64,            // rad
    pub vel: Vector2<f64>,     // m/s
    pub omega: f64,            // rad/s
    pub mode: ModeKind,
    pub target: Option<Vector2<f64>>,
    pub arrived: bool,
    pub angular_acceleration: f64, // rad/s^2 commanded this step
    pub linear_acceleration: f64,  // m/s^2 commanded this step
}

impl Snapshot {
    fn capture<C: FeedbackController>(
        time: f64,
        body: &Body,
        guidance: &GuidanceController<C>,
    ) -> Self {
        let act = guidance.last_actuation();
        Snapshot {
            time,
            pos: body.position(),
            angle: body.angle(),
            vel: body.linear_velocity(),
            omega: body.angular_velocity(),
            mode: guidance.kind(),
            target: guidance.target(),
            arrived: guidance.has_arrived(),
            angular_acceleration: act.angular_acceleration,
            linear_acceleration: act.linear_acceleration,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Distance from the body origin to the active target.
    pub fn distance_to_target(&self) -> Option<f64> {
        self.target.map(|t| (t - self.pos).norm())
    }
}

/// Everything recorded during one run.
#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    pub trajectory: Vec<Snapshot>,
    pub events: Vec<SimEvent>,
}

impl FlightLog {
    pub fn last(&self) -> Option<&Snapshot> {
        self.trajectory.last()
    }
}

// ---------------------------------------------------------------------------
// Fixed-step loop
// ---------------------------------------------------------------------------

/// Step guidance and body together until `max_time`, or until guidance falls
/// back to Idle after having been active.
///
/// Commands should be issued on `guidance` before calling this.
pub fn simulate_with<C: FeedbackController>(
    body: &mut Body,
    guidance: &mut GuidanceController<C>,
    config: &SimConfig,
    detectors: &mut [Box<dyn EventDetector>],
) -> FlightLog {
    let mut log = FlightLog {
        trajectory: Vec::with_capacity(step_capacity(config)),
        events: Vec::new(),
    };

    let mut time = 0.0;
    log.trajectory.push(Snapshot::capture(time, body, guidance));
    if !(config.dt > 0.0 && config.dt.is_finite()) {
        warn!(dt = config.dt, "time step must be positive; nothing simulated");
        return log;
    }
    let mut active = guidance.kind() != ModeKind::Idle;

    while time < config.max_time {
        guidance.update(body, config.dt);
        body.step(config.dt);
        time += config.dt;

        // Pose after the step, actuation commanded before it.
        let current = Snapshot::capture(time, body, guidance);
        trace!(time, speed = current.speed(), mode = %current.mode, "tick");

        if let Some(prev) = log.trajectory.last() {
            for det in detectors.iter_mut() {
                if let Some(kind) = det.check(prev, &current) {
                    debug!(time, ?kind, "event");
                    log.events.push(SimEvent { time, kind });
                }
            }
        }

        let idle = current.mode == ModeKind::Idle;
        log.trajectory.push(current);

        if idle && active {
            break;
        }
        active |= !idle;
    }

    log
}

fn step_capacity(config: &SimConfig) -> usize {
    let steps = config.max_time / config.dt;
    if steps.is_finite() && steps > 0.0 {
        (steps as usize).saturating_add(1).min(200_000)
    } else {
        1
    }
}

/// Simulate with the default event detectors (convenience wrapper).
pub fn simulate<C: FeedbackController>(
    body: &mut Body,
    guidance: &mut GuidanceController<C>,
    config: &SimConfig,
) -> FlightLog {
    let mut detectors = default_detectors();
    simulate_with(body, guidance, config, &mut detectors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuidanceConfig;
    use crate::sim::event::EventKind;

    fn unit_body() -> Body {
        Body::new(Vector2::zeros(), 0.0, 1.0, 1.0)
    }

    #[test]
    fn idle_run_lasts_max_time() {
        let mut body = unit_body();
        let mut g = GuidanceController::new(GuidanceConfig::default());
        let config = SimConfig { dt: 0.1, max_time: 1.0 };
        let log = simulate(&mut body, &mut g, &config);
        assert!(log.trajectory.len() >= 10);
        assert!(log.events.is_empty());
        assert_eq!(log.last().map(|s| s.pos), Some(Vector2::zeros()));
    }

    #[test]
    fn path_run_stops_when_idle() {
        let mut body = unit_body();
        let mut g = GuidanceController::new(GuidanceConfig::default());
        g.follow_path(&mut body, vec![Vector2::new(20.0, 0.0)]);
        let log = simulate(&mut body, &mut g, &SimConfig::default());

        let last = log.last().unwrap();
        assert_eq!(last.mode, ModeKind::Idle);
        assert!(last.time < SimConfig::default().max_time);
        let done = EventKind::ModeChange { from: ModeKind::FollowPath, to: ModeKind::Idle };
        assert!(log.events.iter().any(|e| e.kind == done));
    }

    #[test]
    fn non_positive_step_returns_initial_snapshot() {
        for dt in [0.0, -0.1, f64::NAN] {
            let mut body = unit_body();
            let mut g = GuidanceController::new(GuidanceConfig::default());
            g.seek(&mut body, Vector2::new(50.0, 0.0));
            let log = simulate(&mut body, &mut g, &SimConfig { dt, max_time: 1.0 });
            assert_eq!(log.trajectory.len(), 1);
            assert_eq!(log.trajectory[0].time, 0.0);
            assert!(log.events.is_empty());
        }
    }

    #[test]
    fn snapshot_time_is_monotonic() {
        let mut body = unit_body();
        let mut g = GuidanceController::new(GuidanceConfig::default());
        g.turn_towards(&mut body, Vector2::new(0.0, 5.0));
        let config = SimConfig { dt: 0.01, max_time: 0.5 };
        let log = simulate(&mut body, &mut g, &config);
        for w in log.trajectory.windows(2) {
            assert!(w[1].time > w[0].time);
        }
    }
}
