//! Missile guidance state machine.
//!
//! Four behaviours drive one rigid body through two feedback loops (turn and
//! thrust):
//!
//! | Mode        | On entry                         | Each tick                                  |
//! |-------------|----------------------------------|--------------------------------------------|
//! | Idle        | zero linear and angular velocity | nothing                                    |
//! | TurnTowards | reset turn loop                  | torque toward the target                   |
//! | Seek        | reset both loops                 | torque + thrust, or hold still once inside |
//! | FollowPath  | skip reached waypoints, reset    | skip reached waypoints, torque + thrust    |
//!
//! Modes only change on commands, except that FollowPath drops to Idle once its
//! final waypoint has been reached. Every transition runs the entry action of
//! the incoming mode before it becomes current.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::GuidanceConfig;
use crate::dynamics::RigidBody;
use super::actuation::{apply_thrust, apply_turn_torque, bearing_error, is_reached};
use super::controller::FeedbackController;
use super::pid::Pid;
use super::waypoints::WaypointQueue;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Active behaviour together with the data it owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    TurnTowards {
        target: Vector2<f64>,
    },
    Seek {
        target: Vector2<f64>,
        /// Inside the seek radius as of the last tick; the body is held still.
        arrived: bool,
    },
    FollowPath {
        target: Vector2<f64>,
        waypoints: WaypointQueue,
    },
}

/// Tag of a [`Mode`], for logging and trajectory records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Idle,
    TurnTowards,
    Seek,
    FollowPath,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::TurnTowards { .. } => ModeKind::TurnTowards,
            Mode::Seek { .. } => ModeKind::Seek,
            Mode::FollowPath { .. } => ModeKind::FollowPath,
        }
    }

    pub fn target(&self) -> Option<Vector2<f64>> {
        match self {
            Mode::Idle => None,
            Mode::TurnTowards { target }
            | Mode::Seek { target, .. }
            | Mode::FollowPath { target, .. } => Some(*target),
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModeKind::Idle => "IDLE",
            ModeKind::TurnTowards => "TURN",
            ModeKind::Seek => "SEEK",
            ModeKind::FollowPath => "PATH",
        };
        f.write_str(name)
    }
}

/// Accelerations applied during the last tick. Zero on axes that were not driven.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Actuation {
    pub angular_acceleration: f64, // rad/s^2
    pub linear_acceleration: f64,  // m/s^2, along the nose
}

// ---------------------------------------------------------------------------
// Guidance controller
// ---------------------------------------------------------------------------

/// Guidance for a single missile.
///
/// The body is borrowed per call and never stored; exactly one controller
/// should drive a given body. Nothing is shared between instances, so separate
/// missiles can be stepped on separate threads.
#[derive(Debug, Clone)]
pub struct GuidanceController<C = Pid> {
    mode: Mode,
    config: GuidanceConfig,
    turn: C,
    thrust: C,
    last: Actuation,
}

impl GuidanceController<Pid> {
    pub fn new(config: GuidanceConfig) -> Self {
        Self::with_controllers(config, Pid::new(config.turn_gains), Pid::new(config.thrust_gains))
    }
}

impl Default for GuidanceController<Pid> {
    fn default() -> Self {
        Self::new(GuidanceConfig::default())
    }
}

impl<C: FeedbackController> GuidanceController<C> {
    /// Build around custom feedback laws. Gains from `config` are applied on
    /// every mode entry.
    pub fn with_controllers(config: GuidanceConfig, turn: C, thrust: C) -> Self {
        Self {
            mode: Mode::Idle,
            config,
            turn,
            thrust,
            last: Actuation::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Stop the body and hold.
    pub fn idle<B: RigidBody + ?Sized>(&mut self, body: &mut B) {
        self.change_mode(body, Mode::Idle);
    }

    /// Rotate in place toward `target`, indefinitely.
    pub fn turn_towards<B: RigidBody + ?Sized>(&mut self, body: &mut B, target: Vector2<f64>) {
        self.change_mode(body, Mode::TurnTowards { target });
    }

    /// Fly to `target` and hold still once inside the seek radius.
    pub fn seek<B: RigidBody + ?Sized>(&mut self, body: &mut B, target: Vector2<f64>) {
        self.change_mode(body, Mode::Seek { target, arrived: false });
    }

    /// Visit `points` in order, then go idle. An empty path goes idle at once.
    pub fn follow_path<B, I>(&mut self, body: &mut B, points: I)
    where
        B: RigidBody + ?Sized,
        I: IntoIterator<Item = Vector2<f64>>,
    {
        let mut waypoints: WaypointQueue = points.into_iter().collect();
        let next = match waypoints.pop() {
            Some(target) => Mode::FollowPath { target, waypoints },
            None => {
                debug!("empty path");
                Mode::Idle
            }
        };
        self.change_mode(body, next);
    }

    /// Re-aim without changing mode or touching loop history. Ignored while idle.
    pub fn set_target(&mut self, target: Vector2<f64>) {
        match &mut self.mode {
            Mode::Idle => debug!(?target, "set_target ignored while idle"),
            Mode::TurnTowards { target: t } | Mode::FollowPath { target: t, .. } => *t = target,
            Mode::Seek { target: t, arrived } => {
                *t = target;
                *arrived = false;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run the active mode for one fixed step of `dt` seconds.
    ///
    /// Call once per physics step, before the body is integrated. The loop
    /// gains assume `dt` stays constant.
    pub fn update<B: RigidBody + ?Sized>(&mut self, body: &mut B, dt: f64) {
        self.last = Actuation::default();

        let Self { mode, config, turn, thrust, last } = self;
        let exhausted = match mode {
            Mode::Idle => false,
            Mode::TurnTowards { target } => {
                last.angular_acceleration =
                    apply_turn_torque(body, target, turn, config.max_angular_acceleration, dt);
                false
            }
            Mode::Seek { target, arrived } => {
                if is_reached(&body.position(), target, config.min_seek_distance) {
                    if !*arrived {
                        info!(?target, "seek target reached");
                        *arrived = true;
                    }
                    stop(body);
                } else {
                    *arrived = false;
                    last.angular_acceleration =
                        apply_turn_torque(body, target, turn, config.max_angular_acceleration, dt);
                    last.linear_acceleration =
                        apply_thrust(body, target, thrust, config.max_linear_acceleration, dt);
                }
                false
            }
            Mode::FollowPath { target, waypoints } => {
                if advance_path(&body.position(), target, waypoints, config.min_seek_distance) {
                    true
                } else {
                    last.angular_acceleration =
                        apply_turn_torque(body, target, turn, config.max_angular_acceleration, dt);
                    last.linear_acceleration =
                        apply_thrust(body, target, thrust, config.max_linear_acceleration, dt);
                    false
                }
            }
        };

        if exhausted {
            info!("path complete");
            self.change_mode(body, Mode::Idle);
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn change_mode<B: RigidBody + ?Sized>(&mut self, body: &mut B, next: Mode) {
        let from = self.mode.kind();
        let entered = self.enter(body, next);
        debug!(%from, to = %entered.kind(), target = ?entered.target(), "mode change");
        self.mode = entered;
    }

    /// Entry action for `next`. Returns the mode that actually becomes current,
    /// which is Idle when a path is already exhausted on entry.
    fn enter<B: RigidBody + ?Sized>(&mut self, body: &mut B, next: Mode) -> Mode {
        match next {
            Mode::Idle => {
                stop(body);
                Mode::Idle
            }
            Mode::TurnTowards { .. } => {
                self.setup_turn(body);
                next
            }
            Mode::Seek { .. } => {
                self.setup_thrust(body);
                self.setup_turn(body);
                next
            }
            Mode::FollowPath { mut target, mut waypoints } => {
                let pos = body.position();
                if advance_path(&pos, &mut target, &mut waypoints, self.config.min_seek_distance) {
                    debug!("path exhausted on entry");
                    return self.enter(body, Mode::Idle);
                }
                self.setup_thrust(body);
                self.setup_turn(body);
                Mode::FollowPath { target, waypoints }
            }
        }
    }

    fn setup_turn<B: RigidBody + ?Sized>(&mut self, body: &mut B) {
        body.set_angular_damping(0.0);
        self.turn.reset_history();
        self.turn.set_gains(self.config.turn_gains);
    }

    fn setup_thrust<B: RigidBody + ?Sized>(&mut self, body: &mut B) {
        body.set_linear_damping(0.0);
        self.thrust.reset_history();
        self.thrust.set_gains(self.config.thrust_gains);
    }

    // -----------------------------------------------------------------------
    // Queries and configuration
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn target(&self) -> Option<Vector2<f64>> {
        self.mode.target()
    }

    /// Waypoints still queued behind the current target.
    pub fn remaining_waypoints(&self) -> usize {
        match &self.mode {
            Mode::FollowPath { waypoints, .. } => waypoints.len(),
            _ => 0,
        }
    }

    /// Seek mode is holding inside its radius.
    pub fn has_arrived(&self) -> bool {
        matches!(self.mode, Mode::Seek { arrived: true, .. })
    }

    /// Bearing error toward the current target, if any.
    pub fn bearing_error<B: RigidBody + ?Sized>(&self, body: &B) -> Option<f64> {
        self.target().map(|t| bearing_error(body, &t))
    }

    pub fn last_actuation(&self) -> Actuation {
        self.last
    }

    pub fn turn_controller(&self) -> &C {
        &self.turn
    }

    pub fn thrust_controller(&self) -> &C {
        &self.thrust
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Replace limits and gains. New gains take effect on the next mode entry.
    pub fn set_config(&mut self, config: GuidanceConfig) {
        self.config = config;
    }

    pub fn max_linear_acceleration(&self) -> f64 {
        self.config.max_linear_acceleration
    }

    pub fn set_max_linear_acceleration(&mut self, v: f64) {
        self.config.max_linear_acceleration = v;
    }

    pub fn max_angular_acceleration(&self) -> f64 {
        self.config.max_angular_acceleration
    }

    pub fn set_max_angular_acceleration(&mut self, v: f64) {
        self.config.max_angular_acceleration = v;
    }

    pub fn min_seek_distance(&self) -> f64 {
        self.config.min_seek_distance
    }

    pub fn set_min_seek_distance(&mut self, v: f64) {
        self.config.min_seek_distance = v;
    }
}

fn stop<B: RigidBody + ?Sized>(body: &mut B) {
    body.set_linear_velocity(Vector2::zeros());
    body.set_angular_velocity(0.0);
}

/// Pull waypoints into `target` while it is already reached. Returns true once
/// the final target is reached with nothing left to pull.
fn advance_path(
    position: &Vector2<f64>,
    target: &mut Vector2<f64>,
    waypoints: &mut WaypointQueue,
    radius: f64,
) -> bool {
    while is_reached(position, target, radius) {
        match waypoints.pop() {
            Some(next) => {
                info!(reached = ?*target, next = ?next, left = waypoints.len(), "waypoint reached");
                *target = next;
            }
            None => return true,
        }
    }
    trace!(?target, left = waypoints.len(), "following path");
    false
}
