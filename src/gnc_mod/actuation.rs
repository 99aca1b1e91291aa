use nalgebra::Vector2;
use tracing::trace;

use crate::dynamics::RigidBody;
use crate::math::{bearing, wrap_angle};
use super::controller::FeedbackController;

// ---------------------------------------------------------------------------
// Limiter and proximity
// ---------------------------------------------------------------------------

/// Clamp `value` into [-limit, limit].
///
/// Written with min/max so a misconfigured (negative or NaN) limit never panics.
pub fn clamp_symmetric(value: f64, limit: f64) -> f64 {
    value.max(-limit).min(limit)
}

/// True when `position` lies strictly inside the circle of `radius` around `target`.
pub fn is_reached(position: &Vector2<f64>, target: &Vector2<f64>, radius: f64) -> bool {
    (target - position).norm_squared() < radius * radius
}

/// Bearing error of the nose relative to the line of sight, in [-pi, pi).
/// Positive when the nose is counter-clockwise of the target.
pub fn bearing_error<B: RigidBody + ?Sized>(body: &B, target: &Vector2<f64>) -> f64 {
    let heading = wrap_angle(body.angle());
    let los = wrap_angle(bearing(&body.position(), target));
    wrap_angle(heading - los)
}

// ---------------------------------------------------------------------------
// Turn law
// ---------------------------------------------------------------------------

/// Steer the nose toward `target`. Returns the applied angular acceleration.
///
/// Negative feedback: the controller output is negated so a positive bearing
/// error produces clockwise torque.
pub fn apply_turn_torque<B, C>(
    body: &mut B,
    target: &Vector2<f64>,
    controller: &mut C,
    max_angular_acceleration: f64,
    dt: f64,
) -> f64
where
    B: RigidBody + ?Sized,
    C: FeedbackController + ?Sized,
{
    let error = bearing_error(body, target);
    controller.add_sample(error, dt);

    let ang_acc = clamp_symmetric(-controller.last_output(), max_angular_acceleration);
    body.apply_torque(ang_acc * body.inertia());
    trace!(error, ang_acc, "turn");
    ang_acc
}

// ---------------------------------------------------------------------------
// Thrust law
// ---------------------------------------------------------------------------

/// Drive the body along its nose toward `target`. Returns the applied linear
/// acceleration (negative means braking).
///
/// All momentum is first re-pointed along the nose, so sideways drift left
/// over from turning never accumulates.
pub fn apply_thrust<B, C>(
    body: &mut B,
    target: &Vector2<f64>,
    controller: &mut C,
    max_linear_acceleration: f64,
    dt: f64,
) -> f64
where
    B: RigidBody + ?Sized,
    C: FeedbackController + ?Sized,
{
    let distance = (target - body.world_center()).norm();
    let direction = body.forward();

    let speed = body.linear_velocity().norm();
    body.set_linear_velocity(direction * speed);

    controller.add_sample(distance, dt);
    let lin_acc = clamp_symmetric(controller.last_output(), max_linear_acceleration);

    body.apply_force_to_center(direction * (lin_acc * body.mass()));
    trace!(distance, speed, lin_acc, "thrust");
    lin_acc
}
