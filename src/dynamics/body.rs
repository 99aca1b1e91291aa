use nalgebra::{Rotation2, Vector2};

use crate::error::Result;
use crate::math::heading_vector;
use crate::physics::hull::{Hull, MassProperties};

// ---------------------------------------------------------------------------
// Body contract consumed by guidance
// ---------------------------------------------------------------------------

/// The slice of a 2D rigid body that guidance reads and drives.
///
/// Implement this to put the controller on top of another physics engine.
/// Forces and torques accumulate until the engine's next step.
pub trait RigidBody {
    /// Body origin in world coordinates.
    fn position(&self) -> Vector2<f64>;
    /// Heading, rad counter-clockwise from +x. Not wrapped.
    fn angle(&self) -> f64;
    fn linear_velocity(&self) -> Vector2<f64>;
    fn angular_velocity(&self) -> f64;
    fn mass(&self) -> f64;
    /// Rotational inertia about the centre of mass.
    fn inertia(&self) -> f64;

    /// Centre of mass in world coordinates.
    fn world_center(&self) -> Vector2<f64> {
        self.position()
    }

    /// Unit vector along the nose (body +x axis).
    fn forward(&self) -> Vector2<f64> {
        heading_vector(self.angle())
    }

    fn apply_torque(&mut self, torque: f64);
    fn apply_force_to_center(&mut self, force: Vector2<f64>);
    fn set_linear_velocity(&mut self, v: Vector2<f64>);
    fn set_angular_velocity(&mut self, omega: f64);
    fn set_linear_damping(&mut self, damping: f64);
    fn set_angular_damping(&mut self, damping: f64);
}

// ---------------------------------------------------------------------------
// Concrete body: semi-implicit Euler, centre of mass may sit off the origin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Body {
    center: Vector2<f64>,       // m, world centre of mass
    angle: f64,                 // rad
    vel: Vector2<f64>,          // m/s, of the centre of mass
    omega: f64,                 // rad/s
    mass: f64,                  // kg
    inertia: f64,               // kg·m^2 about the centre of mass
    local_center: Vector2<f64>, // m, centre of mass in body frame
    linear_damping: f64,        // 1/s
    angular_damping: f64,       // 1/s
    force: Vector2<f64>,        // accumulated this step
    torque: f64,                // accumulated this step
}

impl Body {
    /// Body whose centre of mass coincides with its origin.
    pub fn new(position: Vector2<f64>, angle: f64, mass: f64, inertia: f64) -> Self {
        Self::with_mass_properties(
            position,
            angle,
            &MassProperties { mass, center: Vector2::zeros(), inertia },
        )
    }

    pub fn with_mass_properties(
        position: Vector2<f64>,
        angle: f64,
        props: &MassProperties,
    ) -> Self {
        let local_center = props.center;
        Self {
            center: position + Rotation2::new(angle) * local_center,
            angle,
            vel: Vector2::zeros(),
            omega: 0.0,
            mass: props.mass,
            inertia: props.inertia,
            local_center,
            linear_damping: 0.0,
            angular_damping: 0.0,
            force: Vector2::zeros(),
            torque: 0.0,
        }
    }

    pub fn from_hull(hull: &Hull, position: Vector2<f64>, angle: f64) -> Result<Self> {
        Ok(Self::with_mass_properties(position, angle, &hull.mass_properties()?))
    }

    pub fn with_damping(mut self, linear: f64, angular: f64) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn linear_damping(&self) -> f64 {
        self.linear_damping
    }

    pub fn angular_damping(&self) -> f64 {
        self.angular_damping
    }

    /// Force accumulated since the last step.
    pub fn pending_force(&self) -> Vector2<f64> {
        self.force
    }

    /// Torque accumulated since the last step.
    pub fn pending_torque(&self) -> f64 {
        self.torque
    }

    /// Advance by `dt`: integrate velocities, damp, integrate pose, clear accumulators.
    pub fn step(&mut self, dt: f64) {
        self.vel += self.force * (dt / self.mass);
        self.omega += self.torque * dt / self.inertia;

        // Same damping form as Box2D: stable for any dt.
        self.vel *= 1.0 / (1.0 + dt * self.linear_damping);
        self.omega *= 1.0 / (1.0 + dt * self.angular_damping);

        self.center += self.vel * dt;
        self.angle += self.omega * dt;

        self.force = Vector2::zeros();
        self.torque = 0.0;
    }
}

impl RigidBody for Body {
    fn position(&self) -> Vector2<f64> {
        self.center - Rotation2::new(self.angle) * self.local_center
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn linear_velocity(&self) -> Vector2<f64> {
        self.vel
    }

    fn angular_velocity(&self) -> f64 {
        self.omega
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn inertia(&self) -> f64 {
        self.inertia
    }

    fn world_center(&self) -> Vector2<f64> {
        self.center
    }

    fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    fn apply_force_to_center(&mut self, force: Vector2<f64>) {
        self.force += force;
    }

    fn set_linear_velocity(&mut self, v: Vector2<f64>) {
        self.vel = v;
    }

    fn set_angular_velocity(&mut self, omega: f64) {
        self.omega = omega;
    }

    fn set_linear_damping(&mut self, damping: f64) {
        self.linear_damping = damping;
    }

    fn set_angular_damping(&mut self, damping: f64) {
        self.angular_damping = damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn force_accelerates_and_clears() {
        let mut b = Body::new(Vector2::zeros(), 0.0, 2.0, 1.0);
        b.apply_force_to_center(Vector2::new(4.0, 0.0));
        b.step(0.5);
        // a = 2 m/s^2 -> v = 1 m/s, x = 0.5 m (velocity first)
        assert_abs_diff_eq!(b.linear_velocity().x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.position().x, 0.5, epsilon = 1e-12);
        assert_eq!(b.pending_force(), Vector2::zeros());
        b.step(0.5);
        assert_abs_diff_eq!(b.linear_velocity().x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn torque_spins_body() {
        let mut b = Body::new(Vector2::zeros(), 0.0, 1.0, 4.0);
        b.apply_torque(8.0);
        b.step(0.1);
        assert_abs_diff_eq!(b.angular_velocity(), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(b.angle(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn damping_bleeds_velocity() {
        let mut b = Body::new(Vector2::zeros(), 0.0, 1.0, 1.0).with_damping(1.0, 1.0);
        b.set_linear_velocity(Vector2::new(10.0, 0.0));
        b.set_angular_velocity(1.0);
        b.step(0.1);
        assert!(b.linear_velocity().x < 10.0);
        assert!(b.angular_velocity() < 1.0);
    }

    #[test]
    fn origin_tracks_offset_center() {
        let props = MassProperties { mass: 1.0, center: Vector2::new(1.0, 0.0), inertia: 1.0 };
        let b = Body::with_mass_properties(Vector2::new(5.0, 5.0), FRAC_PI_2, &props);
        // Centre of mass is one unit along the nose, which points +y.
        assert_abs_diff_eq!(b.world_center().y, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.position().x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.position().y, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.forward().y, 1.0, epsilon = 1e-12);
    }
}
