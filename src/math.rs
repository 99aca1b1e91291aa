use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

/// Wrap an angle into [-pi, pi).
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector along `angle` (rad, counter-clockwise from +x).
pub fn heading_vector(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}

/// Direction from `from` to `to`, in radians.
pub fn bearing(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrap_keeps_canonical_range() {
        assert_abs_diff_eq!(wrap_angle(0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(7.0 * TAU + 0.25), 0.25, epsilon = 1e-9);
        // pi maps to the lower end
        assert_abs_diff_eq!(wrap_angle(PI), -PI, epsilon = 1e-12);
    }

    #[test]
    fn bearing_quadrants() {
        let o = Vector2::zeros();
        assert_abs_diff_eq!(bearing(&o, &Vector2::new(1.0, 0.0)), 0.0);
        assert_abs_diff_eq!(bearing(&o, &Vector2::new(0.0, 2.0)), PI / 2.0);
        assert_abs_diff_eq!(bearing(&o, &Vector2::new(0.0, -2.0)), -PI / 2.0);
    }
}
