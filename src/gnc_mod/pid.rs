use std::collections::VecDeque;

use crate::config::Gains;
use super::controller::FeedbackController;

// ---------------------------------------------------------------------------
// PID controller (single axis) with plant gain
// ---------------------------------------------------------------------------

/// Samples kept for the integral term.
pub const HISTORY_LEN: usize = 10;

/// PID over a sliding window of recent errors.
///
/// u = plant * (kp * e + ki * sum(e_i * dt) + kd * de/dt)
///
/// The integral only spans the last [`HISTORY_LEN`] samples, which bounds
/// windup without a separate clamp. The derivative is zero until two samples
/// have been seen since the last reset.
#[derive(Debug, Clone)]
pub struct Pid {
    pub gains: Gains,
    history: VecDeque<f64>,
    integral: f64,
    derivative: f64,
    output: f64,
}

impl Pid {
    pub fn new(gains: Gains) -> Self {
        Self {
            gains,
            history: VecDeque::with_capacity(HISTORY_LEN),
            integral: 0.0,
            derivative: 0.0,
            output: 0.0,
        }
    }

    /// Add a sample and return the new output.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        self.derivative = match self.history.back() {
            Some(&prev) if dt > 0.0 => (error - prev) / dt,
            _ => 0.0,
        };

        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(error);
        self.integral = self.history.iter().sum::<f64>() * dt;

        let g = &self.gains;
        let law = g.proportional * error
            + g.integral * self.integral
            + g.derivative * self.derivative;
        self.output = g.plant * law;
        self.output
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.integral = 0.0;
        self.derivative = 0.0;
        self.output = 0.0;
    }

    pub fn samples(&self) -> usize {
        self.history.len()
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self::new(Gains::new(1.0, 0.0, 0.0, 1.0))
    }
}

impl FeedbackController for Pid {
    fn add_sample(&mut self, error: f64, dt: f64) {
        self.update(error, dt);
    }

    fn last_output(&self) -> f64 {
        self.output
    }

    fn reset_history(&mut self) {
        self.reset();
    }

    fn set_gains(&mut self, gains: Gains) {
        self.gains = gains;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pid_proportional() {
        let mut pid = Pid::new(Gains::new(1.0, 0.0, 0.0, 1.0));
        let out = pid.update(0.5, 0.01);
        assert_relative_eq!(out, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn pid_integral_accumulates() {
        let mut pid = Pid::new(Gains::new(0.0, 1.0, 0.0, 1.0));
        pid.update(1.0, 0.1);
        let out = pid.update(1.0, 0.1);
        assert_relative_eq!(out, 0.2, epsilon = 1e-10);
    }

    #[test]
    fn integral_window_is_bounded() {
        let mut pid = Pid::new(Gains::new(0.0, 1.0, 0.0, 1.0));
        for _ in 0..100 {
            pid.update(1.0, 0.1);
        }
        assert_eq!(pid.samples(), HISTORY_LEN);
        assert_relative_eq!(pid.last_output(), HISTORY_LEN as f64 * 0.1, epsilon = 1e-10);
    }

    #[test]
    fn derivative_needs_two_samples() {
        let mut pid = Pid::new(Gains::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(pid.update(3.0, 0.5), 0.0);
        assert_relative_eq!(pid.update(4.0, 0.5), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn plant_gain_scales_output() {
        let mut pid = Pid::new(Gains::new(2.0, 0.0, 0.0, 3.0));
        assert_relative_eq!(pid.update(1.0, 0.1), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = Pid::new(Gains::new(1.0, 1.0, 1.0, 1.0));
        pid.update(5.0, 0.1);
        pid.update(6.0, 0.1);
        pid.reset_history();
        assert_eq!(pid.samples(), 0);
        assert_eq!(pid.last_output(), 0.0);
        // No derivative kick from the pre-reset sample.
        let out = pid.update(1.0, 0.1);
        assert_relative_eq!(out, 1.0 + 0.1, epsilon = 1e-10);
    }
}
