use crate::config::Gains;

/// Scalar feedback law driven by one error sample per tick.
///
/// Guidance only relies on this contract, so any filter with the same shape
/// (PID variants, lead-lag, table lookups) can sit behind it.
pub trait FeedbackController {
    /// Feed the error for this tick. `dt` is the time since the previous sample.
    fn add_sample(&mut self, error: f64, dt: f64);

    /// Output computed by the most recent [`add_sample`](Self::add_sample).
    fn last_output(&self) -> f64;

    /// Forget all accumulated samples; the next output depends on the next sample only.
    fn reset_history(&mut self);

    fn set_gains(&mut self, gains: Gains);
}
