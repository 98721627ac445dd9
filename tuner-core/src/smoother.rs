//! # Pitch Smoothing Module
//!
//! Exponential moving average over the per-frame frequency estimates.
//! Frame-to-frame autocorrelation estimates are noisy; smoothing trades a
//! little latency for a stable displayed note and needle, which matches
//! tuning as a continuous gesture.

/// Exponential smoother for the estimate stream.
///
/// Holds the single piece of state in the pipeline: the last smoothed
/// frequency. `None` estimates are never fed in, so the value survives
/// silent frames untouched.
#[derive(Debug, Clone)]
pub struct PitchSmoother {
    alpha: f32,
    state: Option<f32>,
}

impl PitchSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: None }
    }

    /// Feeds one non-`None` estimate and returns the new smoothed value.
    ///
    /// The first estimate ever sets the state directly; afterwards
    /// `state = alpha * freq + (1 - alpha) * state`.
    pub fn update(&mut self, frequency: f32) -> f32 {
        let next = match self.state {
            Some(current) => self.alpha * frequency + (1.0 - self.alpha) * current,
            None => frequency,
        };
        self.state = Some(next);
        next
    }

    /// The current smoothed frequency, or `None` before the first estimate.
    pub fn current(&self) -> Option<f32> {
        self.state
    }

    /// Clears the state, as when a session restarts.
    pub fn reset(&mut self) {
        self.state = None;
    }
}
