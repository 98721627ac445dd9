//! # Signal Conditioning Module
//!
//! The fixed conditioning chain the audio source applies before any frame
//! reaches the estimator: a high-pass just below the search range, a
//! low-pass just above it, and a dynamics compressor to even out level.
//! Conditioning is the capture side's responsibility; the estimator never
//! filters.
//!
//! Filter state persists across frames so the stream stays continuous at
//! frame boundaries.

use std::f32::consts::PI;

use crate::TunerConfig;

/// High-pass corner sits this far below the minimum search frequency.
const HIGHPASS_MARGIN_HZ: f32 = 10.0;
/// Low-pass corner sits this far above the maximum search frequency.
const LOWPASS_MARGIN_HZ: f32 = 200.0;
/// Butterworth Q for both corner filters.
const FILTER_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

// Compressor settings, matching the Web Audio DynamicsCompressor defaults.
const COMPRESSOR_THRESHOLD_DB: f32 = -24.0;
const COMPRESSOR_RATIO: f32 = 12.0;
const COMPRESSOR_ATTACK_MS: f32 = 3.0;
const COMPRESSOR_RELEASE_MS: f32 = 250.0;

/// Second-order biquad filter, direct form 1, coefficients pre-normalized
/// by `a0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x: [f32; 2],
    y: [f32; 2],
}

impl Biquad {
    /// Low-pass filter at `freq` Hz.
    pub fn lowpass(sample_rate: f32, freq: f32, q: f32) -> Self {
        let w0 = 2.0 * PI * freq / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        Self::normalized(
            (1.0 - cos_w0) / 2.0,
            1.0 - cos_w0,
            (1.0 - cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    /// High-pass filter at `freq` Hz.
    pub fn highpass(sample_rate: f32, freq: f32, q: f32) -> Self {
        let w0 = 2.0 * PI * freq / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        Self::normalized(
            (1.0 + cos_w0) / 2.0,
            -(1.0 + cos_w0),
            (1.0 + cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x[0] + self.b2 * self.x[1]
            - self.a1 * self.y[0]
            - self.a2 * self.y[1];
        self.x[1] = self.x[0];
        self.x[0] = input;
        self.y[1] = self.y[0];
        self.y[0] = output;
        output
    }
}

/// One-band dynamics compressor with an envelope follower.
#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    attack_coefficient: f32,
    release_coefficient: f32,
    envelope: f32,
}

impl Compressor {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            threshold_db: COMPRESSOR_THRESHOLD_DB,
            ratio: COMPRESSOR_RATIO,
            attack_coefficient: one_pole_coefficient(COMPRESSOR_ATTACK_MS, sample_rate),
            release_coefficient: one_pole_coefficient(COMPRESSOR_RELEASE_MS, sample_rate),
            envelope: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // Envelope follower: fast attack, slow release.
        let level = input.abs();
        let coefficient = if level > self.envelope {
            self.attack_coefficient
        } else {
            self.release_coefficient
        };
        self.envelope = coefficient * self.envelope + (1.0 - coefficient) * level;

        if self.envelope <= 0.0 {
            return input;
        }
        let envelope_db = 20.0 * self.envelope.log10();
        if envelope_db <= self.threshold_db {
            return input;
        }
        // Everything above the threshold is reduced by the ratio.
        let over_db = envelope_db - self.threshold_db;
        let gain_db = over_db / self.ratio - over_db;
        input * 10.0_f32.powf(gain_db / 20.0)
    }
}

/// Converts a time constant in milliseconds to a one-pole smoothing
/// coefficient at the given sample rate.
fn one_pole_coefficient(time_ms: f32, sample_rate: f32) -> f32 {
    let time_samples = time_ms * 0.001 * sample_rate;
    (1.0 - 1.0 / time_samples).max(0.0)
}

/// The full capture-side chain: high-pass, low-pass, compressor.
#[derive(Debug, Clone)]
pub struct ConditioningChain {
    highpass: Biquad,
    lowpass: Biquad,
    compressor: Compressor,
}

impl ConditioningChain {
    pub fn new(sample_rate: f32, config: &TunerConfig) -> Self {
        Self {
            highpass: Biquad::highpass(
                sample_rate,
                config.min_frequency - HIGHPASS_MARGIN_HZ,
                FILTER_Q,
            ),
            lowpass: Biquad::lowpass(
                sample_rate,
                config.max_frequency + LOWPASS_MARGIN_HZ,
                FILTER_Q,
            ),
            compressor: Compressor::new(sample_rate),
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let sample = self.highpass.process(sample);
        let sample = self.lowpass.process(sample);
        self.compressor.process(sample)
    }
}
