//! # Pitch Estimation Module
//!
//! Estimates the fundamental frequency of a single audio frame using
//! time-domain autocorrelation with parabolic sub-sample refinement.
//!
//! ## Features
//! - RMS noise gate to reject silence and low-level noise
//! - Autocorrelation peak search that skips the zero-lag decay
//! - Parabolic interpolation for sub-sample period precision
//! - Frequency range limiting to the practical vocal/instrument band

use crate::error::PitchError;
use crate::TunerConfig;

/// Single-frame fundamental frequency estimator.
///
/// Stateless apart from its configuration: every call to
/// [`estimate`](PitchEstimator::estimate) is a pure function of the frame
/// it is given.
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    /// RMS amplitude below which a frame is treated as silence.
    rms_gate: f32,
    /// Lower bound of the accepted frequency range in Hz.
    min_frequency: f32,
    /// Upper bound of the accepted frequency range in Hz.
    max_frequency: f32,
}

impl PitchEstimator {
    pub fn new(config: &TunerConfig) -> Self {
        Self {
            rms_gate: config.rms_gate,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
        }
    }

    /// Estimates the fundamental frequency of one frame.
    ///
    /// Returns `Ok(None)` for the routine "no pitch" cases: silence below
    /// the noise gate, or a detected period outside the configured
    /// frequency range. `None` here is an expected result, not a failure.
    ///
    /// # Errors
    /// [`PitchError::InvalidInput`] for an empty frame or a zero sample
    /// rate; these are caller bugs and fail loudly.
    pub fn estimate(&self, frame: &[f32], sample_rate: u32) -> Result<Option<f32>, PitchError> {
        if frame.is_empty() {
            return Err(PitchError::InvalidInput("empty audio frame"));
        }
        if sample_rate == 0 {
            return Err(PitchError::InvalidInput("sample rate must be positive"));
        }

        let n = frame.len();

        // Noise gate: reject frames whose RMS is below the threshold.
        let rms = (frame.iter().map(|&s| s * s).sum::<f32>() / n as f32).sqrt();
        if rms < self.rms_gate {
            return Ok(None);
        }

        // Unnormalized autocorrelation over every lag. O(N^2), which is
        // fine for one 4096-sample frame per tick; an FFT cross-correlation
        // would be the drop-in replacement if larger frames were needed.
        let mut corr = vec![0.0f32; n];
        for (lag, value) in corr.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for i in 0..(n - lag) {
                sum += frame[i] * frame[i + lag];
            }
            *value = sum;
        }

        // Walk past the zero-lag peak: the initial descending slope always
        // dominates and is not a pitch period.
        let mut d = 0;
        while d < n - 1 && corr[d] > corr[d + 1] {
            d += 1;
        }

        // Strongest remaining lag is the period candidate.
        let mut max_pos = 0;
        let mut max_val = f32::NEG_INFINITY;
        for (lag, &value) in corr.iter().enumerate().skip(d) {
            if value > max_val {
                max_val = value;
                max_pos = lag;
            }
        }
        if max_pos == 0 {
            return Ok(None);
        }

        // Parabolic interpolation around the peak recovers sub-sample
        // precision. A missing right neighbor is substituted with the peak
        // value itself; a flat peak falls back to the integer lag.
        let y1 = corr[max_pos - 1];
        let y2 = corr[max_pos];
        let y3 = if max_pos + 1 < n { corr[max_pos + 1] } else { y2 };
        let denominator = 2.0 * y2 - y1 - y3;
        let peak = if denominator != 0.0 {
            max_pos as f32 + (y3 - y1) / (2.0 * denominator)
        } else {
            max_pos as f32
        };

        let frequency = sample_rate as f32 / peak;
        if frequency < self.min_frequency || frequency > self.max_frequency {
            return Ok(None);
        }
        Ok(Some(frequency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_signals::sine;

    fn estimator() -> PitchEstimator {
        PitchEstimator::new(&TunerConfig::default())
    }

    #[test]
    fn all_zero_frame_is_silence() {
        let frame = vec![0.0; 4096];
        assert_eq!(estimator().estimate(&frame, 44100).unwrap(), None);
    }

    #[test]
    fn sub_threshold_tone_is_gated() {
        // A periodic signal whose RMS (amp / sqrt(2)) sits below the 0.01
        // gate must still be rejected.
        let frame = sine(440.0, 44100, 4096, 0.01);
        assert_eq!(estimator().estimate(&frame, 44100).unwrap(), None);
    }

    #[test]
    fn pure_tone_is_detected_accurately() {
        let frame = sine(440.0, 44100, 4096, 0.5);
        let freq = estimator().estimate(&frame, 44100).unwrap().unwrap();
        assert!((freq - 440.0).abs() < 0.5, "estimated {freq} Hz");
    }

    #[test]
    fn out_of_range_tones_are_rejected() {
        let low = sine(50.0, 44100, 4096, 0.5);
        let high = sine(2000.0, 44100, 4096, 0.5);
        assert_eq!(estimator().estimate(&low, 44100).unwrap(), None);
        assert_eq!(estimator().estimate(&high, 44100).unwrap(), None);
    }

    #[test]
    fn malformed_input_fails_loudly() {
        assert!(matches!(
            estimator().estimate(&[], 44100),
            Err(PitchError::InvalidInput(_))
        ));
        let frame = sine(440.0, 44100, 4096, 0.5);
        assert!(matches!(
            estimator().estimate(&frame, 0),
            Err(PitchError::InvalidInput(_))
        ));
    }
}
