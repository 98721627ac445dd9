//! # Tuner Session Module
//!
//! The orchestrator: owns the estimator and the smoothed-pitch state, and
//! turns one captured frame into one [`TickResult`] per tick. The original
//! display-refresh callback is reframed as the explicit, synchronous
//! [`process_frame`](TunerSession::process_frame), so the whole pipeline
//! runs under test without audio hardware or a display loop.

use anyhow::{Result, bail};
use cpal::traits::StreamTrait;
use crossbeam_channel::Receiver;

use crate::audio;
use crate::error::TunerError;
use crate::note;
use crate::pitch::PitchEstimator;
use crate::smoother::PitchSmoother;
use crate::{TickResult, TunerConfig};

/// Needle deflection saturates at this many cents off target.
const NEEDLE_RANGE_CENTS: i32 = 50;

/// Session lifecycle. There are no intermediate states; `stop` is
/// synchronous and immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// One tuning session: acquisition lifecycle plus per-frame pipeline state.
pub struct TunerSession {
    config: TunerConfig,
    estimator: PitchEstimator,
    smoother: PitchSmoother,
    stream: Option<cpal::Stream>,
    state: SessionState,
}

impl TunerSession {
    pub fn new(config: TunerConfig) -> Self {
        let estimator = PitchEstimator::new(&config);
        let smoother = PitchSmoother::new(config.smoothing);
        Self {
            config,
            estimator,
            smoother,
            stream: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Acquires the microphone and transitions to `Running`.
    ///
    /// Returns the channel on which conditioned frames arrive, plus the
    /// capture sample rate. On failure the session stays `Idle` and no
    /// resources are retained.
    pub fn start(&mut self) -> Result<(Receiver<Vec<f32>>, u32)> {
        if self.state == SessionState::Running {
            bail!("tuner session is already running");
        }
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(8);
        let (stream, sample_rate) = audio::start_capture(frame_tx, self.config)?;
        self.stream = Some(stream);
        self.state = SessionState::Running;
        eprintln!("[SESSION] Running at {} Hz", sample_rate);
        Ok((frame_rx, sample_rate))
    }

    /// Stops capture and returns to `Idle`. Idempotent: calling it on an
    /// idle session is a no-op.
    ///
    /// Hardware capture is paused before the stream handle is dropped, so
    /// no callback fires after this returns and teardown fails safe to
    /// silence.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                eprintln!("[SESSION] Error pausing stream: {}", e);
            }
            drop(stream);
        }
        if self.state == SessionState::Running {
            eprintln!("[SESSION] Stopped");
        }
        self.state = SessionState::Idle;
        self.smoother.reset();
    }

    /// Runs the pipeline over one frame: estimate, smooth, resolve note.
    ///
    /// `raw_estimate` is reported every tick so the history display gets a
    /// sample regardless; the smoothed value and note only appear once at
    /// least one estimate has been seen, and survive silent frames
    /// untouched.
    pub fn process_frame(
        &mut self,
        frame: &[f32],
        sample_rate: u32,
    ) -> Result<TickResult, TunerError> {
        let raw_estimate = self.estimator.estimate(frame, sample_rate)?;
        if let Some(frequency) = raw_estimate {
            self.smoother.update(frequency);
        }
        let smoothed_frequency = self.smoother.current();

        let note = match smoothed_frequency {
            Some(frequency) => Some(note::nearest_note(frequency)?),
            None => None,
        };
        let needle_position = note.as_ref().map(|note| {
            let clamped = note.cents_offset.clamp(-NEEDLE_RANGE_CENTS, NEEDLE_RANGE_CENTS);
            (clamped + NEEDLE_RANGE_CENTS) as f32 / (2 * NEEDLE_RANGE_CENTS) as f32
        });

        Ok(TickResult {
            raw_estimate,
            smoothed_frequency,
            note,
            needle_position,
        })
    }
}

impl Drop for TunerSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_signals::sine;

    #[test]
    fn tone_then_silence_keeps_the_smoothed_pitch() {
        let mut session = TunerSession::new(TunerConfig::default());
        let tone = sine(440.0, 44100, 4096, 0.5);

        let tick = session.process_frame(&tone, 44100).unwrap();
        assert!(tick.raw_estimate.is_some());
        let smoothed = tick.smoothed_frequency.unwrap();

        let silence = vec![0.0; 4096];
        let tick = session.process_frame(&silence, 44100).unwrap();
        assert_eq!(tick.raw_estimate, None);
        // The smoothed value is never overwritten by a silent frame.
        assert_eq!(tick.smoothed_frequency, Some(smoothed));
        assert!(tick.note.is_some());
    }

    #[test]
    fn tick_resolves_note_and_needle() {
        let mut session = TunerSession::new(TunerConfig::default());
        let tone = sine(440.0, 44100, 4096, 0.5);
        let tick = session.process_frame(&tone, 44100).unwrap();

        let note = tick.note.unwrap();
        assert_eq!(note.note_index, 69);
        assert_eq!(note.note_name, "La4");
        assert_eq!(note.target_frequency, crate::note::note_index_to_frequency(69));
        assert!(note.cents_offset.abs() <= 2, "cents {}", note.cents_offset);

        // In tune means the needle sits at the middle of its travel.
        let needle = tick.needle_position.unwrap();
        assert!((needle - 0.5).abs() <= 0.02, "needle {needle}");
    }

    #[test]
    fn no_note_before_the_first_estimate() {
        let mut session = TunerSession::new(TunerConfig::default());
        let silence = vec![0.0; 4096];
        let tick = session.process_frame(&silence, 44100).unwrap();
        assert_eq!(tick.raw_estimate, None);
        assert_eq!(tick.smoothed_frequency, None);
        assert!(tick.note.is_none());
        assert!(tick.needle_position.is_none());
    }

    #[test]
    fn stop_on_an_idle_session_is_a_no_op() {
        let mut session = TunerSession::new(TunerConfig::default());
        assert_eq!(session.state(), SessionState::Idle);
        session.stop();
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
    }
}
