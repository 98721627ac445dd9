// tuner-core/src/lib.rs

//! The core logic for the real-time pitch tuner.
//! This crate is responsible for audio capture and conditioning, pitch
//! estimation, smoothing, and note math. It is completely headless
//! and contains no GUI code.

pub mod audio;
pub mod conditioning;
pub mod error;
pub mod history;
pub mod note;
pub mod pitch;
pub mod session;
pub mod smoother;
pub mod tone;

/// Fixed defaults for the whole pipeline. A plain constant surface: no
/// CLI, no persisted state format.
#[derive(Debug, Clone, Copy)]
pub struct TunerConfig {
    /// RMS amplitude below which a frame counts as silence.
    pub rms_gate: f32,
    /// Lower bound of the pitch search range in Hz.
    pub min_frequency: f32,
    /// Upper bound of the pitch search range in Hz.
    pub max_frequency: f32,
    /// Exponential smoothing factor for the estimate stream.
    pub smoothing: f32,
    /// Number of samples retained by the pitch history.
    pub history_len: usize,
    /// Samples per analysis frame.
    pub frame_size: usize,
    /// Reference pitch for A4 in Hz.
    pub reference_pitch: f32,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            rms_gate: 0.01,
            min_frequency: 80.0,
            max_frequency: 1500.0,
            smoothing: 0.2,
            history_len: 800,
            frame_size: 4096,
            reference_pitch: 440.0,
        }
    }
}

/// The nearest note to a smoothed pitch, with its tuning offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteResult {
    /// Equal-temperament note index (69 = La4).
    pub note_index: i32,
    /// Solfège name plus octave, e.g. "La4".
    pub note_name: String,
    /// Exact frequency of `note_index`; always re-derived, never cached.
    pub target_frequency: f32,
    /// Whole-cent deviation of the pitch from `target_frequency`.
    pub cents_offset: i32,
}

/// Everything one processed frame yields for the presentation layer.
#[derive(Debug, Clone)]
pub struct TickResult {
    /// This frame's estimate, `None` for silence or out-of-range pitch.
    /// Appended to the history every tick regardless.
    pub raw_estimate: Option<f32>,
    /// Current smoothed pitch; survives `None` frames.
    pub smoothed_frequency: Option<f32>,
    /// Nearest note to the smoothed pitch, once one exists.
    pub note: Option<NoteResult>,
    /// Needle deflection in `[0, 1]`; 0.5 is in tune.
    pub needle_position: Option<f32>,
}

#[cfg(test)]
pub(crate) mod test_signals {
    /// A pure sine frame for test fixtures.
    pub fn sine(frequency: f32, sample_rate: u32, length: usize, amplitude: f32) -> Vec<f32> {
        (0..length)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }
}
