//! # Reference Tone Module
//!
//! A fixed 440 Hz comparison tone on the default output device, at a low
//! fixed gain. Its lifecycle is fully independent of the tuner session:
//! it can play while the tuner is stopped and vice versa.

use std::f32::consts::PI;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use anyhow::{Result, anyhow};

/// Output level of the reference tone. Deliberately quiet.
pub const REFERENCE_TONE_GAIN: f32 = 0.08;

/// Phase-accumulator sine generator.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    sample_rate: f32,
    sample_clock: f32,
    frequency: f32,
}

impl SineOscillator {
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_clock: 0.0,
            frequency,
        }
    }

    /// Next unit-amplitude sample.
    pub fn next_sample(&mut self) -> f32 {
        self.sample_clock = (self.sample_clock + 1.0) % self.sample_rate;
        (self.sample_clock * self.frequency * 2.0 * PI / self.sample_rate).sin()
    }
}

/// Continuous reference tone with start/stop lifecycle.
pub struct ReferenceTone {
    frequency: f32,
    gain: f32,
    stream: Option<cpal::Stream>,
}

impl ReferenceTone {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            gain: REFERENCE_TONE_GAIN,
            stream: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }

    /// Starts the tone on the default output device. A no-op if the tone
    /// is already playing.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let supported_config = device.default_output_config()?;
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let stream_config: cpal::StreamConfig = supported_config.into();

        eprintln!("[TONE] Playing {} Hz on {}", self.frequency, device.name()?);

        let err_fn = |err| eprintln!("[TONE] Stream error: {}", err);
        let mut oscillator = SineOscillator::new(self.frequency, sample_rate);
        let gain = self.gain;

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = gain * oscillator.next_sample();
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            err_fn,
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Stops the tone. Idempotent; pauses hardware output before the
    /// stream handle is dropped.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                eprintln!("[TONE] Error pausing stream: {}", e);
            }
            drop(stream);
            eprintln!("[TONE] Stopped");
        }
    }
}

impl Drop for ReferenceTone {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillator_produces_a_unit_sine_at_the_requested_frequency() {
        // 441 Hz at 44.1 kHz has an exact 100-sample period.
        let mut oscillator = SineOscillator::new(441.0, 44100.0);
        let samples: Vec<f32> = (0..44100).map(|_| oscillator.next_sample()).collect();

        let peak = samples.iter().fold(0.0f32, |max, &s| max.max(s.abs()));
        assert!(peak <= 1.0 + 1e-6);
        assert!(peak > 0.99, "peak {peak}");

        // One second of a 441 Hz tone crosses zero upward 441 times.
        let upward_crossings = samples
            .windows(2)
            .filter(|pair| pair[0] <= 0.0 && pair[1] > 0.0)
            .count();
        assert!(
            (440..=442).contains(&upward_crossings),
            "crossings {upward_crossings}"
        );
    }

    #[test]
    fn stop_without_start_is_a_no_op() {
        let mut tone = ReferenceTone::new(440.0);
        assert!(!tone.is_playing());
        tone.stop();
        tone.stop();
        assert!(!tone.is_playing());
    }
}
