//! # Audio Capture Module
//!
//! Real-time microphone capture using CPAL. Selects a mono f32 input
//! configuration near 44.1 kHz, runs the conditioning chain over every
//! sample, and hands fixed-size frames to the pipeline over a channel.
//!
//! The estimator receives already-conditioned signal; band-limiting and
//! compression happen here, on the capture side.

use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;
use anyhow::{Result, anyhow};

use crate::TunerConfig;
use crate::conditioning::ConditioningChain;

/// Preferred capture sample rate in Hz.
const TARGET_SAMPLE_RATE: u32 = 44100;

/// Starts conditioned audio capture from the default input device.
///
/// The stream callback accumulates samples, runs them through the
/// conditioning chain, and sends one `config.frame_size` frame at a time
/// down `sender` (dropping frames if the receiver falls behind, so the
/// callback never blocks).
///
/// # Returns
/// * `Ok((stream, sample_rate))` - live stream handle and its sample rate
/// * `Err(e)` - no device, no suitable format, or the stream failed
pub fn start_capture(
    sender: Sender<Vec<f32>>,
    config: TunerConfig,
) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    eprintln!("[AUDIO] Using input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

    // The nearest-match range may not contain the target rate at all;
    // clamp into it instead of letting `with_sample_rate` panic.
    let capture_rate = clamp_to_supported(
        TARGET_SAMPLE_RATE,
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let stream_config = supported_config.with_sample_rate(cpal::SampleRate(capture_rate));
    let sample_rate = stream_config.sample_rate().0;
    let stream_config: cpal::StreamConfig = stream_config.into();

    eprintln!("[AUDIO] Selected sample rate: {} Hz", sample_rate);

    let err_fn = |err| eprintln!("[AUDIO] Stream error: {}", err);

    let frame_size = config.frame_size;
    let mut chain = ConditioningChain::new(sample_rate as f32, &config);
    // Accumulates callback data until a full frame is available.
    let mut audio_buffer = Vec::with_capacity(frame_size * 2);

    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            audio_buffer.extend(data.iter().map(|&sample| chain.process(sample)));

            while audio_buffer.len() >= frame_size {
                let frame = audio_buffer[..frame_size].to_vec();
                let _ = sender.try_send(frame);
                audio_buffer.drain(..frame_size);
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Clamps the preferred rate into a device's supported range.
fn clamp_to_supported(target: u32, min_rate: u32, max_rate: u32) -> u32 {
    target.clamp(min_rate, max_rate)
}

/// Finds the input configuration closest to the target rate, restricted to
/// mono 32-bit float.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.channels() == 1 && c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min_diff = (c.min_sample_rate().0 as i32 - target_rate as i32).abs();
            let max_diff = (c.max_sample_rate().0 as i32 - target_rate as i32).abs();
            min_diff.min(max_diff)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_rate_stays_inside_the_supported_range() {
        // Ranges that contain the target keep it unchanged.
        assert_eq!(clamp_to_supported(TARGET_SAMPLE_RATE, 8000, 96000), 44100);
        // Pro-audio interfaces that start at 48 kHz get their minimum.
        assert_eq!(clamp_to_supported(TARGET_SAMPLE_RATE, 48000, 96000), 48000);
        // Telephony-grade devices capped below the target get their maximum.
        assert_eq!(clamp_to_supported(TARGET_SAMPLE_RATE, 8000, 22050), 22050);
    }
}
