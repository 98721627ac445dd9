use tuner_core::TunerConfig;
use tuner_core::history::HistoryBuffer;
use tuner_core::note;
use tuner_core::pitch::PitchEstimator;
use tuner_core::session::{SessionState, TunerSession};
use tuner_core::smoother::PitchSmoother;

const SAMPLE_RATE: u32 = 44100;
const FRAME_SIZE: usize = 4096;

fn sine(frequency: f32, amplitude: f32) -> Vec<f32> {
    (0..FRAME_SIZE)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

fn square(frequency: f32, amplitude: f32) -> Vec<f32> {
    sine(frequency, 1.0)
        .into_iter()
        .map(|s| if s >= 0.0 { amplitude } else { -amplitude })
        .collect()
}

/// Runs the estimator alone on a pure tone and checks the estimate.
fn pure_frequency(signal: Vec<f32>, expected: f32, tolerance: f32) {
    let estimator = PitchEstimator::new(&TunerConfig::default());
    let freq = estimator
        .estimate(&signal, SAMPLE_RATE)
        .unwrap()
        .unwrap_or_else(|| panic!("expected a pitch near {expected} Hz"));
    assert!(
        (freq - expected).abs() < tolerance,
        "expected {expected} Hz, estimated {freq} Hz"
    );
}

#[test]
fn sin_440() {
    pure_frequency(sine(440.0, 0.5), 440.0, 0.5);
}

#[test]
fn sin_220() {
    pure_frequency(sine(220.0, 0.5), 220.0, 0.5);
}

#[test]
fn sin_880() {
    pure_frequency(sine(880.0, 0.5), 880.0, 1.0);
}

#[test]
fn square_330() {
    // A square wave is harmonically rich but strictly periodic; the
    // autocorrelation peak still lands on the fundamental.
    pure_frequency(square(330.0, 0.5), 330.0, 2.0);
}

#[test]
fn silence_and_sub_threshold_content_yield_none() {
    let estimator = PitchEstimator::new(&TunerConfig::default());
    assert_eq!(
        estimator.estimate(&vec![0.0; FRAME_SIZE], SAMPLE_RATE).unwrap(),
        None
    );
    // Periodic content below the RMS gate is still silence.
    assert_eq!(
        estimator.estimate(&sine(440.0, 0.01), SAMPLE_RATE).unwrap(),
        None
    );
}

#[test]
fn out_of_range_tones_yield_none() {
    let estimator = PitchEstimator::new(&TunerConfig::default());
    assert_eq!(estimator.estimate(&sine(50.0, 0.5), SAMPLE_RATE).unwrap(), None);
    assert_eq!(estimator.estimate(&sine(2000.0, 0.5), SAMPLE_RATE).unwrap(), None);
}

#[test]
fn full_pipeline_resolves_la4() {
    let mut session = TunerSession::new(TunerConfig::default());
    let tone = sine(440.0, 0.5);

    // A few frames so the smoother settles on the constant estimate.
    let mut tick = session.process_frame(&tone, SAMPLE_RATE).unwrap();
    for _ in 0..4 {
        tick = session.process_frame(&tone, SAMPLE_RATE).unwrap();
    }

    let freq = tick.smoothed_frequency.unwrap();
    assert!((freq - 440.0).abs() < 0.5, "smoothed {freq} Hz");

    let note = tick.note.unwrap();
    assert_eq!(note.note_index, 69);
    assert_eq!(note.note_name, "La4");
    assert!((-2..=2).contains(&note.cents_offset), "cents {}", note.cents_offset);
}

#[test]
fn note_round_trip_over_the_piano() {
    for n in 21..=108 {
        let freq = note::note_index_to_frequency(n);
        assert_eq!(note::frequency_to_note_index(freq).unwrap(), n);
    }
}

#[test]
fn smoother_ignores_interleaved_silence() {
    // Alternating estimate/silence: the session never feeds `None` to the
    // smoother, so after the first estimate the value stays fixed.
    let mut session = TunerSession::new(TunerConfig::default());
    let tone = sine(440.0, 0.5);
    let silence = vec![0.0; FRAME_SIZE];

    let first = session
        .process_frame(&tone, SAMPLE_RATE)
        .unwrap()
        .smoothed_frequency
        .unwrap();
    let after_silence = session
        .process_frame(&silence, SAMPLE_RATE)
        .unwrap()
        .smoothed_frequency
        .unwrap();
    assert_eq!(first, after_silence);
}

#[test]
fn smoother_convergence_bound() {
    let alpha = 0.2f32;
    let mut smoother = PitchSmoother::new(alpha);
    smoother.update(100.0);

    let target = 440.0f32;
    let initial_error = (target - 100.0f32).abs();
    let bound = ((0.01 / initial_error).ln() / (1.0 - alpha).ln()).ceil() as usize;
    for _ in 0..bound {
        smoother.update(target);
    }
    let current = smoother.current().unwrap();
    assert!((current - target).abs() <= 0.01, "settled at {current}");
}

#[test]
fn history_keeps_the_last_800_in_order() {
    let config = TunerConfig::default();
    let mut history = HistoryBuffer::new(config.history_len);
    for i in 0..=800 {
        history.push(Some(i as f32));
    }
    assert_eq!(history.len(), 800);
    let first = history.iter().next().unwrap();
    assert_eq!(first, Some(1.0));
    let last = history.iter().last().unwrap();
    assert_eq!(last, Some(800.0));
}

#[test]
fn stopping_an_idle_session_is_harmless() {
    let mut session = TunerSession::new(TunerConfig::default());
    session.stop();
    session.stop();
    assert_eq!(session.state(), SessionState::Idle);
}
