//! # Note Math Module
//!
//! Pure conversions between frequency, note index, note name and cent
//! deviation, based on 12-tone equal temperament with A4 = 440 Hz.
//!
//! Note indices follow the MIDI convention: index 69 is A4, and the
//! octave number is `floor(index / 12) - 1`. Note names use solfège
//! (`Do`, `Re`, `Mi`, ...), so index 69 renders as `"La4"`.
//!
//! Rounding at exact half boundaries is round-half-away-from-zero
//! (the behavior of `f64::round`); the tests pin this choice.

use once_cell::sync::Lazy;

use crate::error::NoteError;
use crate::NoteResult;

/// Reference pitch for A4 in Hz.
pub const REFERENCE_PITCH: f32 = 440.0;

/// Note index of A4.
const A4_INDEX: i32 = 69;

/// Chromatic note names, starting at Do (C).
const NOTE_NAMES: [&str; 12] = [
    "Do", "Do#", "Re", "Re#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];

/// Lowest note index shown on the on-screen keyboard (Do3).
pub const KEYBOARD_LOW: i32 = 48;
/// Highest note index shown on the on-screen keyboard (Do6).
pub const KEYBOARD_HIGH: i32 = 84;

/// A single named note with its equal-temperament frequency.
#[derive(Debug, Clone)]
pub struct Note {
    pub index: i32,
    pub name: String,
    pub frequency: f32,
}

/// Statically computed notes for the on-screen keyboard range.
///
/// Computed once at startup; the GUI keyboard derives its key layout
/// and labels from this table.
pub static KEYBOARD_NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    (KEYBOARD_LOW..=KEYBOARD_HIGH)
        .map(|index| Note {
            index,
            name: note_index_to_name(index),
            frequency: note_index_to_frequency(index),
        })
        .collect()
});

/// Converts a frequency to the nearest equal-temperament note index.
///
/// # Errors
/// Returns [`NoteError::InvalidFrequency`] for non-positive or non-finite
/// frequencies rather than propagating a NaN index.
pub fn frequency_to_note_index(freq: f32) -> Result<i32, NoteError> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(NoteError::InvalidFrequency(freq));
    }
    let index = 12.0 * (freq as f64 / REFERENCE_PITCH as f64).log2() + A4_INDEX as f64;
    Ok(index.round() as i32)
}

/// Returns the equal-temperament frequency of a note index.
pub fn note_index_to_frequency(index: i32) -> f32 {
    REFERENCE_PITCH * 2.0_f32.powf((index - A4_INDEX) as f32 / 12.0)
}

/// Renders a note index as a solfège name plus octave number.
///
/// Uses the mathematical (always non-negative) modulo, so indices below
/// zero still map to a valid name.
pub fn note_index_to_name(index: i32) -> String {
    let name = NOTE_NAMES[index.rem_euclid(12) as usize];
    let octave = index.div_euclid(12) - 1;
    format!("{}{}", name, octave)
}

/// Calculates the deviation of `freq` from `target` in whole cents.
///
/// Positive values indicate sharpness, negative values flatness.
///
/// # Errors
/// Returns [`NoteError::InvalidFrequency`] if either frequency is
/// non-positive or non-finite.
pub fn cents_offset(freq: f32, target: f32) -> Result<i32, NoteError> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(NoteError::InvalidFrequency(freq));
    }
    if !target.is_finite() || target <= 0.0 {
        return Err(NoteError::InvalidFrequency(target));
    }
    let cents = 1200.0 * (freq as f64 / target as f64).log2();
    Ok(cents.round() as i32)
}

/// Resolves a frequency to its nearest note plus tuning offset.
///
/// The target frequency is always re-derived from the note index, so it
/// can never drift from the index it is paired with.
pub fn nearest_note(freq: f32) -> Result<NoteResult, NoteError> {
    let note_index = frequency_to_note_index(freq)?;
    let target_frequency = note_index_to_frequency(note_index);
    let cents = cents_offset(freq, target_frequency)?;
    Ok(NoteResult {
        note_index,
        note_name: note_index_to_name(note_index),
        target_frequency,
        cents_offset: cents,
    })
}
