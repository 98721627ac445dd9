//! # Error Types
//!
//! Typed errors for the pitch pipeline. These cover *contract violations*
//! only: a frame with no detectable pitch is a normal `None` result and is
//! never routed through this module.

use thiserror::Error;

/// Errors raised by the pitch estimator for malformed input.
///
/// These indicate a bug in the caller (wrong frame geometry), not a
/// property of the signal, and are never produced for silence or noise.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PitchError {
    /// The frame handed to the estimator was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// Errors raised by the note math for out-of-domain frequencies.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NoteError {
    /// Note and cent calculations are only defined for positive, finite
    /// frequencies.
    #[error("invalid frequency: {0} Hz")]
    InvalidFrequency(f32),
}

/// Union of the pipeline's contract errors, as surfaced by a tick.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TunerError {
    #[error(transparent)]
    Pitch(#[from] PitchError),
    #[error(transparent)]
    Note(#[from] NoteError),
}
