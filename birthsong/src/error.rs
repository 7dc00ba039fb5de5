// Error types for the melody core and its file collaborators.
//
// `MelodyError` covers the three failures the core can report: sampling from
// an empty distribution, falling back on a model with no tokens, and a
// birthday that does not parse or is out of range. None of them is recovered
// from inside the crate; the caller decides what to do.
//
// Corpus loading deliberately has no error type here: a missing corpus is an
// empty corpus (see `corpus.rs`).

use thiserror::Error;

/// Failures of the core model, sampler, deriver and generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MelodyError {
    #[error("cannot sample from an empty weight distribution")]
    EmptyDistribution,
    #[error("transition model has no tokens to fall back on")]
    ModelEmpty,
    #[error("invalid birthday '{input}': {reason}")]
    InvalidBirthdayFormat { input: String, reason: String },
}

impl MelodyError {
    pub(crate) fn birthday(input: impl Into<String>, reason: impl Into<String>) -> Self {
        MelodyError::InvalidBirthdayFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// A token that does not name a MIDI pitch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteNameError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter in '{0}'")]
    UnknownLetter(String),
    #[error("missing or malformed octave in '{0}'")]
    BadOctave(String),
    #[error("'{name}' resolves to MIDI pitch {pitch}, outside 0..=127")]
    OutOfRange { name: String, pitch: i32 },
}

/// Failures while rendering a melody to a Standard MIDI File.
#[derive(Debug, Error)]
pub enum MidiWriteError {
    #[error("token {index} of the melody is not a note: {source}")]
    BadToken {
        index: usize,
        #[source]
        source: NoteNameError,
    },
    #[error("tempo must be between 4 and 60000000 bpm, got {0}")]
    BadTempo(u32),
    #[error("{field} = {value} does not fit in a MIDI file")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("failed to write MIDI file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures loading a `ComposerConfig` or a saved model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
