// Composer configuration.
//
// Everything the `compose` binary would otherwise hard-code lives in
// `ComposerConfig`: where the corpus is read from, where output goes, and
// how a melody is rendered to MIDI. Loaded from JSON; every field has a
// default, so a partial file (or no file at all) is valid.
//
// The birthday -> parameters mapping is deliberately NOT configurable; see
// `birthday.rs`.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a melody is laid out as MIDI events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Tempo in quarter notes per minute.
    pub tempo_bpm: u32,
    /// MIDI timing resolution.
    pub ticks_per_quarter: u16,
    /// Duration of every note. The default (one quarter at 120 bpm) is half
    /// a second.
    pub note_ticks: u32,
    /// Note-on velocity, 1..=127.
    pub velocity: u8,
    /// General MIDI program number (0 = acoustic grand piano).
    pub program: u8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tempo_bpm: 120,
            ticks_per_quarter: 480,
            note_ticks: 480,
            velocity: 100,
            program: 0,
        }
    }
}

/// Top-level configuration for a composing run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Whitespace-separated melodies, one per line.
    pub text_corpus: PathBuf,
    /// Folder of `.mid` files to extract melodies from.
    pub midi_corpus_dir: PathBuf,
    /// Root directory for per-birthday output folders.
    pub output_dir: PathBuf,
    pub render: RenderSettings,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            text_corpus: PathBuf::from("data/melodies.txt"),
            midi_corpus_dir: PathBuf::from("data/nesmdb_midi"),
            output_dir: PathBuf::from("output"),
            render: RenderSettings::default(),
        }
    }
}

impl ComposerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| LoadError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}
