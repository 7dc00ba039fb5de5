// Training corpus loading.
//
// Two sources feed the transition model:
// - a text file with one melody per line, note tokens separated by
//   whitespace (`load_text_corpus`, written back by `save_melodies`);
// - a folder of Standard MIDI Files, from each of which the busiest
//   non-percussion (track, channel) voice is extracted as a melody
//   (`extract_midi_folder`).
//
// Absence is not an error here. A missing text file or MIDI folder yields an
// empty corpus and a warning, and a MIDI file that fails to read or parse is
// skipped with a warning. An empty corpus is a legitimate (if useless)
// starting point for the model. This is the only place in the crate where
// failures are logged and swallowed.

use crate::pitch::midi_to_note_name;
use crate::token::{Melody, Sequence, Token};
use midly::{MidiMessage, Smf, TrackEventKind};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// MIDI channel 10, reserved for percussion in General MIDI.
const PERCUSSION_CHANNEL: u8 = 9;

/// Read melodies from a whitespace-separated text file, one per line.
///
/// Blank lines are skipped. A missing or unreadable file gives an empty list.
pub fn load_text_corpus(path: &Path) -> Vec<Sequence> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "text corpus not readable, using none");
            return Vec::new();
        }
    };
    let melodies = parse_text_corpus(&text);
    tracing::info!(path = %path.display(), melodies = melodies.len(), "loaded text corpus");
    melodies
}

/// Parse the text corpus format from a string.
pub fn parse_text_corpus(text: &str) -> Vec<Sequence> {
    text.lines()
        .map(|line| line.split_whitespace().map(Token::from).collect::<Sequence>())
        .filter(|seq| !seq.is_empty())
        .collect()
}

/// Write melodies in the text corpus format, creating parent directories.
pub fn save_melodies<'a, I>(path: &Path, melodies: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a [Token]>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for melody in melodies {
        let line: Vec<&str> = melody.iter().map(Token::as_str).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    file.flush()?;
    tracing::info!(path = %path.display(), "saved melodies");
    Ok(())
}

/// Save a single generated melody.
pub fn save_melody(path: &Path, melody: &Melody) -> std::io::Result<()> {
    save_melodies(path, [melody.tokens()])
}

/// Extract one melody from every `.mid`/`.midi` file in `dir`.
///
/// Files are visited in file-name order so the corpus, and therefore any
/// seeded output, does not depend on directory listing order.
pub fn extract_midi_folder(dir: &Path) -> Vec<Sequence> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "MIDI corpus folder not readable, using none");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_midi_file(p))
        .collect();
    paths.sort();

    let mut melodies = Vec::new();
    for path in &paths {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipped unreadable MIDI file");
                continue;
            }
        };
        match extract_midi_melody(&bytes) {
            Ok(Some(melody)) => {
                tracing::debug!(path = %path.display(), notes = melody.len(), "extracted melody");
                melodies.push(melody);
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no pitched notes, skipped");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipped malformed MIDI file");
            }
        }
    }
    tracing::info!(
        dir = %dir.display(),
        files = paths.len(),
        melodies = melodies.len(),
        "extracted MIDI corpus"
    );
    melodies
}

fn is_midi_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mid") || ext.eq_ignore_ascii_case("midi"))
}

/// Pull the dominant melodic line out of one SMF.
///
/// Note-ons (velocity > 0) are grouped by (track, channel); percussion is
/// ignored. The group with the most notes wins, the earliest group on a tie.
/// `Ok(None)` means the file has no pitched notes.
pub fn extract_midi_melody(bytes: &[u8]) -> Result<Option<Sequence>, midly::Error> {
    let smf = Smf::parse(bytes)?;

    let mut voices: BTreeMap<(usize, u8), Vec<u8>> = BTreeMap::new();
    for (track_index, track) in smf.tracks.iter().enumerate() {
        for event in track {
            if let TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel },
            } = event.kind
            {
                let channel = channel.as_int();
                if channel != PERCUSSION_CHANNEL && vel.as_int() > 0 {
                    voices.entry((track_index, channel)).or_default().push(key.as_int());
                }
            }
        }
    }

    let mut best: Option<&Vec<u8>> = None;
    for notes in voices.values() {
        if best.is_none_or(|b| notes.len() > b.len()) {
            best = Some(notes);
        }
    }

    Ok(best.map(|pitches| {
        pitches
            .iter()
            .map(|&p| Token::new(midi_to_note_name(p)))
            .collect()
    }))
}

/// Everything the model is trained on, by source.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub text: Vec<Sequence>,
    pub midi: Vec<Sequence>,
}

impl Corpus {
    /// Load both sources. Either may come back empty.
    pub fn load(text_path: &Path, midi_dir: &Path) -> Self {
        Corpus {
            text: load_text_corpus(text_path),
            midi: extract_midi_folder(midi_dir),
        }
    }

    /// All melodies, text first, then MIDI.
    pub fn sequences(&self) -> impl Iterator<Item = &[Token]> {
        self.text.iter().chain(&self.midi).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.midi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
