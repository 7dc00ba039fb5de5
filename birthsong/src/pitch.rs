// Note name <-> MIDI pitch conversion.
//
// Names follow scientific pitch notation with middle C (MIDI 60) as "C4".
// MIDI -> name always spells black keys with sharps ("C#4", never "Db4"), so
// corpus tokens extracted from MIDI files have one canonical spelling. Name
// -> MIDI accepts any number of '#' or 'b' accidentals and negative octaves
// ("C-1" is MIDI 0).

use crate::error::NoteNameError;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone offset of a natural note letter within its octave.
fn letter_semitone(letter: char) -> Option<i32> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Name a MIDI pitch, e.g. 60 -> "C4", 61 -> "C#4", 0 -> "C-1".
pub fn midi_to_note_name(pitch: u8) -> String {
    let octave = i32::from(pitch) / 12 - 1;
    format!("{}{}", SHARP_NAMES[usize::from(pitch % 12)], octave)
}

/// Parse a note name into a MIDI pitch.
pub fn note_name_to_midi(name: &str) -> Result<u8, NoteNameError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or(NoteNameError::Empty)?;
    let mut semitone =
        letter_semitone(letter).ok_or_else(|| NoteNameError::UnknownLetter(trimmed.to_string()))?;

    let rest = chars.as_str();
    let octave_start = rest
        .find(|c: char| c != '#' && c != 'b')
        .unwrap_or(rest.len());
    let (accidentals, octave_text) = rest.split_at(octave_start);
    for acc in accidentals.chars() {
        semitone += if acc == '#' { 1 } else { -1 };
    }

    let octave: i32 = octave_text
        .parse()
        .map_err(|_| NoteNameError::BadOctave(trimmed.to_string()))?;
    let pitch = (octave + 1) * 12 + semitone;
    u8::try_from(pitch)
        .ok()
        .filter(|&p| p <= 127)
        .ok_or(NoteNameError::OutOfRange {
            name: trimmed.to_string(),
            pitch,
        })
}
