// MIDI output for generated melodies.
//
// Renders a `Melody` as a single-track Standard MIDI File (format 0): a
// tempo event, a program change, then one note per token, back to back, all
// with the same duration and velocity from `RenderSettings`.
//
// Every token must name a pitch (see `pitch.rs`). A token that does not is an
// error carrying its index; nothing is skipped.
//
// Uses the `midly` crate for the SMF encoding.

use crate::config::RenderSettings;
use crate::error::MidiWriteError;
use crate::pitch::note_name_to_midi;
use crate::token::Melody;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

const CHANNEL: u8 = 0;
const TRACK_NAME: &str = "Birthday melody";

/// Largest value a u28 delta-time can hold.
const MAX_DELTA: u32 = (1 << 28) - 1;

/// Render `melody` and write it to `path`, creating parent directories.
pub fn write_melody_midi(
    melody: &Melody,
    settings: &RenderSettings,
    path: &Path,
) -> Result<(), MidiWriteError> {
    let smf = melody_to_smf(melody, settings)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &buf)?;
    tracing::info!(path = %path.display(), notes = melody.len(), "MIDI file written");
    Ok(())
}

/// Build the in-memory SMF for a melody.
pub fn melody_to_smf(
    melody: &Melody,
    settings: &RenderSettings,
) -> Result<Smf<'static>, MidiWriteError> {
    check_settings(settings)?;

    let pitches = melody
        .tokens()
        .iter()
        .enumerate()
        .map(|(index, token)| {
            note_name_to_midi(token.as_str()).map_err(|source| MidiWriteError::BadToken { index, source })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(settings.ticks_per_quarter)),
    ));

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = Vec::with_capacity(pitches.len() * 2 + 4);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(TRACK_NAME.as_bytes())),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(60_000_000 / settings.tempo_bpm))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(settings.program),
            },
        },
    });

    for &pitch in &pitches {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(pitch),
                    vel: u7::new(settings.velocity),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(settings.note_ticks),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(pitch),
                    vel: u7::new(0),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    Ok(smf)
}

fn check_settings(settings: &RenderSettings) -> Result<(), MidiWriteError> {
    // Below 4 bpm the microseconds-per-quarter no longer fits in 24 bits.
    if !(4..=60_000_000).contains(&settings.tempo_bpm) {
        return Err(MidiWriteError::BadTempo(settings.tempo_bpm));
    }
    let checks: [(&'static str, u32, u32, u32); 4] = [
        ("ticks_per_quarter", settings.ticks_per_quarter.into(), 1, 0x7fff),
        ("note_ticks", settings.note_ticks, 1, MAX_DELTA),
        ("velocity", settings.velocity.into(), 1, 127),
        ("program", settings.program.into(), 0, 127),
    ];
    for (field, value, low, high) in checks {
        if !(low..=high).contains(&value) {
            return Err(MidiWriteError::OutOfRange { field, value });
        }
    }
    Ok(())
}
