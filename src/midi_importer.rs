use crate::model::song::*;
use crate::smf::{MetaEvent, MidiFile, ParseOptions, TextKind, TrackChunk, VoiceMessage};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// A note that has started but not yet been released.
#[derive(Debug, Clone, Copy)]
struct OpenNote {
    key: u8,
    duration_ticks: u32,
}

pub fn import_midi_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Song> {
    let bytes = fs::read(path.as_ref())
        .with_context(|| format!("Failed to read MIDI file {}", path.as_ref().display()))?;

    midi_bytes_to_song(&bytes, path.as_ref(), options)
}

pub fn midi_bytes_to_song(
    bytes: &[u8],
    source_path: &Path,
    options: &ParseOptions,
) -> Result<Song> {
    let midi = MidiFile::parse(bytes, options)
        .with_context(|| format!("Failed to decode MIDI file {}", source_path.display()))?;

    let division = midi.division();
    debug!(
        "Ticks per quarter note: {}, tick length: {}us",
        division.pulses_per_quarter_note(),
        division.tick_length()
    );

    let tracks = midi
        .tracks()
        .iter()
        .map(extract_note_commands)
        .collect::<Vec<_>>();

    Ok(Song {
        metadata: Metadata {
            title: source_path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string()),
            tempo_bpm: Some(division.tempo_bpm()),
        },
        division,
        tracks,
    })
}

/// Reduces the channel voice events of one track to a monophonic line per channel.
///
/// Each channel holds at most one open note. A note-on opens a note when the channel is
/// free, or replaces the open one when it starts at the same tick (delta 0) on a higher key;
/// otherwise it is ignored. A note-off for the open key finishes it. Every event's delta time
/// is added to all open notes, whatever channel it targets. Notes still open at the end of
/// the track are dropped.
pub fn extract_note_commands(track: &TrackChunk) -> TrackCommands {
    let mut channels: [Channel; CHANNEL_COUNT] = Default::default();
    let mut open: [Option<OpenNote>; CHANNEL_COUNT] = [None; CHANNEL_COUNT];

    for timed in track.voice_events() {
        let delta = timed.delta_time;

        for note in open.iter_mut().flatten() {
            note.duration_ticks = note.duration_ticks.saturating_add(delta);
        }

        let channel = (timed.event.channel & 0x0F) as usize;
        let slot = &mut open[channel];

        match timed.event.message {
            VoiceMessage::NoteOn { key, .. } => match *slot {
                None => {
                    *slot = Some(OpenNote {
                        key,
                        duration_ticks: 0,
                    })
                }
                Some(current) if delta == 0 && key > current.key => {
                    debug!(
                        "Channel {} chord: {} replaces {} in track '{}'",
                        channel,
                        key,
                        current.key,
                        track.name()
                    );
                    *slot = Some(OpenNote {
                        key,
                        duration_ticks: 0,
                    })
                }
                Some(_) => {}
            },
            VoiceMessage::NoteOff { key, .. } => {
                if let Some(current) = *slot
                    && current.key == key
                {
                    channels[channel].commands.push(NoteCommand {
                        key,
                        duration_ticks: current.duration_ticks,
                    });
                    *slot = None;
                }
            }
            VoiceMessage::PolyPressure { .. }
            | VoiceMessage::Controller { .. }
            | VoiceMessage::ProgramChange { .. }
            | VoiceMessage::ChannelPressure { .. }
            | VoiceMessage::PitchBend { .. } => {}
        }
    }

    let dropped = open.iter().flatten().count();
    if dropped > 0 {
        warn!(
            "Dropping {} unterminated note(s) at the end of track '{}'..!",
            dropped,
            track.name()
        );
    }

    name_channels(track, &mut channels);

    TrackCommands {
        name: track.name().to_owned(),
        channels,
    }
}

/// Gives a channel the name of an instrument name event directly preceded by a channel
/// prefix for it. The very first meta event of the track is never a candidate.
fn name_channels(track: &TrackChunk, channels: &mut [Channel; CHANNEL_COUNT]) {
    for pair in track.meta_events().windows(2) {
        let (MetaEvent::MidiChannelPrefix(prefix), Some(name)) =
            (&pair[0].event, pair[1].event.text_of(TextKind::InstrumentName))
        else {
            continue;
        };

        match channels.get_mut(*prefix as usize) {
            Some(channel) => channel.name = Some(name.to_owned()),
            None => warn!(
                "Ignoring instrument '{}' for out of range channel prefix {}..!",
                name, prefix
            ),
        }
    }
}
