//! `MTrk` chunks: framing, event decoding and the per-category event lists

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::channel::ChannelVoiceEvent;
use super::error::{MidiError, MidiResult};
use super::event::{Event, EventDecoder, Timed};
use super::meta::{MetaEvent, TextKind};

/// Identifier every track chunk starts with
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Name given to tracks without a track name event
pub const UNNAMED_TRACK: &str = "no name";

/// A decoded track chunk
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackChunk {
    /// Byte length declared in the chunk header
    length: u32,
    /// Every event in file order
    events: Vec<Timed<Event>>,
    /// The channel voice events, in file order
    voice_events: Vec<Timed<ChannelVoiceEvent>>,
    /// The meta events, in file order
    meta_events: Vec<Timed<MetaEvent>>,
    /// Text of the first track name event
    name: String,
}

impl TrackChunk {
    /// Decodes the track chunk starting at the cursor.
    ///
    /// With `strict_length` a track whose events do not end exactly at its declared length
    /// is an error; otherwise the mismatch is logged and the cursor is moved to the declared
    /// end of the chunk.
    pub fn parse(
        cursor: &mut ByteCursor<'_>,
        index: usize,
        strict_length: bool,
    ) -> MidiResult<Self> {
        let magic_position = cursor.position();
        if !cursor.expect_magic(TRACK_MAGIC)? {
            return Err(MidiError::BadMagic {
                position: magic_position,
                expected: "MTrk",
            });
        }

        let length = cursor.read_u32_be()?;
        let start = cursor.position();
        let declared_end = start + length as usize;

        let mut decoder = EventDecoder::new();
        let mut track = Self {
            length,
            events: Vec::new(),
            voice_events: Vec::new(),
            meta_events: Vec::new(),
            name: UNNAMED_TRACK.to_owned(),
        };
        let mut named = false;

        while cursor.position() - start < length as usize {
            let decoded = decoder.decode_next(cursor)?;
            let Timed { delta_time, event } = decoded.event;

            match &event {
                Event::ChannelVoice(voice) => {
                    track.voice_events.push(Timed::new(delta_time, *voice));
                }
                Event::Meta(meta) => {
                    if !named && let Some(name) = meta.text_of(TextKind::TrackName) {
                        track.name = name.to_owned();
                        named = true;
                    }
                    track.meta_events.push(Timed::new(delta_time, meta.clone()));
                }
                Event::SysEx(_) => {}
            }

            track.events.push(Timed::new(delta_time, event));
        }

        let consumed = cursor.position() - start;
        if consumed != length as usize {
            if strict_length {
                return Err(MidiError::TrackLengthMismatch {
                    track: index,
                    declared: length,
                    consumed,
                });
            }

            warn!(
                "Track {} declares {} bytes but its events used {}, resuming at its end..!",
                index, length, consumed
            );
            cursor.seek(declared_end)?;
        }

        debug!(
            "Track {} '{}': {} bytes, {} events ({} channel voice, {} meta)",
            index,
            track.name,
            length,
            track.events.len(),
            track.voice_events.len(),
            track.meta_events.len()
        );

        Ok(track)
    }

    /// Byte length declared in the chunk header
    pub fn len(&self) -> u32 {
        self.length
    }

    /// True if the chunk declared no data
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Every event in file order
    pub fn events(&self) -> &[Timed<Event>] {
        &self.events
    }

    /// The channel voice events in file order
    pub fn voice_events(&self) -> &[Timed<ChannelVoiceEvent>] {
        &self.voice_events
    }

    /// The meta events in file order
    pub fn meta_events(&self) -> &[Timed<MetaEvent>] {
        &self.meta_events
    }

    /// The first track name, or `"no name"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tempo of the first tempo event in this track
    pub fn first_tempo(&self) -> Option<u32> {
        self.meta_events.iter().find_map(|meta| match meta.event {
            MetaEvent::Tempo(tempo) => Some(tempo),
            _ => None,
        })
    }
}
