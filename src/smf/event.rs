//! Track events: delta times, running status and dispatch to the per-category decoders

use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::channel::{ChannelVoiceEvent, decode_channel_voice};
use super::error::{MidiError, MidiResult};
use super::meta::{MetaEvent, decode_meta};
use super::sysex::{SysExEvent, decode_sysex};

/// Any event found in a track
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A channel voice event
    ChannelVoice(ChannelVoiceEvent),
    /// A system exclusive event or escape sequence
    SysEx(SysExEvent),
    /// Specifies non-MIDI information useful to this format or to sequencers
    Meta(MetaEvent),
}

/// Which decoder produced an event
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    ChannelVoice,
    SysEx,
    Meta,
}

impl Event {
    /// The category this event belongs to
    pub fn category(&self) -> EventCategory {
        match self {
            Self::ChannelVoice(_) => EventCategory::ChannelVoice,
            Self::SysEx(_) => EventCategory::SysEx,
            Self::Meta(_) => EventCategory::Meta,
        }
    }
}

/// An event paired with the ticks elapsed since the previous event of the same track
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Timed<T> {
    /// Ticks to wait before this event
    pub delta_time: u32,
    /// The event itself
    pub event: T,
}

impl<T> Timed<T> {
    /// Pairs an event with its delta time
    pub fn new(delta_time: u32, event: T) -> Self {
        Self { delta_time, event }
    }
}

/// One event as it was read from the track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// The event and its delta time
    pub event: Timed<Event>,
    /// The category of `event`
    pub category: EventCategory,
    /// Status byte the event was decoded with, explicit or running
    pub status: u8,
}

/// Decodes the events of one track in order, remembering the last status byte so running
/// status can be resolved
#[derive(Debug, Clone, Default)]
pub struct EventDecoder {
    /// Status byte of the previous event, `None` at the start of a track
    last_status: Option<u8>,
}

impl EventDecoder {
    /// A decoder for a fresh track
    pub fn new() -> Self {
        Self::default()
    }

    /// The status byte that a running status data byte would reuse
    pub fn last_status(&self) -> Option<u8> {
        self.last_status
    }

    /// Reads the next event from the cursor
    pub fn decode_next(&mut self, cursor: &mut ByteCursor<'_>) -> MidiResult<DecodedEvent> {
        let decoded = decode_event(cursor, self.last_status)?;
        self.last_status = Some(decoded.status);
        Ok(decoded)
    }
}

/// Reads one event: its delta time, its status byte (or the running one) and its body.
///
/// A byte below `0x80` where the status should be is the first data byte of an event that
/// reuses `last_status`; it is left unread for the body decoder.
pub fn decode_event(
    cursor: &mut ByteCursor<'_>,
    last_status: Option<u8>,
) -> MidiResult<DecodedEvent> {
    let delta_time = cursor.read_vlq()?;
    let status_position = cursor.position();
    let candidate = cursor.peek_u8()?;

    let status = if candidate < 0x80 {
        last_status.ok_or(MidiError::RunningStatusWithoutStatus {
            position: status_position,
        })?
    } else {
        cursor.read_u8()?
    };

    let event = match status {
        0x80..=0xEF => Event::ChannelVoice(decode_channel_voice(cursor, status)?),
        0xF0 | 0xF7 => Event::SysEx(decode_sysex(cursor, status)?),
        0xFF => Event::Meta(decode_meta(cursor)?),
        _ => {
            return Err(MidiError::UnknownStatus {
                position: status_position,
                status,
            });
        }
    };

    Ok(DecodedEvent {
        category: event.category(),
        event: Timed::new(delta_time, event),
        status,
    })
}
