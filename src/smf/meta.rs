//! Meta events (status `0xFF`): tempo, names, signatures and other non-MIDI track data

use log::warn;
use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::error::{MidiError, MidiResult};

/// The text-carrying meta event types, tags `0x01` through `0x09`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Tag 0x01
    Text,
    /// Tag 0x02
    Copyright,
    /// Tag 0x03, sequence or track name
    TrackName,
    /// Tag 0x04
    InstrumentName,
    /// Tag 0x05
    Lyric,
    /// Tag 0x06
    Marker,
    /// Tag 0x07
    CuePoint,
    /// Tag 0x08
    ProgramName,
    /// Tag 0x09
    DeviceName,
}

impl TextKind {
    /// Maps a meta type byte onto its text kind
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0x01 => Self::Text,
            0x02 => Self::Copyright,
            0x03 => Self::TrackName,
            0x04 => Self::InstrumentName,
            0x05 => Self::Lyric,
            0x06 => Self::Marker,
            0x07 => Self::CuePoint,
            0x08 => Self::ProgramName,
            0x09 => Self::DeviceName,
            _ => return None,
        })
    }
}

/// A meta level event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent {
    /// Tag 0x00
    SequenceNumber(u16),
    /// Tags 0x01..=0x09
    Text { kind: TextKind, text: String },
    /// Tag 0x20, channel the following meta events refer to
    MidiChannelPrefix(u8),
    /// Tag 0x21
    MidiPort(u8),
    /// Tag 0x2F
    EndOfTrack,
    /// Tag 0x51, microseconds per quarter note
    Tempo(u32),
    /// Tag 0x54
    SmpteOffset(SmpteOffset),
    /// Tag 0x58
    TimeSignature(TimeSignature),
    /// Tag 0x59
    KeySignature(KeySignature),
    /// Tag 0x7F
    SequencerSpecific(Vec<u8>),
}

impl MetaEvent {
    /// The text of a text meta event of the given kind
    pub fn text_of(&self, wanted: TextKind) -> Option<&str> {
        match self {
            Self::Text { kind, text } if *kind == wanted => Some(text),
            _ => None,
        }
    }
}

/// An SMPTE Offset
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmpteOffset {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
    /// Hundredths of a frame
    pub fractional_frame: u8,
}

/// A Time Signature, stored as the raw bytes of the event
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u8,
    /// Power of two, 2 means a quarter note
    pub denominator: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes in a MIDI quarter note
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// The denominator as it is written in the score
    pub fn denominator_value(&self) -> u32 {
        1u32.checked_shl(self.denominator as u32).unwrap_or(0)
    }
}

/// A key signature
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    /// Raw sharps/flats byte, read as `i8` by [`KeySignature::sharps_flats`]
    pub key: u8,
    /// 0 for major, 1 for minor
    pub scale: u8,
}

impl KeySignature {
    /// Positive for sharps, negative for flats
    pub fn sharps_flats(&self) -> i8 {
        self.key as i8
    }

    /// True for a minor key
    pub fn is_minor(&self) -> bool {
        self.scale != 0
    }
}

/// Decodes a meta event. The cursor must sit just after the `0xFF` status byte.
///
/// Fixed layouts read exactly their own size whatever the declared length says; only text
/// and sequencer specific payloads use the declared length.
pub fn decode_meta(cursor: &mut ByteCursor<'_>) -> MidiResult<MetaEvent> {
    let type_position = cursor.position();
    let meta_type = cursor.read_u8()?;
    let length = cursor.read_vlq()? as usize;

    if let Some(kind) = TextKind::from_tag(meta_type) {
        let text = String::from_utf8_lossy(cursor.read_bytes(length)?).into_owned();
        return Ok(MetaEvent::Text { kind, text });
    }

    let fixed_len = match meta_type {
        0x00 => 2,
        0x20 | 0x21 => 1,
        0x2F => 0,
        0x51 => 3,
        0x54 => 5,
        0x58 => 4,
        0x59 => 2,
        0x7F => length,
        _ => {
            return Err(MidiError::UnknownMetaType {
                position: type_position,
                meta_type,
            });
        }
    };

    if fixed_len != length {
        warn!(
            "Meta event {:#04X} at byte {} declares {} byte(s), reading its fixed {}..!",
            meta_type, type_position, length, fixed_len
        );
    }

    let event = match meta_type {
        0x00 => MetaEvent::SequenceNumber(cursor.read_u16_be()?),
        0x20 => MetaEvent::MidiChannelPrefix(cursor.read_u8()?),
        0x21 => MetaEvent::MidiPort(cursor.read_u8()?),
        0x2F => MetaEvent::EndOfTrack,
        0x51 => MetaEvent::Tempo(cursor.read_u24_be()?),
        0x54 => {
            let [hour, minute, second, frame, fractional_frame] = read_fixed(cursor)?;
            MetaEvent::SmpteOffset(SmpteOffset {
                hour,
                minute,
                second,
                frame,
                fractional_frame,
            })
        }
        0x58 => {
            let [numerator, denominator, clocks_per_click, thirty_seconds_per_quarter] =
                read_fixed(cursor)?;
            MetaEvent::TimeSignature(TimeSignature {
                numerator,
                denominator,
                clocks_per_click,
                thirty_seconds_per_quarter,
            })
        }
        0x59 => {
            let [key, scale] = read_fixed(cursor)?;
            MetaEvent::KeySignature(KeySignature { key, scale })
        }
        _ => MetaEvent::SequencerSpecific(cursor.read_bytes(length)?.to_vec()),
    };

    Ok(event)
}

/// Reads a fixed number of payload bytes
fn read_fixed<const N: usize>(cursor: &mut ByteCursor<'_>) -> MidiResult<[u8; N]> {
    let mut fields = [0u8; N];
    fields.copy_from_slice(cursor.read_bytes(N)?);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{KeySignature, MetaEvent, SmpteOffset, TextKind, TimeSignature, decode_meta};
    use crate::smf::bytes::ByteCursor;
    use crate::smf::error::MidiError;

    /// Decodes bytes that follow the 0xFF status, checking they are all consumed
    fn decode(data: &[u8]) -> MetaEvent {
        let mut cursor = ByteCursor::new(data);
        let event = decode_meta(&mut cursor).expect("Decode meta event");
        assert!(cursor.is_empty(), "Meta event left {} byte(s)", cursor.remaining());
        event
    }

    #[test]
    fn test_sequence_number() {
        assert_eq!(decode(&[0x00, 0x02, 0x00, 0x01]), MetaEvent::SequenceNumber(1));
    }

    #[test]
    fn test_text_kinds() {
        assert_eq!(
            decode(&[0x01, 0x05, b'H', b'e', b'l', b'l', b'o']),
            MetaEvent::Text {
                kind: TextKind::Text,
                text: "Hello".to_string()
            }
        );
        assert_eq!(
            decode(&[0x03, 0x04, b'L', b'e', b'a', b'd']),
            MetaEvent::Text {
                kind: TextKind::TrackName,
                text: "Lead".to_string()
            }
        );
        assert_eq!(
            decode(&[0x09, 0x02, b'G', b'S']),
            MetaEvent::Text {
                kind: TextKind::DeviceName,
                text: "GS".to_string()
            }
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(
            decode(&[0x04, 0x00]),
            MetaEvent::Text {
                kind: TextKind::InstrumentName,
                text: String::new()
            }
        );
    }

    #[test]
    fn test_text_of_only_matches_its_kind() {
        let event = decode(&[0x04, 0x05, b'P', b'i', b'a', b'n', b'o']);
        assert_eq!(event.text_of(TextKind::InstrumentName), Some("Piano"));
        assert_eq!(event.text_of(TextKind::TrackName), None);
    }

    #[test]
    fn test_channel_prefix_and_port() {
        assert_eq!(decode(&[0x20, 0x01, 0x05]), MetaEvent::MidiChannelPrefix(5));
        assert_eq!(decode(&[0x21, 0x01, 0x02]), MetaEvent::MidiPort(2));
    }

    #[test]
    fn test_end_of_track() {
        assert_eq!(decode(&[0x2F, 0x00]), MetaEvent::EndOfTrack);
    }

    #[test]
    fn test_tempo_event() {
        assert_eq!(decode(&[0x51, 0x03, 0x07, 0xA1, 0x20]), MetaEvent::Tempo(500_000));
    }

    #[test]
    fn test_smpte_offset_event() {
        assert_eq!(
            decode(&[0x54, 0x05, 0x01, 0x20, 0x15, 0x10, 0x00]),
            MetaEvent::SmpteOffset(SmpteOffset {
                hour: 1,
                minute: 32,
                second: 21,
                frame: 16,
                fractional_frame: 0,
            })
        );
    }

    #[test]
    fn test_time_signature_event() {
        let event = decode(&[0x58, 0x04, 0x06, 0x03, 0x24, 0x08]);
        let MetaEvent::TimeSignature(signature) = event else {
            panic!("Expected a time signature, got {event:?}");
        };

        assert_eq!(
            signature,
            TimeSignature {
                numerator: 6,
                denominator: 3,
                clocks_per_click: 36,
                thirty_seconds_per_quarter: 8,
            }
        );
        assert_eq!(signature.denominator_value(), 8);
    }

    #[test]
    fn test_key_signature_event() {
        let event = decode(&[0x59, 0x02, 0xFD, 0x01]);
        assert_eq!(
            event,
            MetaEvent::KeySignature(KeySignature {
                key: 0xFD,
                scale: 1
            })
        );

        let MetaEvent::KeySignature(signature) = event else {
            unreachable!()
        };
        assert_eq!(signature.sharps_flats(), -3);
        assert!(signature.is_minor());
    }

    #[test]
    fn test_sequencer_specific() {
        assert_eq!(
            decode(&[0x7F, 0x03, 0x01, 0x02, 0x03]),
            MetaEvent::SequencerSpecific(vec![0x01, 0x02, 0x03])
        );
    }

    #[test]
    fn fixed_layout_ignores_declared_length() {
        env_logger::try_init().unwrap_or(());

        // Tempo declaring 0 bytes still reads its 3
        let mut cursor = ByteCursor::new(&[0x51, 0x00, 0x07, 0xA1, 0x20, 0xAA]);
        assert_eq!(decode_meta(&mut cursor), Ok(MetaEvent::Tempo(500_000)));
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn unknown_type_fails() {
        let mut cursor = ByteCursor::new(&[0x99, 0x03, 0x01, 0x02, 0x03]);
        assert_eq!(
            decode_meta(&mut cursor),
            Err(MidiError::UnknownMetaType {
                position: 0,
                meta_type: 0x99
            })
        );
    }

    #[test]
    fn short_payload_is_out_of_bounds() {
        let mut cursor = ByteCursor::new(&[0x01, 0x05, b'H', b'i']);
        assert!(matches!(
            decode_meta(&mut cursor),
            Err(MidiError::OutOfBounds { needed: 5, .. })
        ));
    }
}
