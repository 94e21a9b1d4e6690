//! Channel voice messages: the seven event kinds addressed to one of the 16 MIDI channels

use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::error::MidiResult;

/// A channel voice event, `channel` is always in `0..=15`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelVoiceEvent {
    /// Low nibble of the status byte
    pub channel: u8,
    /// What happened on the channel
    pub message: VoiceMessage,
}

/// Payload of a channel voice event
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMessage {
    /// A key was released. Note-on events with velocity 0 are decoded as this
    NoteOff { key: u8, velocity: u8 },
    /// A key was pressed
    NoteOn { key: u8, velocity: u8 },
    /// Aftertouch on a single key
    PolyPressure { key: u8, pressure: u8 },
    /// Control change
    Controller { number: u8, value: u8 },
    /// Patch change
    ProgramChange { program: u8 },
    /// Aftertouch for the whole channel
    ChannelPressure { pressure: u8 },
    /// Pitch wheel, split in its two 7 bit halves
    PitchBend { lsb: u8, msb: u8 },
}

impl VoiceMessage {
    /// The 14 bit pitch wheel position, `None` for every other message
    pub fn pitch_bend_value(&self) -> Option<u16> {
        match *self {
            Self::PitchBend { lsb, msb } => Some(((msb as u16 & 0x7F) << 7) | (lsb as u16 & 0x7F)),
            _ => None,
        }
    }
}

/// Decodes the data bytes of a channel voice event. The cursor must sit on the first data
/// byte, `status` must be in `0x80..=0xEF`.
pub fn decode_channel_voice(
    cursor: &mut ByteCursor<'_>,
    status: u8,
) -> MidiResult<ChannelVoiceEvent> {
    let channel = status & 0x0F;

    let message = match status & 0xF0 {
        0x80 => {
            let [key, velocity] = read_pair(cursor)?;
            VoiceMessage::NoteOff { key, velocity }
        }
        0x90 => {
            let [key, velocity] = read_pair(cursor)?;
            if velocity == 0 {
                VoiceMessage::NoteOff { key, velocity }
            } else {
                VoiceMessage::NoteOn { key, velocity }
            }
        }
        0xA0 => {
            let [key, pressure] = read_pair(cursor)?;
            VoiceMessage::PolyPressure { key, pressure }
        }
        0xB0 => {
            let [number, value] = read_pair(cursor)?;
            VoiceMessage::Controller { number, value }
        }
        0xC0 => VoiceMessage::ProgramChange {
            program: cursor.read_u8()?,
        },
        0xD0 => VoiceMessage::ChannelPressure {
            pressure: cursor.read_u8()?,
        },
        0xE0 => {
            let [lsb, msb] = read_pair(cursor)?;
            VoiceMessage::PitchBend { lsb, msb }
        }
        other => unreachable!("Status {other:#04X} is not a channel voice status"),
    };

    Ok(ChannelVoiceEvent { channel, message })
}

/// Reads the two data bytes most channel voice messages carry
fn read_pair(cursor: &mut ByteCursor<'_>) -> MidiResult<[u8; 2]> {
    let first = cursor.read_u8()?;
    let second = cursor.read_u8()?;
    Ok([first, second])
}

#[cfg(test)]
mod tests {
    use super::{ChannelVoiceEvent, VoiceMessage, decode_channel_voice};
    use crate::smf::bytes::ByteCursor;
    use crate::smf::error::MidiError;

    fn decode(status: u8, data: &[u8]) -> ChannelVoiceEvent {
        let mut cursor = ByteCursor::new(data);
        let event = decode_channel_voice(&mut cursor, status).expect("Decode channel event");
        assert!(cursor.is_empty(), "Every data byte should be consumed");
        event
    }

    #[test]
    fn note_off_keeps_key_and_channel() {
        let event = decode(0x8F, &[0x55, 0x7F]);
        assert_eq!(event.channel, 0x0F);
        assert_eq!(
            event.message,
            VoiceMessage::NoteOff {
                key: 0x55,
                velocity: 0x7F
            }
        );
    }

    #[test]
    fn note_on_with_zero_velocity_becomes_note_off() {
        let event = decode(0x93, &[60, 0]);
        assert_eq!(event.channel, 3);
        assert_eq!(
            event.message,
            VoiceMessage::NoteOff {
                key: 60,
                velocity: 0
            }
        );

        let event = decode(0x93, &[60, 1]);
        assert_eq!(
            event.message,
            VoiceMessage::NoteOn {
                key: 60,
                velocity: 1
            }
        );
    }

    #[test]
    fn one_byte_messages() {
        assert_eq!(
            decode(0xC2, &[5]).message,
            VoiceMessage::ProgramChange { program: 5 }
        );
        assert_eq!(
            decode(0xD9, &[100]).message,
            VoiceMessage::ChannelPressure { pressure: 100 }
        );
    }

    #[test]
    fn two_byte_messages() {
        assert_eq!(
            decode(0xA0, &[60, 20]).message,
            VoiceMessage::PolyPressure {
                key: 60,
                pressure: 20
            }
        );
        assert_eq!(
            decode(0xB1, &[7, 100]).message,
            VoiceMessage::Controller {
                number: 7,
                value: 100
            }
        );
    }

    #[test]
    fn pitch_bend_combines_both_halves() {
        let event = decode(0xE0, &[0x00, 0x40]);
        assert_eq!(event.message, VoiceMessage::PitchBend { lsb: 0, msb: 0x40 });
        assert_eq!(event.message.pitch_bend_value(), Some(0x2000));
        assert_eq!(
            VoiceMessage::ProgramChange { program: 1 }.pitch_bend_value(),
            None
        );
    }

    #[test]
    fn missing_data_byte_is_out_of_bounds() {
        let mut cursor = ByteCursor::new(&[60]);
        assert!(matches!(
            decode_channel_voice(&mut cursor, 0x90),
            Err(MidiError::OutOfBounds { .. })
        ));
    }
}
