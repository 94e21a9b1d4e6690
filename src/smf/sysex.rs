//! System exclusive messages (`0xF0`) and escape sequences (`0xF7`)

use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::error::MidiResult;

/// Byte closing a (possibly split) system exclusive message
pub const END_OF_EXCLUSIVE: u8 = 0xF7;

/// A raw system exclusive payload, no further meaning is given to the bytes
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SysExEvent {
    /// A complete system exclusive message, terminator excluded
    Message(Vec<u8>),
    /// Arbitrary bytes sent verbatim
    Escape(Vec<u8>),
}

impl SysExEvent {
    /// The payload bytes
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Message(bytes) | Self::Escape(bytes) => bytes,
        }
    }
}

/// Decodes a sysex or escape event. The cursor must sit just after the status byte.
///
/// A `0xF0` message is made of length-prefixed packets read back to back until one ends
/// with [`END_OF_EXCLUSIVE`]; that final byte is dropped. A `0xF7` escape is one packet
/// taken as is.
pub fn decode_sysex(cursor: &mut ByteCursor<'_>, status: u8) -> MidiResult<SysExEvent> {
    if status == END_OF_EXCLUSIVE {
        let length = cursor.read_vlq()? as usize;
        return Ok(SysExEvent::Escape(cursor.read_bytes(length)?.to_vec()));
    }

    let mut message = Vec::new();

    loop {
        let length = cursor.read_vlq()? as usize;
        let packet = cursor.read_bytes(length)?;

        match packet.split_last() {
            Some((&END_OF_EXCLUSIVE, body)) => {
                message.extend_from_slice(body);
                break;
            }
            _ => message.extend_from_slice(packet),
        }
    }

    Ok(SysExEvent::Message(message))
}

#[cfg(test)]
mod tests {
    use super::{SysExEvent, decode_sysex};
    use crate::smf::bytes::ByteCursor;
    use crate::smf::error::MidiError;

    #[test]
    fn single_packet_message() {
        let mut cursor = ByteCursor::new(&[0x05, 0x7E, 0x7F, 0x09, 0x01, 0xF7]);
        let event = decode_sysex(&mut cursor, 0xF0).expect("Parse sysex message from bytes");

        assert_eq!(event, SysExEvent::Message(vec![0x7E, 0x7F, 0x09, 0x01]));
        assert!(cursor.is_empty());
    }

    #[test]
    fn split_packets_are_joined() {
        let mut cursor = ByteCursor::new(&[0x03, 0x41, 0x42, 0x43, 0x01, 0xF7]);
        let event = decode_sysex(&mut cursor, 0xF0).expect("Reassemble split sysex");

        assert_eq!(event.bytes(), b"ABC");
        assert!(cursor.is_empty());
    }

    #[test]
    fn terminator_only_counts_as_last_byte() {
        let mut cursor = ByteCursor::new(&[0x02, 0xF7, 0x41, 0x02, 0x42, 0xF7, 0x00]);
        let event = decode_sysex(&mut cursor, 0xF0).expect("Parse sysex");

        assert_eq!(event, SysExEvent::Message(vec![0xF7, 0x41, 0x42]));
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn missing_terminator_runs_out_of_bytes() {
        let mut cursor = ByteCursor::new(&[0x02, 0x41, 0x42]);
        assert!(matches!(
            decode_sysex(&mut cursor, 0xF0),
            Err(MidiError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn escape_is_taken_verbatim() {
        let mut cursor = ByteCursor::new(&[0x03, 0xF3, 0x01, 0xF7, 0x90]);
        let event = decode_sysex(&mut cursor, 0xF7).expect("Parse escape sequence");

        assert_eq!(event, SysExEvent::Escape(vec![0xF3, 0x01, 0xF7]));
        assert_eq!(cursor.remaining(), 1);
    }
}
