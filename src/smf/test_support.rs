//! Builders for small in-memory MIDI files used by the tests

/// `0xFF 0x51` tempo event of 500000 µs per quarter note at delta 0
pub const TEMPO_500K: [u8; 7] = [0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20];

/// `0xFF 0x2F` end of track event at delta 0
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// An `MThd` chunk
pub fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend(6u32.to_be_bytes());
    bytes.extend(format.to_be_bytes());
    bytes.extend(tracks.to_be_bytes());
    bytes.extend(division.to_be_bytes());
    bytes
}

/// An `MTrk` chunk whose declared length matches `events`
pub fn track_chunk(events: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend((events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

/// A complete format 1 file
pub fn smf(division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = header(1, tracks.len() as u16, division);
    for events in tracks {
        bytes.extend(track_chunk(events));
    }
    bytes
}
