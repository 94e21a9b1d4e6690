//! Errors produced while decoding a Standard MIDI File

use thiserror::Error;

/// Broad classification of a [`MidiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes do not follow the SMF layout
    Format,
    /// The file is well formed but uses something this decoder does not implement
    UnsupportedFeature,
    /// The data ended early, or a chunk's declared length did not match its content
    Truncation,
}

/// Any failure that aborts the decoding of a MIDI file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MidiError {
    /// A chunk did not start with its 4 byte identifier
    #[error("Expected `{expected}` chunk identifier at byte {position}")]
    BadMagic {
        /// Offset of the identifier
        position: usize,
        /// The identifier that should have been there
        expected: &'static str,
    },
    /// The header chunk must be exactly 6 bytes long
    #[error("Header chunk length is {0}, expected 6")]
    HeaderLength(u32),
    /// Division field declared zero ticks per quarter note
    #[error("Header declares 0 pulses per quarter note")]
    ZeroDivision,
    /// Status byte outside of the channel voice, sysex and meta ranges
    #[error("Unknown status byte {status:#04X} at byte {position}")]
    UnknownStatus {
        /// Offset of the status byte
        position: usize,
        /// The offending byte
        status: u8,
    },
    /// Meta event type byte that has no known layout
    #[error("Unknown meta event type {meta_type:#04X} at byte {position}")]
    UnknownMetaType {
        /// Offset of the type byte
        position: usize,
        /// The offending type byte
        meta_type: u8,
    },
    /// A data byte appeared where a status byte was required
    #[error("Running status at byte {position} but no status byte was seen in this track")]
    RunningStatusWithoutStatus {
        /// Offset of the data byte
        position: usize,
    },
    /// Variable length quantity still had its continuation bit set on the 4th byte
    #[error("Variable length quantity at byte {position} is longer than 4 bytes")]
    VlqOverrun {
        /// Offset of the first byte of the quantity
        position: usize,
    },
    /// Only format 1 files are decoded
    #[error("MIDI format {0} is not supported, only format 1 is")]
    UnsupportedFormat(u16),
    /// SMPTE timecode divisions are not decoded
    #[error("Timecode division {0:#06X} is not supported, only metrical timing is")]
    TimecodeDivision(u16),
    /// No tempo event in the first track while a tempo was required
    #[error("No tempo event found in the first track")]
    MissingTempo,
    /// Attempted to read past the end of the data
    #[error("Needed {needed} byte(s) at byte {position} but only {remaining} remain")]
    OutOfBounds {
        /// Offset the read started at
        position: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes that were left
        remaining: usize,
    },
    /// A track's events did not end exactly at the track's declared length
    #[error("Track {track} declares {declared} bytes but its events consumed {consumed}")]
    TrackLengthMismatch {
        /// Index of the track in the file
        track: usize,
        /// Length from the `MTrk` header
        declared: u32,
        /// Bytes actually consumed by the decoded events
        consumed: usize,
    },
}

impl MidiError {
    /// Which of the three error families this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadMagic { .. }
            | Self::HeaderLength(_)
            | Self::ZeroDivision
            | Self::UnknownStatus { .. }
            | Self::UnknownMetaType { .. }
            | Self::RunningStatusWithoutStatus { .. }
            | Self::VlqOverrun { .. } => ErrorKind::Format,

            Self::UnsupportedFormat(_) | Self::TimecodeDivision(_) | Self::MissingTempo => {
                ErrorKind::UnsupportedFeature
            }

            Self::OutOfBounds { .. } | Self::TrackLengthMismatch { .. } => ErrorKind::Truncation,
        }
    }
}

/// Result type used by the decoder
pub type MidiResult<T> = Result<T, MidiError>;
