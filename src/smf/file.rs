//! The `MThd` header and the sequence of track chunks that follow it

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::bytes::ByteCursor;
use super::division::TickDivision;
use super::error::{MidiError, MidiResult};
use super::options::{ParseOptions, TempoPolicy};
use super::track::TrackChunk;

/// Identifier of the header chunk
pub const HEADER_MAGIC: &[u8; 4] = b"MThd";

/// Size of the header chunk body
const HEADER_LENGTH: u32 = 6;

/// The only file format that is decoded
pub const SUPPORTED_FORMAT: u16 = 1;

/// A decoded format 1 Standard MIDI File
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    /// Number of tracks declared in the header
    track_count: u16,
    /// Resolution from the header and tempo from the first track
    division: TickDivision,
    /// The tracks in file order
    tracks: Vec<TrackChunk>,
}

impl MidiFile {
    /// Decodes a whole file. Any error aborts the parse, no partial result is returned.
    pub fn parse(bytes: &[u8], options: &ParseOptions) -> MidiResult<Self> {
        let mut cursor = ByteCursor::new(bytes);

        if !cursor.expect_magic(HEADER_MAGIC)? {
            return Err(MidiError::BadMagic {
                position: 0,
                expected: "MThd",
            });
        }

        let header_length = cursor.read_u32_be()?;
        if header_length != HEADER_LENGTH {
            return Err(MidiError::HeaderLength(header_length));
        }

        let format = cursor.read_u16_be()?;
        if format != SUPPORTED_FORMAT {
            return Err(MidiError::UnsupportedFormat(format));
        }

        let track_count = cursor.read_u16_be()?;
        let division = TickDivision::from_header(cursor.read_u16_be()?)?;

        debug!(
            "MIDI format {}, {} track(s), {} pulses per quarter note",
            format,
            track_count,
            division.pulses_per_quarter_note()
        );

        let tracks = (0..track_count as usize)
            .map(|index| TrackChunk::parse(&mut cursor, index, options.strict_track_length))
            .collect::<MidiResult<Vec<_>>>()?;

        if !cursor.is_empty() {
            debug!(
                "Ignoring {} trailing byte(s) after the last track",
                cursor.remaining()
            );
        }

        let tempo = match (tracks.first().and_then(TrackChunk::first_tempo), options.tempo) {
            (Some(tempo), _) => tempo,
            (None, TempoPolicy::Require) => return Err(MidiError::MissingTempo),
            (None, TempoPolicy::Fallback(tempo)) => {
                warn!(
                    "No tempo event in the first track, assuming {} us per quarter note..!",
                    tempo
                );
                tempo
            }
        };

        debug!("Initial tempo: {} us per quarter note", tempo);

        Ok(Self {
            track_count,
            division: division.with_tempo(tempo),
            tracks,
        })
    }

    /// Number of tracks declared in the header
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Tick resolution and initial tempo
    pub fn division(&self) -> TickDivision {
        self.division
    }

    /// The tracks in file order
    pub fn tracks(&self) -> &[TrackChunk] {
        &self.tracks
    }

    /// The track at `index`
    pub fn track(&self, index: usize) -> Option<&TrackChunk> {
        self.tracks.get(index)
    }
}
