//! Standard MIDI File decoding: format 1, metrical timing

pub mod bytes;
pub mod channel;
pub mod division;
pub mod error;
pub mod event;
pub mod file;
pub mod meta;
pub mod options;
pub mod sysex;
pub mod track;

#[cfg(test)]
pub(crate) mod test_support;

pub use bytes::{ByteCursor, decode_vlq};
pub use channel::{ChannelVoiceEvent, VoiceMessage};
pub use division::{DEFAULT_MPQN, TickDivision};
pub use error::{ErrorKind, MidiError, MidiResult};
pub use event::{DecodedEvent, Event, EventCategory, EventDecoder, Timed};
pub use file::MidiFile;
pub use meta::{KeySignature, MetaEvent, SmpteOffset, TextKind, TimeSignature};
pub use options::{ParseOptions, TempoPolicy};
pub use sysex::SysExEvent;
pub use track::TrackChunk;
