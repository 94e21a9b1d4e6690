//! Knobs that change how strictly a file is decoded

use serde::{Deserialize, Serialize};

use super::division::DEFAULT_MPQN;

/// What to do when the first track carries no tempo event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoPolicy {
    /// Use this many microseconds per quarter note.
    Fallback(u32),
    /// Refuse the file.
    Require,
}

impl Default for TempoPolicy {
    fn default() -> Self {
        Self::Fallback(DEFAULT_MPQN)
    }
}

/// Knobs for decoding a MIDI file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject tracks whose events overrun or stop short of the declared chunk length.
    pub strict_track_length: bool,
    pub tempo: TempoPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_track_length: true,
            tempo: TempoPolicy::default(),
        }
    }
}
