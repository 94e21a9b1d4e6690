//! Conversion from ticks to wall-clock durations for metrical timing

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{MidiError, MidiResult};

/// Tempo assumed by the format when no tempo event says otherwise, 120 bpm
pub const DEFAULT_MPQN: u32 = 500_000;

/// Pulses per quarter note paired with the tempo they are played at
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDivision {
    /// Ticks per quarter note, from the file header
    pulses_per_quarter_note: u16,
    /// Microseconds per quarter note, from the first tempo event
    microseconds_per_quarter_note: u32,
}

impl TickDivision {
    /// Interprets the raw header division field. Bit 15 clear means bits 14-0 are pulses per
    /// quarter note; timecode divisions and a zero resolution are rejected.
    pub fn from_header(division: u16) -> MidiResult<Self> {
        if division & 0x8000 != 0 {
            return Err(MidiError::TimecodeDivision(division));
        }

        let pulses_per_quarter_note = division & 0x7FFF;
        if pulses_per_quarter_note == 0 {
            return Err(MidiError::ZeroDivision);
        }

        Ok(Self {
            pulses_per_quarter_note,
            microseconds_per_quarter_note: DEFAULT_MPQN,
        })
    }

    /// Same resolution at another tempo
    pub fn with_tempo(self, microseconds_per_quarter_note: u32) -> Self {
        Self {
            microseconds_per_quarter_note,
            ..self
        }
    }

    pub fn pulses_per_quarter_note(&self) -> u16 {
        self.pulses_per_quarter_note
    }

    pub fn microseconds_per_quarter_note(&self) -> u32 {
        self.microseconds_per_quarter_note
    }

    /// Length of one tick in whole microseconds, truncated
    pub fn tick_length(&self) -> u32 {
        self.microseconds_per_quarter_note / self.pulses_per_quarter_note as u32
    }

    /// Duration of `ticks` in microseconds.
    ///
    /// The tick length is truncated before multiplying, so 96 ticks at 96 ppqn and 500000
    /// µs/quarter last 96 * 5208 = 499968 µs rather than 500000. Saturates at `u32::MAX`.
    pub fn duration_micros(&self, ticks: u32) -> u32 {
        ticks.saturating_mul(self.tick_length())
    }

    /// [`TickDivision::duration_micros`] as a [`Duration`]
    pub fn duration(&self, ticks: u32) -> Duration {
        Duration::from_micros(self.duration_micros(ticks) as u64)
    }

    /// Beats per minute of the current tempo
    pub fn tempo_bpm(&self) -> f64 {
        60_000_000.0 / self.microseconds_per_quarter_note as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MPQN, TickDivision};
    use crate::smf::error::{ErrorKind, MidiError};
    use std::time::Duration;

    #[test]
    fn metrical_division_is_read() {
        let division = TickDivision::from_header(0x0180).expect("Metrical division");

        assert_eq!(division.pulses_per_quarter_note(), 384);
        assert_eq!(division.microseconds_per_quarter_note(), DEFAULT_MPQN);
    }

    #[test]
    fn timecode_division_is_unsupported() {
        let err = TickDivision::from_header(0xE728).expect_err("Timecode division");

        assert_eq!(err, MidiError::TimecodeDivision(0xE728));
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }

    #[test]
    fn zero_division_is_rejected() {
        assert_eq!(TickDivision::from_header(0), Err(MidiError::ZeroDivision));
    }

    #[test]
    fn tick_length_truncates_before_multiplying() {
        let division = TickDivision::from_header(96)
            .expect("Metrical division")
            .with_tempo(500_000);

        assert_eq!(division.tick_length(), 5208);
        assert_eq!(division.duration_micros(96), 499_968);
        assert_eq!(division.duration(96), Duration::from_micros(499_968));
        assert_eq!(division.duration_micros(0), 0);
    }

    #[test]
    fn tempo_slower_than_resolution_has_zero_length_ticks() {
        let division = TickDivision::from_header(960)
            .expect("Metrical division")
            .with_tempo(500);

        assert_eq!(division.tick_length(), 0);
        assert_eq!(division.duration_micros(10_000), 0);
    }

    #[test]
    fn long_durations_saturate() {
        let division = TickDivision::from_header(1)
            .expect("Metrical division")
            .with_tempo(0x00FF_FFFF);

        assert_eq!(division.duration_micros(0x0FFF_FFFF), u32::MAX);
    }

    #[test]
    fn default_tempo_is_120_bpm() {
        let division = TickDivision::from_header(480).expect("Metrical division");
        assert!((division.tempo_bpm() - 120.0).abs() < f64::EPSILON);
    }
}
