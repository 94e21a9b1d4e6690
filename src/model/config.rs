use crate::smf::{DEFAULT_MPQN, ParseOptions, TempoPolicy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MIDI_BEEPER",
    about = "Beep one channel of a format-1 MIDI file!"
)]
pub struct Args {
    /// Path to the target MIDI file.
    pub midi: PathBuf,

    /// Index of the track to play. Track 0 usually only carries the tempo map.
    #[arg(short, long, default_value_t = 1)]
    pub track: usize,

    /// MIDI channel (0..=15) of the selected track to play.
    #[arg(short, long, default_value_t = 0)]
    pub channel: u8,

    /// List every track and the channels of the selected track, then exit.
    #[arg(short, long, default_value_t = false)]
    pub list: bool,

    /// Dry run (print first dry_run_max commands and exit).
    #[arg(short, long, default_value_t = false)]
    pub dry_run: bool,

    /// Maximum commands to print in dry run.
    #[arg(long, default_value_t = 80)]
    pub dry_run_max: usize,

    /// Tolerate tracks whose events do not end exactly at their declared length.
    #[arg(short, long, default_value_t = false)]
    pub permissive: bool,

    /// Fail instead of falling back to the default tempo when track 0 has no tempo event.
    #[arg(long, default_value_t = false)]
    pub require_tempo: bool,

    /// Tempo in microseconds per quarter note used when track 0 has no tempo event.
    #[arg(long, default_value_t = DEFAULT_MPQN)]
    pub default_tempo: u32,

    /// Ring the terminal bell for every note.
    #[arg(short, long, default_value_t = false)]
    pub bell: bool,

    /// Prints extra information to the terminal.
    #[arg(short, long)]
    pub verbose: bool,

    /// Delays the start of the performance by N seconds.
    #[arg(long = "delay-start", default_value_t = 0)]
    pub delay_start: u64,
}

impl Args {
    /// Decoder options selected by the flags.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_track_length: !self.permissive,
            tempo: if self.require_tempo {
                TempoPolicy::Require
            } else {
                TempoPolicy::Fallback(self.default_tempo)
            },
        }
    }
}
