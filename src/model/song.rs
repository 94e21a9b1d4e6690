use crate::smf::TickDivision;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Number of MIDI channels in a track.
pub const CHANNEL_COUNT: usize = 16;

/// A finished note: which key and for how many ticks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCommand {
    pub key: u8,
    pub duration_ticks: u32,
}

/// The monophonic line extracted for one MIDI channel.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    /// Instrument name assigned through a channel prefix, if any.
    pub name: Option<String>,
    pub commands: Vec<NoteCommand>,
}

/// Every channel of one track, reduced to note commands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackCommands {
    pub name: String,
    pub channels: [Channel; CHANNEL_COUNT],
}

impl TrackCommands {
    pub fn command_count(&self) -> usize {
        self.channels.iter().map(|c| c.commands.len()).sum()
    }
}

/// A note ready for the playback backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedNote {
    pub key: u8,
    pub duration_micros: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub tempo_bpm: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Song {
    pub metadata: Metadata,
    pub division: TickDivision,
    pub tracks: Vec<TrackCommands>,
}

impl Song {
    pub fn command_count(&self) -> usize {
        self.tracks.iter().map(TrackCommands::command_count).sum()
    }

    /// The notes of one channel of one track, in order, with durations in microseconds.
    pub fn playback(&self, track: usize, channel: u8) -> Result<Vec<PlayedNote>> {
        let commands = self
            .tracks
            .get(track)
            .ok_or_else(|| {
                anyhow!(
                    "Track {} does not exist, the song has {}..!",
                    track,
                    self.tracks.len()
                )
            })?
            .channels
            .get(channel as usize)
            .ok_or_else(|| anyhow!("Channel {} is out of range 0..=15..!", channel))?
            .commands
            .iter()
            .map(|command| PlayedNote {
                key: command.key,
                duration_micros: self.division.duration_micros(command.duration_ticks),
            })
            .collect();

        Ok(commands)
    }
}
