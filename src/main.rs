use MIDI_BEEPER::{
    Args, DefaultEngine, Player, Song, frequency_for_key, import_midi_file, note_label,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::sync::Arc;

fn list_tracks(song: &Song, selected: usize) {
    for (i, track) in song.tracks.iter().enumerate().skip(1) {
        info!(
            "Track {:>3}: '{}' with {} note(s)",
            i,
            track.name,
            track.command_count()
        );
    }

    let Some(track) = song.tracks.get(selected) else {
        warn!("Track {} does not exist..!", selected);
        return;
    };

    for (i, channel) in track.channels.iter().enumerate() {
        if channel.commands.is_empty() && channel.name.is_none() {
            continue;
        }

        info!(
            "  Channel {:>2}: '{}' with {} note(s)",
            i,
            channel.name.as_deref().unwrap_or("unnamed"),
            channel.commands.len()
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Importing MIDI file: '{}'...", args.midi.display());
    let song = import_midi_file(&args.midi, &args.parse_options())?;
    let title = song
        .metadata
        .title
        .clone()
        .unwrap_or_else(|| "<unknown>".into());

    debug!(
        "Imported song '{}' with {} track(s) and {} note(s) at {:.2} bpm..!",
        title,
        song.tracks.len(),
        song.command_count(),
        song.division.tempo_bpm()
    );

    if args.list {
        list_tracks(&song, args.track);
        return Ok(());
    }

    let notes = song.playback(args.track, args.channel)?;

    if args.dry_run {
        info!("Previewing at most {} notes..!", args.dry_run_max);
        for (i, note) in notes.iter().take(args.dry_run_max).enumerate() {
            info!(
                "Note {}: {} freq={}Hz dur_us={}",
                i,
                note_label(note.key),
                frequency_for_key(note.key),
                note.duration_micros
            );
        }
        return Ok(());
    }

    let player = Arc::new(Player::new(
        DefaultEngine::new(args.bell),
        args.verbose,
        args.delay_start,
    ));
    player.load_notes(&title, notes)?;

    let player_for_handler = Arc::clone(&player);
    ctrlc::set_handler(move || {
        warn!("Ctrl-C received, stopping playback..!");
        let _ = player_for_handler.stop();
    })
    .context("Error setting Ctrl-C handler..!")?;

    player.play(true)?;
    info!("Playback finished, exiting..!");

    Ok(())
}
