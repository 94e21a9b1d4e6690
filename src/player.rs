use crate::engine::Engine;
use crate::model::song::PlayedNote;
use crate::util::note_label;
use anyhow::bail;
use log::{debug, info, warn};
use spin_sleep::{SpinSleeper, SpinStrategy};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep while a note is held, so a stop request is seen quickly.
const MAX_SLEEP_CHUNK: Duration = Duration::from_millis(50);

enum ControlMsg {
    Stop,
}

#[derive(Debug)]
pub struct Player<E: Engine> {
    delay: u64,
    verbose: bool,
    engine: Arc<E>,
    notes: Mutex<Vec<PlayedNote>>,
    control_tx: Mutex<Option<Sender<ControlMsg>>>,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
}

/// Silences the engine if a stop was requested. Returns true when playback must end.
fn stop_requested<E: Engine>(engine: &E, ctrl_rx: &Receiver<ControlMsg>) -> bool {
    let Ok(ControlMsg::Stop) = ctrl_rx.try_recv() else {
        return false;
    };

    if let Err(why) = engine.silence() {
        warn!("Failed to silence the engine: {:?}", why);
    }

    true
}

impl<E: Engine + 'static> Player<E> {
    pub fn new(engine: E, verbose: bool, delay: u64) -> Self {
        Self {
            delay,
            verbose,
            engine: Arc::new(engine),
            notes: Mutex::new(Vec::new()),
            control_tx: Mutex::new(None),
            worker_handle: Mutex::new(None),
        }
    }

    /// Replaces the loaded line. Notes are played strictly one after the other.
    pub fn load_notes(&self, title: &str, notes: Vec<PlayedNote>) -> anyhow::Result<()> {
        let Ok(mut notes_lock) = self.notes.lock() else {
            bail!("Failed to lock the loaded notes..!");
        };
        *notes_lock = notes;

        info!(
            "Loaded '{}' with {} note(s) to play..!",
            title,
            notes_lock.len()
        );

        Ok(())
    }

    pub fn play(&self, join: bool) -> anyhow::Result<()> {
        {
            let Ok(guard) = self.worker_handle.lock() else {
                bail!("Failed to lock worker handle..!")
            };

            if guard.is_some() {
                bail!("Playback already running..!")
            }
        }

        let notes = match self.notes.lock() {
            Ok(notes) => notes.clone(),
            Err(_) => bail!("Failed to lock notes..!"),
        };

        if notes.is_empty() {
            bail!("No notes loaded..!")
        }

        let engine = Arc::clone(&self.engine);
        let (tx, rx) = mpsc::channel::<ControlMsg>();

        {
            let Ok(mut ctl) = self.control_tx.lock() else {
                bail!("Failed to lock control_tx..!")
            };

            *ctl = Some(tx);
        }

        let delay = self.delay;
        let verbose = self.verbose;
        let handle = thread::spawn(move || {
            let ctrl_rx = rx;

            info!(
                "Starting playback {}..!",
                if delay > 0 {
                    format!("in {} seconds", delay)
                } else {
                    "now".to_owned()
                }
            );

            let sleeper = SpinSleeper::new(100_000).with_spin_strategy(SpinStrategy::YieldThread);

            if delay > 0 {
                sleeper.sleep(Duration::from_secs(delay));
            }

            let start = Instant::now();

            for (i, note) in notes.into_iter().enumerate() {
                if stop_requested(engine.as_ref(), &ctrl_rx) {
                    warn!(
                        "Playback stopped via control message after {} seconds..!",
                        start.elapsed().as_secs()
                    );
                    return;
                }

                if note.duration_micros == 0 {
                    debug!("Skipping zero length note {}..!", note_label(note.key));
                    continue;
                }

                if verbose {
                    info!(
                        "{:>5} | {:10} | at {:>13.3}ms | duration: {:>9.3}ms",
                        i,
                        note_label(note.key),
                        start.elapsed().as_secs_f64() * 1000.0,
                        note.duration_micros as f64 / 1000.0
                    );
                }

                if let Err(why) = engine.beep_midi(note.key) {
                    warn!("Playback error for {} | why: {:?}", note_label(note.key), why);
                }

                let target = Instant::now() + Duration::from_micros(note.duration_micros as u64);

                loop {
                    if stop_requested(engine.as_ref(), &ctrl_rx) {
                        warn!("Playback stopped during {}..!", note_label(note.key));
                        return;
                    }

                    let now = Instant::now();
                    if now >= target {
                        break;
                    }

                    sleeper.sleep((target - now).min(MAX_SLEEP_CHUNK));
                }

                if let Err(why) = engine.silence() {
                    warn!("Failed to release {} | why: {:?}", note_label(note.key), why);
                }
            }

            info!("Playback thread finished all notes..!");
        });

        if join {
            if handle.join().is_err() {
                bail!("Playback thread panicked..!")
            }
        } else {
            let Ok(mut wh) = self.worker_handle.lock() else {
                bail!("Failed to lock worker handle..!")
            };

            *wh = Some(handle);
        }

        Ok(())
    }

    pub fn stop(&self) -> anyhow::Result<()> {
        let tx = {
            let Ok(mut lock) = self.control_tx.lock() else {
                bail!("Failed to lock control_tx..!")
            };
            lock.take()
        };

        if let Some(tx) = tx {
            let _ = tx.send(ControlMsg::Stop);
        } else {
            bail!("No worker is running playback..!")
        }

        let Ok(mut lock) = self.worker_handle.lock() else {
            bail!("Failed to lock worker_handle..!")
        };

        if let Some(handle) = lock.take() {
            let _ = handle.join();
            debug!("Playback thread joined..!");
            info!("Stopped playback thread..!");
        }

        Ok(())
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
