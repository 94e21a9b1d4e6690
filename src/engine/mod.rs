use crate::util::frequency_for_key;
use anyhow::bail;

mod console;

pub use console::ConsoleEngine;

pub type DefaultEngine = ConsoleEngine;

/// The playback backend. The player decides how long a tone is held.
pub trait Engine: Send + Sync + Sized {
    /// Start sounding `frequency_hz`, replacing any tone already playing.
    fn tone(&self, frequency_hz: u32) -> anyhow::Result<()>;

    /// Stop any sound immediately.
    fn silence(&self) -> anyhow::Result<()>;

    fn beep_midi(&self, key: u8) -> anyhow::Result<()> {
        if key > 127 {
            bail!("MIDI key {} is out of range 0..=127..!", key);
        }

        self.tone(frequency_for_key(key))
    }
}


#[cfg(test)]
mod test {
    use super::Engine;
    use super::test_engine::RecordingEngine;

    #[test]
    fn beep_midi_maps_key_to_frequency() {
        let engine = RecordingEngine::default();

        assert!(engine.beep_midi(69).is_ok());
        assert!(engine.beep_midi(128).is_err());
        assert_eq!(*engine.tones.lock().unwrap(), vec![440]);
    }
}
