use crate::engine::Engine;
use anyhow::Result;
use log::debug;
use std::io::Write;

/// Plays notes on the terminal, ringing the bell at the start of each one if asked to.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEngine {
    pub bell: bool,
}

impl ConsoleEngine {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl Engine for ConsoleEngine {
    fn tone(&self, frequency_hz: u32) -> Result<()> {
        debug!("Tone {}Hz", frequency_hz);

        if self.bell {
            let mut out = std::io::stdout().lock();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        Ok(())
    }

    fn silence(&self) -> Result<()> {
        debug!("Silence");
        Ok(())
    }
}
