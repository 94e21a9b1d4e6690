#![allow(non_snake_case)]

mod engine;
mod midi_importer;
mod model;
mod player;
pub mod smf;
mod util;

pub use engine::*;
pub use midi_importer::*;
pub use model::config::*;
pub use model::song::*;
pub use player::*;
pub use util::*;
