pub mod config;
pub mod song;
