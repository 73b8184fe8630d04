//! # Interview Audio
//!
//! Turns the closing-message payload into a playable clip and plays it to
//! the end.

pub mod clip;
pub mod player;

pub use clip::{AudioClip, AudioFormat};
pub use player::{AudioPlayer, CommandPlayer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio payload is empty")]
    Empty,

    #[error("audio payload is not MPEG audio (starts with {0:02x?})")]
    Unrecognized(Vec<u8>),

    #[error("no audio player configured")]
    NoPlayer,

    #[error("failed to start audio player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audio player exited with {0}")]
    PlayerExit(std::process::ExitStatus),

    #[error("failed to stage clip for playback: {0}")]
    Staging(#[from] std::io::Error),
}
