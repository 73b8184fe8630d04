use interview_audio::AudioError;
use interview_remote::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("selection {from}..{to} is outside the document (length {len})")]
    SelectionOutOfRange { from: usize, to: usize, len: usize },

    #[error("cannot read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Why the closing message could not be delivered. Never surfaced to the
/// candidate; it only selects the fallback route.
#[derive(Debug, Error)]
pub enum TerminationError {
    #[error("end-of-interview request failed: {0}")]
    Endpoint(#[from] RemoteError),

    #[error("closing message could not be decoded: {0}")]
    Decode(#[from] AudioError),

    #[error("closing message playback failed: {0}")]
    Playback(#[source] AudioError),
}
