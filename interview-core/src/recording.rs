//! The recording collaborator, seen from the panel.
//!
//! The recorder owns its status. The panel only reads it and forwards the
//! start/stop gestures.

use std::fmt;
use tokio::sync::watch;

/// Status string published by the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingStatus(String);

impl RecordingStatus {
    /// Published once the recorder has flushed everything it captured.
    pub const READY_TO_RECORD: &'static str = "Ready to record";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn ready() -> Self {
        Self::new(Self::READY_TO_RECORD)
    }

    pub fn is_ready(&self) -> bool {
        self.0 == Self::READY_TO_RECORD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordingStatus {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read side of the recorder's status.
pub trait RecordingStatusSource: Send + Sync {
    /// The value right now, never a cached copy.
    fn current(&self) -> RecordingStatus;
}

impl RecordingStatusSource for watch::Receiver<RecordingStatus> {
    fn current(&self) -> RecordingStatus {
        self.borrow().clone()
    }
}

/// Gestures forwarded to the recorder untouched.
pub trait RecordingControl: Send + Sync {
    fn start_recording(&self);
    fn stop_recording(&self);
}
