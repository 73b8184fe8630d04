//! Stand-in for the browser's recording subsystem.
//!
//! Mirrors its status lifecycle: idle at "Ready to record", "Recording"
//! while capturing, then "Processing" for a while after a stop before
//! returning to ready.

use interview_core::{RecordingControl, RecordingStatus};
use std::time::Duration;
use tokio::sync::watch;

pub const RECORDING: &str = "Recording";
pub const PROCESSING: &str = "Processing";

#[derive(Debug)]
pub struct SimulatedRecorder {
    status: watch::Sender<RecordingStatus>,
    finalize_delay: Duration,
}

impl SimulatedRecorder {
    /// Returns the recorder and a read handle on its status.
    pub fn start(finalize_delay: Duration) -> (Self, watch::Receiver<RecordingStatus>) {
        let (status, rx) = watch::channel(RecordingStatus::ready());
        (
            Self {
                status,
                finalize_delay,
            },
            rx,
        )
    }

    pub fn status(&self) -> RecordingStatus {
        self.status.borrow().clone()
    }
}

impl RecordingControl for SimulatedRecorder {
    fn start_recording(&self) {
        if !self.status.borrow().is_ready() {
            tracing::warn!("Recorder busy ({}), start ignored", self.status());
            return;
        }
        self.status.send_replace(RecordingStatus::new(RECORDING));
        tracing::info!("Recording started");
    }

    fn stop_recording(&self) {
        if self.status.borrow().as_str() != RECORDING {
            return;
        }
        self.status.send_replace(RecordingStatus::new(PROCESSING));
        tracing::info!("Recording stopped, finalizing");

        // Flush happens off the caller's path.
        let status = self.status.clone();
        let delay = self.finalize_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_replace(RecordingStatus::ready());
            tracing::info!("Recording finalized");
        });
    }
}
