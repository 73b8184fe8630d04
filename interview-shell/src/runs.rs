//! Code runs in flight. Each run is a spawned task that reports back over a
//! channel, so the command loop keeps reading input while the runner works.

use interview_core::PendingRun;
use interview_remote::ExecutionResult;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct RunSlot {
    task: Option<JoinHandle<()>>,
    results: mpsc::UnboundedSender<ExecutionResult>,
}

impl RunSlot {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ExecutionResult>) {
        let (results, rx) = mpsc::unbounded_channel();
        (Self { task: None, results }, rx)
    }

    /// True from `start` until the result has been taken with `finish`.
    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Returns `false` and drops `run` when a run is already in flight.
    pub fn start(&mut self, run: PendingRun) -> bool {
        if self.is_busy() {
            return false;
        }
        let results = self.results.clone();
        self.task = Some(tokio::spawn(async move {
            let _ = results.send(run.await);
        }));
        true
    }

    /// The result for the current run has been received.
    pub fn finish(&mut self) {
        self.task = None;
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Pending run cancelled");
        }
    }
}

impl Drop for RunSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
