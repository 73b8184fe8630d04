//! End-of-interview sequence.
//!
//! ```text
//! Idle -> AwaitingRecordingReady -> CallingEndpoint -> PlayingAudio -> Navigated
//!                                        |                  |
//!                                        +---- fallback ----+--------> Navigated
//! any non-terminal state --------- teardown / navigation error -------> Failed
//! ```
//!
//! The state lives in a single `watch` cell. Every transition is a
//! compare-and-set on that cell, so the trigger guard and the running flow
//! always read the latest value and no state is ever revisited.

use interview_audio::{AudioClip, AudioPlayer};
use interview_remote::ClosingMessageSource;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::error::TerminationError;
use crate::recording::RecordingStatusSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationState {
    Idle,
    AwaitingRecordingReady,
    CallingEndpoint,
    PlayingAudio,
    Navigated,
    Failed,
}

impl TerminationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TerminationState::Navigated | TerminationState::Failed)
    }

    /// Whether `self -> next` is an edge of the machine.
    pub fn can_advance_to(self, next: TerminationState) -> bool {
        use TerminationState::*;
        match (self, next) {
            (Idle, AwaitingRecordingReady) => true,
            (AwaitingRecordingReady, CallingEndpoint) => true,
            (CallingEndpoint, PlayingAudio) => true,
            (CallingEndpoint | PlayingAudio, Navigated) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for TerminationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationState::Idle => "idle",
            TerminationState::AwaitingRecordingReady => "awaiting recording",
            TerminationState::CallingEndpoint => "calling endpoint",
            TerminationState::PlayingAudio => "playing audio",
            TerminationState::Navigated => "navigated",
            TerminationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What asked for the interview to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneSource {
    Button,
    TimerExpired,
}

/// Page navigation, owned by the host.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationRoutes {
    /// After the closing message has played.
    pub success: String,
    /// When the closing message could not be delivered.
    pub fallback: String,
}

/// Everything the controller talks to.
#[derive(Clone)]
pub struct TerminationDeps {
    pub status: Arc<dyn RecordingStatusSource>,
    pub closing: Arc<dyn ClosingMessageSource>,
    pub player: Arc<dyn AudioPlayer>,
    pub navigator: Arc<dyn Navigator>,
}

struct Flow {
    state: watch::Sender<TerminationState>,
    deps: TerminationDeps,
    poll_interval: Duration,
    routes: TerminationRoutes,
    destination: Mutex<Option<String>>,
}

/// Owns the end-of-interview lifecycle for one session.
///
/// Must be triggered from inside a tokio runtime. Dropping the controller
/// cancels a flow still in progress.
pub struct TerminationController {
    flow: Arc<Flow>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for TerminationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminationController")
            .field("state", &self.state())
            .field("poll_interval", &self.flow.poll_interval)
            .finish()
    }
}

impl TerminationController {
    pub fn new(deps: TerminationDeps, poll_interval: Duration, routes: TerminationRoutes) -> Self {
        Self {
            flow: Arc::new(Flow {
                state: watch::Sender::new(TerminationState::Idle),
                deps,
                poll_interval,
                routes,
                destination: Mutex::new(None),
            }),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> TerminationState {
        *self.flow.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TerminationState> {
        self.flow.state.subscribe()
    }

    /// Once true, the done control stays disabled.
    pub fn is_triggered(&self) -> bool {
        self.state() != TerminationState::Idle
    }

    /// Route navigated to, once the flow has finished.
    pub fn destination(&self) -> Option<String> {
        self.flow
            .destination
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Start the sequence. Only the first call does anything; later calls
    /// return `false`.
    pub fn trigger(&self, source: DoneSource) -> bool {
        if !self.flow.advance(TerminationState::AwaitingRecordingReady) {
            debug!(?source, state = %self.state(), "Done ignored, already triggered");
            return false;
        }
        info!(?source, "Interview ending");

        let handle = tokio::spawn(Arc::clone(&self.flow).run());
        if let Ok(mut task) = self.task.lock() {
            *task = Some(handle);
        }
        true
    }

    /// Resolves once the machine reaches `Navigated` or `Failed`.
    pub async fn wait_until_settled(&self) -> TerminationState {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| s.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        }
    }

    /// Tear down: stop the poll timer or playback and never navigate.
    pub fn dispose(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
        if self.flow.advance(TerminationState::Failed) {
            info!("Termination cancelled by teardown");
        }
    }
}

impl Drop for TerminationController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Flow {
    /// Compare-and-set on the state cell.
    fn advance(&self, next: TerminationState) -> bool {
        let mut from = TerminationState::Idle;
        let moved = self.state.send_if_modified(|state| {
            if state.can_advance_to(next) {
                from = *state;
                *state = next;
                true
            } else {
                false
            }
        });
        if moved {
            debug!(%from, to = %next, "termination transition");
        }
        moved
    }

    async fn run(self: Arc<Self>) {
        self.wait_for_recording_ready().await;

        if !self.advance(TerminationState::CallingEndpoint) {
            return;
        }

        let clip = match self.fetch_clip().await {
            Ok(clip) => clip,
            Err(e) => {
                warn!("Error ending interview: {}", e);
                self.finish(&self.routes.fallback);
                return;
            }
        };

        if !self.advance(TerminationState::PlayingAudio) {
            return;
        }

        match self.deps.player.play(&clip).await {
            Ok(()) => self.finish(&self.routes.success),
            Err(e) => {
                warn!("{}", TerminationError::Playback(e));
                self.finish(&self.routes.fallback);
            }
        }
    }

    /// Sample the recorder on a fixed period until it reports ready. The
    /// first sample is taken one period after the trigger.
    async fn wait_for_recording_ready(&self) {
        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let status = self.deps.status.current();
            debug!(%status, "recording status");
            if status.is_ready() {
                return;
            }
        }
    }

    async fn fetch_clip(&self) -> Result<AudioClip, TerminationError> {
        let payload = self.deps.closing.fetch_closing_message().await?;
        Ok(AudioClip::decode(payload)?)
    }

    fn finish(&self, route: &str) {
        if self.state.borrow().is_terminal() {
            return;
        }
        match self.deps.navigator.navigate(route) {
            Ok(()) => {
                if let Ok(mut dest) = self.destination.lock() {
                    *dest = Some(route.to_string());
                }
                self.advance(TerminationState::Navigated);
                info!(route, "Interview finished");
            }
            Err(e) => {
                error!("Navigation to {} failed: {:#}", route, e);
                self.advance(TerminationState::Failed);
            }
        }
    }
}
