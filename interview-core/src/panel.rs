//! The editor panel: composition root for the interview's code pane.
//!
//! Holds the editor state, republishes the code and the annotated selection
//! for the transcription side, runs code, and owns the end-of-interview
//! controller.

use interview_audio::AudioPlayer;
use interview_remote::{ClosingMessageSource, ExecutionBackend, ExecutionResult};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::annotate::{Document, SelectionRange, annotate};
use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::language::Language;
use crate::recording::{RecordingControl, RecordingStatusSource};
use crate::session::SharedSession;
use crate::termination::{
    DoneSource, Navigator, TerminationController, TerminationDeps, TerminationRoutes,
    TerminationState,
};

/// Shown in the output pane until the runner answers.
pub const RUNNING_PLACEHOLDER: &str = "Running...";

/// A submitted run, detached from the panel that started it.
pub type PendingRun = Pin<Box<dyn Future<Output = ExecutionResult> + Send>>;

/// External collaborators the panel is wired to.
#[derive(Clone)]
pub struct PanelCollaborators {
    pub executor: Arc<dyn ExecutionBackend>,
    pub recorder: Arc<dyn RecordingControl>,
    pub status: Arc<dyn RecordingStatusSource>,
    pub closing: Arc<dyn ClosingMessageSource>,
    pub player: Arc<dyn AudioPlayer>,
    pub navigator: Arc<dyn Navigator>,
}

pub struct EditorPanel {
    config: PanelConfig,
    document: Document,
    selection: SelectionRange,
    language: Language,
    font_size: u16,
    session: Arc<SharedSession>,
    executor: Arc<dyn ExecutionBackend>,
    recorder: Arc<dyn RecordingControl>,
    termination: TerminationController,
}

impl std::fmt::Debug for EditorPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorPanel")
            .field("language", &self.language)
            .field("font_size", &self.font_size)
            .field("lines", &self.document.line_count())
            .field("selection", &self.selection)
            .field("termination", &self.termination.state())
            .finish()
    }
}

impl EditorPanel {
    pub fn new(config: PanelConfig, collaborators: PanelCollaborators) -> Self {
        let termination = TerminationController::new(
            TerminationDeps {
                status: collaborators.status,
                closing: collaborators.closing,
                player: collaborators.player,
                navigator: collaborators.navigator,
            },
            config.poll_interval(),
            TerminationRoutes {
                success: config.success_route.clone(),
                fallback: config.fallback_route.clone(),
            },
        );

        Self {
            language: config.default_language,
            font_size: config.font_size,
            document: Document::default(),
            selection: SelectionRange::default(),
            session: Arc::new(SharedSession::default()),
            executor: collaborators.executor,
            recorder: collaborators.recorder,
            termination,
            config,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn termination(&self) -> &TerminationController {
        &self.termination
    }

    // ── Editor content ─────────────────────────────────────────────

    pub fn code(&self) -> String {
        self.session.code()
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// An edit from the widget: new text plus wherever the selection ended
    /// up. The annotation is recomputed because offsets may have shifted.
    /// A range that does not fit the new text rejects the whole edit.
    pub fn apply_edit(&mut self, text: &str, selection: SelectionRange) -> Result<(), PanelError> {
        let document = Document::from_text(text);
        annotate(&document, selection)?;
        self.document = document;
        self.session.publish_code(self.document.text());
        self.selection = selection;
        self.refresh_highlight();
        Ok(())
    }

    /// Replace the whole buffer, keeping the selection inside the new text.
    pub fn set_code(&mut self, text: &str) {
        let document = Document::from_text(text);
        let selection = self.selection.clamp(document.len());
        self.document = document;
        self.session.publish_code(self.document.text());
        self.selection = selection;
        self.refresh_highlight();
    }

    /// Any widget update: selection moved, text changed, or both.
    pub fn on_update(&mut self, selection: SelectionRange) -> Result<(), PanelError> {
        // Validate before touching state so a bad range leaves the old one.
        annotate(&self.document, selection)?;
        self.selection = selection;
        self.refresh_highlight();
        Ok(())
    }

    pub fn highlighted(&self) -> String {
        self.session.highlighted()
    }

    fn refresh_highlight(&self) {
        match annotate(&self.document, self.selection) {
            Ok(fragment) => {
                debug!(lines = fragment.lines.len(), "selection annotated");
                self.session.publish_highlighted(fragment.to_string());
            }
            Err(e) => warn!("Selection annotation skipped: {}", e),
        }
    }

    // ── Language & font ────────────────────────────────────────────

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        info!(language = language.id(), "language changed");
        self.language = language;
    }

    pub fn syntax_mode(&self) -> &'static str {
        self.language.syntax_mode()
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn increase_font_size(&mut self) -> u16 {
        self.font_size = self
            .font_size
            .saturating_add(self.config.font_step)
            .min(self.config.font_max);
        self.font_size
    }

    pub fn decrease_font_size(&mut self) -> u16 {
        self.font_size = self
            .font_size
            .saturating_sub(self.config.font_step)
            .max(self.config.font_min);
        self.font_size
    }

    // ── Run ────────────────────────────────────────────────────────

    pub fn output(&self) -> String {
        self.session.output()
    }

    /// Submit the current code. The placeholder is published before the
    /// request goes out; failures end up as output text, never as errors.
    pub async fn run_code(&self) -> ExecutionResult {
        self.start_run().await
    }

    /// Publish the placeholder now and hand back the request, which holds
    /// no borrow of the panel. Edits made while it is pending do not change
    /// what was submitted.
    pub fn start_run(&self) -> PendingRun {
        self.session.publish_output(RUNNING_PLACEHOLDER.to_string());

        let executor = Arc::clone(&self.executor);
        let session = Arc::clone(&self.session);
        let language = self.language;
        let source = self.session.code();
        Box::pin(async move {
            let result = executor.submit(language.id(), &source).await;
            if result.transport_error {
                warn!("Code execution did not reach the runner");
            }
            session.publish_output(result.output().to_string());
            result
        })
    }

    // ── Recording pass-through ─────────────────────────────────────

    pub fn start_recording(&self) {
        self.recorder.start_recording();
    }

    pub fn stop_recording(&self) {
        self.recorder.stop_recording();
    }

    // ── Done interview ─────────────────────────────────────────────

    /// Whether the done control accepts input.
    pub fn is_done_enabled(&self) -> bool {
        !self.termination.is_triggered()
    }

    pub fn done_interview(&self, source: DoneSource) -> bool {
        self.termination.trigger(source)
    }

    pub fn termination_state(&self) -> TerminationState {
        self.termination.state()
    }

    /// Release timers and playback tied to this session.
    pub fn dispose(&self) {
        self.termination.dispose();
    }
}
