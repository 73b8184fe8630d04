pub mod annotate;
pub mod config;
pub mod error;
pub mod language;
pub mod panel;
pub mod recording;
pub mod session;
pub mod termination;

// Re-export the main struct so users can just use `interview_core::EditorPanel`
pub use panel::{EditorPanel, PanelCollaborators, PendingRun, RUNNING_PLACEHOLDER};

pub use annotate::{AnnotatedFragment, AnnotatedLine, Document, SelectionRange, annotate};
pub use config::PanelConfig;
pub use error::{PanelError, TerminationError};
pub use language::Language;
pub use recording::{RecordingControl, RecordingStatus, RecordingStatusSource};
pub use session::SharedSession;
pub use termination::{
    DoneSource, Navigator, TerminationController, TerminationDeps, TerminationRoutes,
    TerminationState,
};
