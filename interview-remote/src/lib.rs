//! # Interview Remote
//!
//! The two network collaborators of the interview panel:
//! - the public code runner the Run button submits to
//! - the end-of-interview route that answers with the closing message audio
//!
//! Both are reached through a trait so the panel and its tests can swap in
//! scripted backends.

pub mod closing;
pub mod error;
pub mod execution;

pub use closing::{ClosingMessageSource, HttpClosingEndpoint};
pub use error::RemoteError;
pub use execution::{
    ExecutionBackend, ExecutionResult, PistonClient, TRANSPORT_ERROR_TEXT, piston_language,
};
pub use reqwest::StatusCode;
