//! Interview shell library target.
//!
//! Exposes the shell's modules for integration tests. The binary entry
//! point is in `main.rs`.

pub mod commands;
pub mod config;
pub mod navigator;
pub mod recorder;
pub mod runs;
pub mod util;
