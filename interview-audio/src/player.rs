use async_trait::async_trait;
use tracing::{debug, info};

use crate::{AudioClip, AudioError};

/// Something that can play a clip to completion.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Starts playback immediately and resolves at the clip's natural end.
    /// Dropping the future stops playback.
    async fn play(&self, clip: &AudioClip) -> Result<(), AudioError>;
}

/// Plays clips through an external program, e.g.
/// `ffplay -nodisp -autoexit -loglevel quiet <file>`.
///
/// The clip path is appended as the last argument. The player exiting with
/// success is the end-of-playback signal.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// Build from a full command line: program followed by its arguments.
    pub fn from_command(command: &[String]) -> Result<Self, AudioError> {
        let (program, args) = command.split_first().ok_or(AudioError::NoPlayer)?;
        if program.trim().is_empty() {
            return Err(AudioError::NoPlayer);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, clip: &AudioClip) -> Result<(), AudioError> {
        // Held until the player exits; deleted on drop.
        let staged = tempfile::Builder::new()
            .prefix("closing-message-")
            .suffix(&format!(".{}", clip.format().extension()))
            .tempfile()?;
        tokio::fs::write(staged.path(), clip.bytes()).await?;
        debug!(path = ?staged.path(), bytes = clip.len(), "clip staged");

        info!("Playing closing message via {}", self.program);
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(staged.path())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AudioError::PlayerExit(status));
        }

        info!("Closing message finished");
        Ok(())
    }
}
