//! Panel configuration.
//!
//! Every key is optional; anything missing takes the default below.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::PanelError;
use crate::language::Language;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Origin of the interview server.
    pub api_base: String,
    pub end_path: String,
    /// Cookie sent with the end-of-interview request, e.g. `sid=...`.
    pub session_cookie: Option<String>,
    pub execute_url: String,
    pub request_timeout_secs: u64,

    pub poll_interval_ms: u64,

    pub font_size: u16,
    pub font_min: u16,
    pub font_max: u16,
    pub font_step: u16,

    pub default_language: Language,

    pub success_route: String,
    pub fallback_route: String,

    /// Player command line; the clip path is appended.
    pub player: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            end_path: "/api/end".to_string(),
            session_cookie: None,
            execute_url: "https://emkc.org/api/v2/piston/execute".to_string(),
            request_timeout_secs: 30,
            poll_interval_ms: 500,
            font_size: 14,
            font_min: 12,
            font_max: 20,
            font_step: 2,
            default_language: Language::Cpp,
            success_route: "/demo".to_string(),
            fallback_route: "/".to_string(),
            player: ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PanelConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PanelError> {
        let config: PanelConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, PanelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PanelError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), PanelError> {
        if self.poll_interval_ms == 0 {
            return Err(PanelError::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.font_min > self.font_max {
            return Err(PanelError::InvalidConfig(format!(
                "font_min {} exceeds font_max {}",
                self.font_min, self.font_max
            )));
        }
        if self.font_size < self.font_min || self.font_size > self.font_max {
            return Err(PanelError::InvalidConfig(format!(
                "font_size {} outside {}..={}",
                self.font_size, self.font_min, self.font_max
            )));
        }
        if self.player.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(PanelError::InvalidConfig("player command is empty".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
