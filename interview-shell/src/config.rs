//! Config discovery: `--config <path>`, then `$INTERVIEW_PANEL_CONFIG`,
//! then `<config dir>/config.json`, then built-in defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use interview_core::PanelConfig;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "INTERVIEW_PANEL_CONFIG";
pub const API_BASE_ENV: &str = "INTERVIEW_API_BASE";
pub const SESSION_COOKIE_ENV: &str = "INTERVIEW_SESSION_COOKIE";

/// Command-line options.
#[derive(Debug, Default, PartialEq)]
pub struct ShellArgs {
    pub config: Option<PathBuf>,
    /// Seconds until the interview ends on its own.
    pub time_limit: Option<u64>,
}

impl ShellArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = ShellArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--time-limit" => {
                    let secs = args.next().context("--time-limit needs seconds")?;
                    parsed.time_limit = Some(
                        secs.parse()
                            .with_context(|| format!("bad --time-limit '{}'", secs))?,
                    );
                }
                other => anyhow::bail!("unexpected argument '{}'", other),
            }
        }
        Ok(parsed)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "interview-panel").map(|dirs| dirs.config_dir().join("config.json"))
}

/// Pick the config file to read, if any. An explicit path always wins and
/// must exist; the default location is used only when present.
pub fn resolve_config_path(args: &ShellArgs, env_path: Option<String>) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|p| p.exists())
}

/// Apply environment overrides on top of a loaded config.
pub fn apply_env_overrides(
    config: &mut PanelConfig,
    api_base: Option<String>,
    session_cookie: Option<String>,
) {
    if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
        config.api_base = base;
    }
    if let Some(cookie) = session_cookie.filter(|c| !c.trim().is_empty()) {
        config.session_cookie = Some(cookie);
    }
}

pub fn load(args: &ShellArgs) -> Result<PanelConfig> {
    let mut config = match resolve_config_path(args, std::env::var(CONFIG_ENV).ok()) {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            PanelConfig::load_from(&path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => PanelConfig::default(),
    };

    apply_env_overrides(
        &mut config,
        std::env::var(API_BASE_ENV).ok(),
        std::env::var(SESSION_COOKIE_ENV).ok(),
    );
    config.validate()?;
    Ok(config)
}
