use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::RemoteError;

const SERVICE: &str = "code runner";

/// Shown in the output pane whenever the runner cannot be reached or
/// answers with something we cannot read.
pub const TRANSPORT_ERROR_TEXT: &str = "Error compiling code. Please check API or code format.";

/// What came back from one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub transport_error: bool,
}

impl ExecutionResult {
    pub fn transport_failure() -> Self {
        Self {
            stdout: None,
            stderr: Some(TRANSPORT_ERROR_TEXT.to_string()),
            transport_error: true,
        }
    }

    /// The text to render: stdout when it has anything in it, else stderr.
    pub fn output(&self) -> &str {
        match self.stdout.as_deref() {
            Some(out) if !out.is_empty() => out,
            _ => self.stderr.as_deref().unwrap_or(""),
        }
    }
}

/// Any service that can run a single source file.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Single attempt, no retry. Never fails: transport and parse problems
    /// come back as [`ExecutionResult::transport_failure`].
    async fn submit(&self, language: &str, source: &str) -> ExecutionResult;
}

/// Map the editor's language id to the runner's. Unknown ids run as
/// javascript.
pub fn piston_language(language: &str) -> &'static str {
    match language {
        "javascript" => "javascript",
        "python" => "python3",
        "cpp" => "cpp",
        "java" => "java",
        _ => "javascript",
    }
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    run: Option<PistonStage>,
    compile: Option<PistonStage>,
}

#[derive(Debug, Deserialize)]
struct PistonStage {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    code: Option<i32>,
}

/// Turn a runner response body into an [`ExecutionResult`].
///
/// A failed compile stage only matters when the run stage printed nothing,
/// which is how the runner reports a program that never started.
pub fn parse_response(body: &str) -> Result<ExecutionResult, RemoteError> {
    let parsed: PistonResponse = serde_json::from_str(body).map_err(|e| RemoteError::Parse {
        service: SERVICE,
        reason: e.to_string(),
    })?;

    let run = parsed.run.ok_or_else(|| RemoteError::Parse {
        service: SERVICE,
        reason: "missing run stage".to_string(),
    })?;

    let mut result = ExecutionResult {
        stdout: run.stdout,
        stderr: run.stderr,
        transport_error: false,
    };

    if result.output().is_empty() {
        if let Some(compile) = parsed.compile {
            if compile.code.unwrap_or(0) != 0 {
                result.stderr = compile.stderr;
            }
        }
    }

    Ok(result)
}

/// Client for a Piston-compatible execution API.
pub struct PistonClient {
    http: Client,
    url: String,
}

impl std::fmt::Debug for PistonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PistonClient").field("url", &self.url).finish()
    }
}

impl PistonClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::transport(SERVICE, e))?;
        Ok(Self::with_http(http, url))
    }

    /// Use a preconfigured reqwest client (proxy settings, test servers).
    pub fn with_http(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    async fn try_submit(&self, language: &str, source: &str) -> Result<ExecutionResult, RemoteError> {
        let remote_language = piston_language(language);
        debug!(language, remote_language, bytes = source.len(), "submitting code");

        let body = json!({
            "language": remote_language,
            "version": "*",
            "files": [{ "content": source }],
            "stdin": "",
        });

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::transport(SERVICE, e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RemoteError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(RemoteError::status(SERVICE, status, &text));
        }

        parse_response(&text)
    }
}

#[async_trait]
impl ExecutionBackend for PistonClient {
    async fn submit(&self, language: &str, source: &str) -> ExecutionResult {
        match self.try_submit(language, source).await {
            Ok(result) => result,
            Err(e) => {
                error!("Compilation error: {}", e);
                ExecutionResult::transport_failure()
            }
        }
    }
}
