use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, COOKIE};
use serde_json::json;
use std::time::Duration;
use tracing::info;

use crate::error::RemoteError;

const SERVICE: &str = "end-of-interview endpoint";

/// Source of the closing message played when the interview ends.
#[async_trait]
pub trait ClosingMessageSource: Send + Sync {
    /// One request, raw audio bytes back. Any non-2xx is an error.
    async fn fetch_closing_message(&self) -> Result<Bytes, RemoteError>;
}

/// POSTs to the interview server's end route, carrying the session cookie.
pub struct HttpClosingEndpoint {
    http: Client,
    url: String,
    session_cookie: Option<String>,
}

impl std::fmt::Debug for HttpClosingEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The cookie is a credential; never print it.
        f.debug_struct("HttpClosingEndpoint")
            .field("url", &self.url)
            .field("has_session", &self.session_cookie.is_some())
            .finish()
    }
}

impl HttpClosingEndpoint {
    pub fn new(
        api_base: &str,
        end_path: &str,
        session_cookie: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::transport(SERVICE, e))?;
        Ok(Self::with_http(http, api_base, end_path, session_cookie))
    }

    pub fn with_http(
        http: Client,
        api_base: &str,
        end_path: &str,
        session_cookie: Option<String>,
    ) -> Self {
        let url = format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            end_path.trim_start_matches('/')
        );
        Self {
            http,
            url,
            session_cookie,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ClosingMessageSource for HttpClosingEndpoint {
    async fn fetch_closing_message(&self) -> Result<Bytes, RemoteError> {
        let mut req = self
            .http
            .post(&self.url)
            .header(ACCEPT, "audio/mpeg")
            .json(&json!({}));
        if let Some(cookie) = &self.session_cookie {
            req = req.header(COOKIE, cookie);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::transport(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RemoteError::status(SERVICE, status, &text));
        }

        let audio = resp
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(SERVICE, e))?;
        info!(bytes = audio.len(), "closing message received");
        Ok(audio)
    }
}
