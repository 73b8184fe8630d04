use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to a remote collaborator.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to contact {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {snippet}")]
    Status {
        service: &'static str,
        status: StatusCode,
        snippet: String,
    },

    #[error("unreadable {service} response: {reason}")]
    Parse {
        service: &'static str,
        reason: String,
    },
}

impl RemoteError {
    pub(crate) fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    /// Keep at most 200 bytes of an error body, cut on a char boundary.
    pub(crate) fn status(service: &'static str, status: StatusCode, body: &str) -> Self {
        let mut end = body.len().min(200);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        Self::Status {
            service,
            status,
            snippet: body[..end].to_string(),
        }
    }
}
