use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// A backend call that did not produce a usable 2xx response.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("server rejected request with status {status}: {}", .api.message_or("no message"))]
    Status { status: u16, api: ApiError },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { api, .. } => api.message.as_deref(),
            Self::Transport(_) => None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Status { api, .. } => Some(api.code),
            Self::Transport(_) => None,
        }
    }
}

/// Failure of the direct-to-storage media upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload authorization failed: {0}")]
    Authorization(#[source] RemoteError),
    #[error("media storage rejected upload with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    #[error("media upload failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to read media file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: RemoteError,
    },
    #[error("{message}")]
    Upload {
        message: String,
        #[source]
        source: UploadError,
    },
    #[error("{message}")]
    IdentityProvider {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{0} is already in progress")]
    AlreadyRunning(&'static str),
}

impl FlowError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps `source`, preferring the server-provided message over `fallback`.
    pub(crate) fn remote(source: RemoteError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        Self::Remote { message, source }
    }

    pub(crate) fn identity_provider(source: anyhow::Error, fallback: &str) -> Self {
        Self::IdentityProvider {
            message: fallback.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn upload(source: UploadError, fallback: &str) -> Self {
        let message = match &source {
            UploadError::Authorization(remote) => remote.server_message(),
            UploadError::Rejected { message, .. } => message.as_deref(),
            UploadError::Transport(_) | UploadError::Io(_) => None,
        }
        .unwrap_or(fallback)
        .to_string();
        Self::Upload { message, source }
    }

    /// The human-readable text shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
