use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_MEDIA_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Media bodies are streamed in chunks of this size so upload progress can be reported.
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 256 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} url '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{field} url '{value}' must use http or https")]
    UnsupportedScheme { field: &'static str, value: String },
    #[error("upload chunk size must be greater than zero")]
    ZeroChunkSize,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub media_url: Url,
    pub request_timeout: Duration,
    pub upload_chunk_size: usize,
}

impl ClientConfig {
    pub fn new(server_url: &str, media_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: parse_base_url("server", server_url)?,
            media_url: parse_base_url("media", media_url)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_upload_chunk_size(mut self, chunk_size: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        self.upload_chunk_size = chunk_size;
        Ok(self)
    }

    /// Absolute backend URL for `path` (which starts with `/api/`).
    pub fn api_url(&self, path: &str) -> String {
        join(&self.server_url, path)
    }

    pub fn media_upload_url(&self, cloud_name: &str) -> String {
        join(&self.media_url, &format!("/v1_1/{cloud_name}/video/upload"))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid"),
            media_url: Url::parse(DEFAULT_MEDIA_URL).expect("default media url is valid"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }
}

fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            field,
            value: raw.to_string(),
        });
    }
    Ok(url)
}

fn join(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}
