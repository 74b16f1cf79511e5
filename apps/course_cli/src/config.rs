use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use course_client::config::{
    ClientConfig, DEFAULT_MEDIA_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_URL,
    DEFAULT_UPLOAD_CHUNK_SIZE,
};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "course.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub media_url: String,
    pub request_timeout_seconds: u64,
    pub upload_chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            media_url: DEFAULT_MEDIA_URL.into(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    media_url: Option<String>,
    request_timeout_seconds: Option<u64>,
    upload_chunk_size: Option<usize>,
}

impl Settings {
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig::new(&self.server_url, &self.media_url)
            .context("invalid client url settings")?
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
            .with_upload_chunk_size(self.upload_chunk_size)?;
        Ok(config)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file (if present), then environment variables.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.server_url {
            settings.server_url = v;
        }
        if let Some(v) = file_cfg.media_url {
            settings.media_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_seconds {
            settings.request_timeout_seconds = v;
        }
        if let Some(v) = file_cfg.upload_chunk_size {
            settings.upload_chunk_size = v;
        }
    }

    if let Some(v) = env("COURSE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("COURSE_MEDIA_URL") {
        settings.media_url = v;
    }
    if let Some(v) = env("APP__MEDIA_URL") {
        settings.media_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
