use std::{
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::{
    multipart::{Form, Part},
    Body, Client,
};
use serde::Deserialize;
use shared::protocol::{MediaUploadResponse, UploadSignature};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{config::ClientConfig, error::UploadError, transport::ApiClient};

const UPLOAD_FOLDER: &str = "courses";
const RESOURCE_TYPE: &str = "video";

/// A media file picked by the user, held in memory until the upload finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            mime_type,
            contents,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        Ok(Self::new(file_name, contents))
    }

    pub fn len(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.sent as f64 / self.total as f64).min(1.0)
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Uploads `media` under `authorization` and returns its durable URL.
    async fn upload_video(
        &self,
        authorization: &UploadSignature,
        media: MediaFile,
        progress: Arc<watch::Sender<UploadProgress>>,
    ) -> Result<String, UploadError>;
}

#[derive(Debug, Default, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    error: Option<StorageErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct StorageErrorDetail {
    message: String,
}

/// Signed multipart uploads to a Cloudinary-compatible endpoint.
pub struct CloudinaryStorage {
    http: Client,
    config: ClientConfig,
}

impl CloudinaryStorage {
    pub fn new(http: Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn from_api(api: &ApiClient) -> Self {
        Self::new(api.http().clone(), api.config().clone())
    }
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload_video(
        &self,
        authorization: &UploadSignature,
        media: MediaFile,
        progress: Arc<watch::Sender<UploadProgress>>,
    ) -> Result<String, UploadError> {
        let total = media.len();
        progress.send_replace(UploadProgress { sent: 0, total });

        let contents = Bytes::from(media.contents);
        let chunk_size = self.config.upload_chunk_size.max(1);
        let sent = Arc::new(AtomicU64::new(0));
        let body_progress = Arc::clone(&progress);
        let body = stream::iter((0..contents.len()).step_by(chunk_size).map(move |start| {
            let chunk = contents.slice(start..(start + chunk_size).min(contents.len()));
            let sent = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
            body_progress.send_replace(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        }));

        let file = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(media.file_name.clone())
            .mime_str(&media.mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("api_key", authorization.api_key.clone())
            .text("timestamp", authorization.timestamp.to_string())
            .text("signature", authorization.signature.clone())
            .text("folder", UPLOAD_FOLDER)
            .text("resource_type", RESOURCE_TYPE);

        let url = self.config.media_upload_url(&authorization.cloud_name);
        debug!(
            "media: uploading file={} bytes={} issued_at={:?} url={url}",
            media.file_name,
            total,
            authorization.issued_at()
        );
        let res = self.http.post(url).multipart(form).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<StorageErrorBody>(&body)
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: MediaUploadResponse = res.json().await?;
        progress.send_replace(UploadProgress { sent: total, total });
        info!("media: upload complete file={} bytes={total}", media.file_name);
        Ok(body.secure_url)
    }
}
