use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Lecture, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSignupRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Short-lived authorization for a direct upload to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
}

impl UploadSignature {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLectureRequest {
    pub lecture_title: String,
    pub is_preview_free: bool,
    /// Left out of the body when no new video was uploaded so the backend
    /// keeps the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// Body of a successful edit. Older backends answer with the bare lecture
/// array, newer ones wrap it together with a status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditLectureResponse {
    Lectures(Vec<Lecture>),
    Envelope {
        lectures: Vec<Lecture>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl EditLectureResponse {
    pub fn into_parts(self) -> (Vec<Lecture>, Option<String>) {
        match self {
            Self::Lectures(lectures) => (lectures, None),
            Self::Envelope { lectures, message } => (lectures, message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of the object-storage upload endpoint; only the durable URL is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    pub secure_url: String,
}
