use std::fmt::Write as _;

use course_client::{CatalogView, ClientEvent, FlowError, NoticeLevel, RemoteError, UploadError};
use shared::{
    domain::{Lecture, Role, UserProfile},
    error::ErrorCode,
};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Transport,
    Validation,
    Upload,
    Unknown,
}

impl ErrorCategory {
    pub fn classify(err: &FlowError) -> Self {
        match err {
            FlowError::Validation(_) => Self::Validation,
            FlowError::Remote { source, .. } => classify_remote(source),
            FlowError::Upload {
                source: UploadError::Authorization(remote),
                ..
            } => classify_remote(remote),
            FlowError::Upload { .. } => Self::Upload,
            FlowError::IdentityProvider { .. } => Self::Auth,
            FlowError::AlreadyRunning(_) => Self::Unknown,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Self::Unknown => 1,
            Self::Validation => 2,
            Self::Auth => 3,
            Self::Transport => 4,
            Self::Upload => 5,
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Auth => "check credentials and sign in again",
            Self::Transport => "server unreachable; check URL/network and retry",
            Self::Validation => "fix the highlighted input and retry",
            Self::Upload => "media storage rejected the upload; retry with a new signature",
            Self::Unknown => "request failed",
        }
    }
}

fn classify_remote(err: &RemoteError) -> ErrorCategory {
    match err.code() {
        Some(ErrorCode::Unauthorized | ErrorCode::Forbidden) => ErrorCategory::Auth,
        Some(ErrorCode::Validation) => ErrorCategory::Validation,
        Some(ErrorCode::NotFound | ErrorCode::RateLimited | ErrorCode::Internal) => {
            ErrorCategory::Unknown
        }
        None => ErrorCategory::Transport,
    }
}

pub fn render_profile(profile: &UserProfile) -> String {
    let role = role_label(profile.role);
    format!(
        "signed in as {} <{}> id={} role={}",
        if profile.name.is_empty() { "-" } else { profile.name.as_str() },
        profile.email,
        profile.id,
        role
    )
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Unset => "unset",
        Role::Student => "student",
        Role::Educator => "educator",
    }
}

pub fn render_catalog(view: &CatalogView) -> String {
    match view {
        CatalogView::Loading => CatalogView::LOADING_TEXT.to_string(),
        CatalogView::Empty => CatalogView::EMPTY_TEXT.to_string(),
        CatalogView::Courses(cards) => {
            let mut out = String::from("My Enrolled Courses\n");
            for card in cards {
                let _ = writeln!(
                    out,
                    "  {} [{}] {} / {} -> {}",
                    card.title, card.course_id, card.category, card.level, card.watch
                );
            }
            out.trim_end().to_string()
        }
    }
}

pub fn render_lectures(lectures: &[Lecture]) -> String {
    let mut out = format!("{} lecture(s)", lectures.len());
    for lecture in lectures {
        let _ = write!(
            out,
            "\n  {} [{}]{}{}",
            lecture.lecture_title,
            lecture.id,
            if lecture.is_preview_free { " free" } else { "" },
            lecture
                .video_url
                .as_deref()
                .map(|url| format!(" video={url}"))
                .unwrap_or_default()
        );
    }
    out
}

/// Prints every notice queued on `events` without waiting for more.
pub fn print_notices(events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::Notice(notice) = event {
            match notice.level {
                NoticeLevel::Success => println!("ok: {}", notice.message),
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
            }
        }
    }
}
