use std::sync::Arc;

use shared::domain::{Lecture, UserProfile};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

pub mod auth_flow;
pub mod busy;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod lecture_flow;
pub mod media;
pub mod navigation;
pub mod store;
pub mod transport;

pub use busy::BusyFlag;
pub use catalog::{CatalogView, CourseCard};
pub use config::ClientConfig;
pub use error::{FlowError, RemoteError, UploadError};
pub use identity::{IdentityProvider, ProviderIdentity, StaticIdentityProvider};
pub use lecture_flow::{LectureEdit, LectureStage};
pub use media::{CloudinaryStorage, MediaFile, MediaStorage, UploadProgress};
pub use navigation::{Navigator, Route};
pub use store::{LectureStore, UserStore};
pub use transport::ApiClient;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Which half of the sign-in merge produced a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePhase {
    /// Whatever the auth endpoint returned; may lack enrolled courses.
    Partial,
    /// The current-user fetch that follows; overwrites the partial value.
    Complete,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notice(Notice),
    Navigated(Route),
    ProfileApplied {
        phase: ProfilePhase,
        profile: UserProfile,
    },
    SignedOut,
    LecturesReplaced(Vec<Lecture>),
}

/// Client-side hub: backend access, the two stores, the navigator, and the
/// busy flags the submission flows hold while in flight.
///
/// The flows themselves live in [`auth_flow`] and [`lecture_flow`].
pub struct CourseClient {
    api: ApiClient,
    media: Arc<dyn MediaStorage>,
    users: UserStore,
    lectures: LectureStore,
    navigator: Navigator,
    login_busy: BusyFlag,
    update_busy: BusyFlag,
    remove_busy: BusyFlag,
    lecture_stage: watch::Sender<LectureStage>,
    upload_progress: Arc<watch::Sender<UploadProgress>>,
    events: broadcast::Sender<ClientEvent>,
}

impl CourseClient {
    pub fn new(config: ClientConfig) -> Result<Arc<Self>, reqwest::Error> {
        let api = ApiClient::new(config)?;
        let media = Arc::new(CloudinaryStorage::from_api(&api));
        Ok(Self::new_with_dependencies(api, media))
    }

    pub fn new_with_dependencies(api: ApiClient, media: Arc<dyn MediaStorage>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (lecture_stage, _) = watch::channel(LectureStage::Idle);
        let (upload_progress, _) = watch::channel(UploadProgress::default());
        Arc::new(Self {
            api,
            media,
            users: UserStore::new(),
            lectures: LectureStore::new(),
            navigator: Navigator::default(),
            login_busy: BusyFlag::new("login"),
            update_busy: BusyFlag::new("lecture update"),
            remove_busy: BusyFlag::new("lecture removal"),
            lecture_stage,
            upload_progress: Arc::new(upload_progress),
            events,
        })
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn lectures(&self) -> &LectureStore {
        &self.lectures
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn login_busy(&self) -> &BusyFlag {
        &self.login_busy
    }

    pub fn update_busy(&self) -> &BusyFlag {
        &self.update_busy
    }

    pub fn remove_busy(&self) -> &BusyFlag {
        &self.remove_busy
    }

    pub fn lecture_stage(&self) -> watch::Receiver<LectureStage> {
        self.lecture_stage.subscribe()
    }

    pub fn upload_progress(&self) -> watch::Receiver<UploadProgress> {
        self.upload_progress.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> CatalogView {
        self.users.select(CatalogView::project)
    }

    fn begin<'a>(&self, flag: &'a BusyFlag) -> Result<busy::BusyGuard<'a>, FlowError> {
        flag.try_begin().ok_or_else(|| {
            debug!("flow: rejected re-entry while {} is running", flag.name());
            FlowError::AlreadyRunning(flag.name())
        })
    }

    fn emit(&self, event: ClientEvent) {
        // Nobody listening (e.g. the screen was closed) is fine.
        let _ = self.events.send(event);
    }

    fn notify(&self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            warn!("notice: {}", notice.message);
        }
        self.emit(ClientEvent::Notice(notice));
    }

    fn redirect(&self, origin: &Route, target: Route) {
        if self.navigator.navigate_from(origin, target.clone()) {
            self.emit(ClientEvent::Navigated(target));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
