use shared::domain::{Lecture, LectureId, UserProfile};
use tokio::sync::watch;

#[derive(Debug)]
pub struct UserStore {
    tx: watch::Sender<UserProfile>,
}

impl UserStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(UserProfile::empty());
        Self { tx }
    }

    pub fn snapshot(&self) -> UserProfile {
        self.tx.borrow().clone()
    }

    /// Runs `select` against the current profile without cloning it.
    pub fn select<R>(&self, select: impl FnOnce(&UserProfile) -> R) -> R {
        select(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<UserProfile> {
        self.tx.subscribe()
    }

    pub(crate) fn replace(&self, profile: UserProfile) -> UserProfile {
        self.tx.send_replace(profile)
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(UserProfile::empty());
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct LectureStore {
    tx: watch::Sender<Vec<Lecture>>,
}

impl LectureStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { tx }
    }

    pub fn snapshot(&self) -> Vec<Lecture> {
        self.tx.borrow().clone()
    }

    pub fn find(&self, lecture_id: &LectureId) -> Option<Lecture> {
        self.tx
            .borrow()
            .iter()
            .find(|lecture| &lecture.id == lecture_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Lecture>> {
        self.tx.subscribe()
    }

    /// Loads the lectures of the course being edited, e.g. from a course
    /// detail screen that fetched them before opening the editor.
    pub fn load(&self, lectures: Vec<Lecture>) {
        self.tx.send_replace(lectures);
    }

    pub(crate) fn replace(&self, lectures: Vec<Lecture>) {
        self.tx.send_replace(lectures);
    }
}

impl Default for LectureStore {
    fn default() -> Self {
        Self::new()
    }
}
