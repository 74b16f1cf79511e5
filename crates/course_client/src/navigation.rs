use std::fmt;

use shared::domain::{CourseId, LectureId};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    SignUp,
    ForgotPassword,
    EnrolledCourses,
    CourseList,
    LectureViewer(CourseId),
    LectureList(CourseId),
    EditLecture {
        course_id: CourseId,
        lecture_id: LectureId,
    },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::SignUp => "/signup".to_string(),
            Self::ForgotPassword => "/forgotpassword".to_string(),
            Self::EnrolledCourses => "/enrolledcourses".to_string(),
            Self::CourseList => "/courses".to_string(),
            Self::LectureViewer(course_id) => format!("/viewlecture/{course_id}"),
            Self::LectureList(course_id) => format!("/createlecture/{course_id}"),
            Self::EditLecture {
                course_id,
                lecture_id,
            } => format!("/editlecture/{course_id}/{lecture_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug)]
pub struct Navigator {
    tx: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }

    /// User-initiated navigation; always applies.
    pub fn navigate(&self, target: Route) {
        self.tx.send_replace(target);
    }

    /// Navigation requested by a flow that started on `origin`.
    ///
    /// Applies only while `origin` is still showing, so a response arriving
    /// after the user moved to another screen cannot yank them away from it.
    /// Returns whether the navigation happened.
    pub fn navigate_from(&self, origin: &Route, target: Route) -> bool {
        let moved = self.tx.send_if_modified(|current| {
            if current == origin {
                *current = target.clone();
                true
            } else {
                false
            }
        });
        if !moved {
            debug!(
                "navigation: dropped stale redirect origin={origin} target={target} current={}",
                self.current()
            );
        }
        moved
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}
