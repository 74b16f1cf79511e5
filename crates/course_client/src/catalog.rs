use shared::domain::{CourseId, UserProfile};

use crate::navigation::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    pub course_id: CourseId,
    pub title: String,
    pub category: String,
    pub level: String,
    pub thumbnail: String,
    /// Where "Watch Now" leads.
    pub watch: Route,
}

/// What the enrolled-courses screen shows for a given profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// No profile has been applied yet.
    Loading,
    Empty,
    Courses(Vec<CourseCard>),
}

impl CatalogView {
    pub const LOADING_TEXT: &'static str = "Loading your courses...";
    pub const EMPTY_TEXT: &'static str = "You haven't enrolled in any course yet.";

    pub fn project(profile: &UserProfile) -> Self {
        if !profile.is_signed_in() {
            return Self::Loading;
        }
        if profile.enrolled_courses.is_empty() {
            return Self::Empty;
        }
        Self::Courses(
            profile
                .enrolled_courses
                .iter()
                .map(|course| CourseCard {
                    course_id: course.id.clone(),
                    title: course.title.clone(),
                    category: course.category.clone(),
                    level: course.level.clone(),
                    thumbnail: course.thumbnail.clone(),
                    watch: Route::LectureViewer(course.id.clone()),
                })
                .collect(),
        )
    }

    pub fn cards(&self) -> &[CourseCard] {
        match self {
            Self::Courses(cards) => cards,
            Self::Loading | Self::Empty => &[],
        }
    }
}
