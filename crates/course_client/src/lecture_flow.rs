use std::sync::Arc;

use shared::{
    domain::{CourseId, Lecture, LectureId},
    protocol::EditLectureRequest,
};
use tracing::info;

use crate::{
    error::{FlowError, UploadError},
    media::MediaFile,
    navigation::Route,
    ClientEvent, CourseClient, Notice,
};

pub const TITLE_REQUIRED: &str = "Lecture title required";
pub const UPDATE_FAILED: &str = "Upload failed";
pub const UPDATE_SUCCEEDED: &str = "Lecture Updated";
pub const REMOVE_FAILED: &str = "Lecture remove error";
pub const REMOVE_SUCCEEDED: &str = "Lecture Removed";

/// `ValidatingInput -> [UploadingMedia] -> SubmittingMetadata -> Applied | Failed`;
/// uploading only happens when a new video was chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LectureStage {
    #[default]
    Idle,
    ValidatingInput,
    UploadingMedia,
    SubmittingMetadata,
    Applied,
    Failed,
}

/// Form state of the lecture editor at the moment "Update" is pressed.
#[derive(Debug, Clone)]
pub struct LectureEdit {
    pub course_id: CourseId,
    pub lecture_id: LectureId,
    pub title: String,
    pub is_preview_free: bool,
    /// Newly chosen video; `None` keeps the current one.
    pub video: Option<MediaFile>,
}

impl LectureEdit {
    pub fn new(course_id: CourseId, lecture_id: LectureId, title: impl Into<String>) -> Self {
        Self {
            course_id,
            lecture_id,
            title: title.into(),
            is_preview_free: false,
            video: None,
        }
    }

    /// Seeds the form from the lecture as currently held in the store.
    pub fn prefilled_from(course_id: CourseId, lecture: &Lecture) -> Self {
        Self {
            is_preview_free: lecture.is_preview_free,
            ..Self::new(course_id, lecture.id.clone(), lecture.lecture_title.clone())
        }
    }

    pub fn preview_free(mut self, is_preview_free: bool) -> Self {
        self.is_preview_free = is_preview_free;
        self
    }

    pub fn with_video(mut self, video: MediaFile) -> Self {
        self.video = Some(video);
        self
    }
}

enum Step {
    ValidatingInput(LectureEdit),
    UploadingMedia {
        edit: LectureEdit,
        video: MediaFile,
    },
    SubmittingMetadata {
        edit: LectureEdit,
        video_url: Option<String>,
    },
}

impl Step {
    fn stage(&self) -> LectureStage {
        match self {
            Self::ValidatingInput(_) => LectureStage::ValidatingInput,
            Self::UploadingMedia { .. } => LectureStage::UploadingMedia,
            Self::SubmittingMetadata { .. } => LectureStage::SubmittingMetadata,
        }
    }
}

impl CourseClient {
    pub async fn update_lecture(&self, edit: LectureEdit) -> Result<Vec<Lecture>, FlowError> {
        let _busy = self.begin(&self.update_busy)?;
        let origin = self.navigator.current();

        match self.run_update(edit).await {
            Ok((lectures, message)) => {
                self.lecture_stage.send_replace(LectureStage::Applied);
                info!("lecture: update applied lectures={}", lectures.len());
                self.lectures.replace(lectures.clone());
                self.emit(ClientEvent::LecturesReplaced(lectures.clone()));
                self.notify(Notice::success(
                    message.unwrap_or_else(|| UPDATE_SUCCEEDED.to_string()),
                ));
                self.redirect(&origin, Route::CourseList);
                Ok(lectures)
            }
            Err(err) => {
                self.lecture_stage.send_replace(LectureStage::Failed);
                self.notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    pub async fn remove_lecture(
        &self,
        course_id: &CourseId,
        lecture_id: &LectureId,
    ) -> Result<(), FlowError> {
        let _busy = self.begin(&self.remove_busy)?;
        let origin = self.navigator.current();

        match self.api.remove_lecture(lecture_id).await {
            Ok(_) => {
                info!("lecture: removed lecture_id={lecture_id} course_id={course_id}");
                self.notify(Notice::success(REMOVE_SUCCEEDED));
                self.redirect(&origin, Route::LectureList(course_id.clone()));
                Ok(())
            }
            Err(err) => {
                let err = FlowError::remote(err, REMOVE_FAILED);
                self.notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    async fn run_update(
        &self,
        edit: LectureEdit,
    ) -> Result<(Vec<Lecture>, Option<String>), FlowError> {
        let mut step = Step::ValidatingInput(edit);
        loop {
            self.lecture_stage.send_replace(step.stage());
            step = match step {
                Step::ValidatingInput(mut edit) => {
                    if edit.title.is_empty() {
                        return Err(FlowError::validation(TITLE_REQUIRED));
                    }
                    match edit.video.take() {
                        Some(video) => Step::UploadingMedia { edit, video },
                        None => Step::SubmittingMetadata {
                            edit,
                            video_url: None,
                        },
                    }
                }
                Step::UploadingMedia { edit, video } => {
                    let video_url = self
                        .upload_video(video)
                        .await
                        .map_err(|err| FlowError::upload(err, UPDATE_FAILED))?;
                    Step::SubmittingMetadata {
                        edit,
                        video_url: Some(video_url),
                    }
                }
                Step::SubmittingMetadata { edit, video_url } => {
                    let response = self
                        .api
                        .edit_lecture(
                            &edit.lecture_id,
                            &EditLectureRequest {
                                lecture_title: edit.title,
                                is_preview_free: edit.is_preview_free,
                                video_url,
                            },
                        )
                        .await
                        .map_err(|err| FlowError::remote(err, UPDATE_FAILED))?;
                    return Ok(response.into_parts());
                }
            };
        }
    }

    /// Authorizes and performs the direct upload. The media bytes are
    /// consumed here and dropped whether or not the upload succeeds.
    async fn upload_video(&self, video: MediaFile) -> Result<String, UploadError> {
        let authorization = self
            .api
            .upload_signature()
            .await
            .map_err(UploadError::Authorization)?;
        self.media
            .upload_video(&authorization, video, Arc::clone(&self.upload_progress))
            .await
    }
}
