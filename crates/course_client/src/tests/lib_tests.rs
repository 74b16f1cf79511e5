use super::*;
use crate::identity::MissingIdentityProvider;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{CourseId, LectureId};
use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
struct Recorded {
    route: &'static str,
    path: String,
    body: Value,
}

#[derive(Clone, Default)]
struct MockBackend {
    replies: Arc<Mutex<HashMap<&'static str, Reply>>>,
    calls: Arc<Mutex<Vec<Recorded>>>,
    removed: Arc<Mutex<HashSet<String>>>,
}

impl MockBackend {
    async fn reply(&self, route: &'static str, status: StatusCode, body: Value) {
        self.replies.lock().await.insert(
            route,
            Reply {
                status,
                body,
                delay: None,
            },
        );
    }

    async fn reply_after(&self, route: &'static str, delay: Duration, body: Value) {
        self.replies.lock().await.insert(
            route,
            Reply {
                status: StatusCode::OK,
                body,
                delay: Some(delay),
            },
        );
    }

    async fn respond(
        &self,
        route: &'static str,
        path: String,
        body: Value,
    ) -> (StatusCode, Json<Value>) {
        self.calls.lock().await.push(Recorded { route, path, body });
        let reply = self.replies.lock().await.get(route).cloned();
        match reply {
            Some(reply) => {
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }
                (reply.status, Json(reply.body))
            }
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{route} not mocked") })),
            ),
        }
    }

    async fn routes(&self) -> Vec<&'static str> {
        self.calls.lock().await.iter().map(|call| call.route).collect()
    }

    async fn body_of(&self, route: &'static str) -> Option<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .find(|call| call.route == route)
            .map(|call| call.body.clone())
    }
}

async fn handle_current_user(State(mock): State<MockBackend>) -> (StatusCode, Json<Value>) {
    mock.respond("current_user", "/api/user/currentuser".into(), Value::Null)
        .await
}

async fn handle_login(
    State(mock): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.respond("login", "/api/auth/login".into(), body).await
}

async fn handle_provider_signup(
    State(mock): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.respond("provider_signup", "/api/auth/googlesignup".into(), body)
        .await
}

async fn handle_signature(State(mock): State<MockBackend>) -> (StatusCode, Json<Value>) {
    mock.respond("signature", "/api/course/get-signature".into(), Value::Null)
        .await
}

async fn handle_edit_lecture(
    State(mock): State<MockBackend>,
    Path(lecture_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.respond(
        "edit_lecture",
        format!("/api/course/editlecture/{lecture_id}"),
        body,
    )
    .await
}

async fn handle_remove_lecture(
    State(mock): State<MockBackend>,
    Path(lecture_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let path = format!("/api/course/removelecture/{lecture_id}");
    mock.calls.lock().await.push(Recorded {
        route: "remove_lecture",
        path,
        body: Value::Null,
    });
    if mock.removed.lock().await.insert(lecture_id) {
        (StatusCode::OK, Json(json!({ "message": "Lecture Removed" })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Lecture not found" })),
        )
    }
}

async fn handle_media_upload(
    State(mock): State<MockBackend>,
    Path(cloud_name): Path<String>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut fields = serde_json::Map::new();
    fields.insert("cloud_name".into(), Value::String(cloud_name.clone()));
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            fields.insert("file_name".into(), Value::String(file_name));
            fields.insert("file_len".into(), json!(bytes.len()));
            fields.insert(
                "file_text".into(),
                Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            );
        } else {
            let text = field.text().await.unwrap_or_default();
            fields.insert(name, Value::String(text));
        }
    }
    mock.respond(
        "media_upload",
        format!("/v1_1/{cloud_name}/video/upload"),
        Value::Object(fields),
    )
    .await
}

async fn spawn_backend(mock: MockBackend) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new()
        .route("/api/user/currentuser", get(handle_current_user))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/googlesignup", post(handle_provider_signup))
        .route("/api/course/get-signature", get(handle_signature))
        .route("/api/course/editlecture/:lecture_id", post(handle_edit_lecture))
        .route(
            "/api/course/removelecture/:lecture_id",
            delete(handle_remove_lecture),
        )
        .route("/v1_1/:cloud_name/video/upload", post(handle_media_upload))
        .with_state(mock);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn client_with(mock: &MockBackend) -> Arc<CourseClient> {
    let server_url = spawn_backend(mock.clone()).await;
    let config = ClientConfig::new(&server_url, &server_url)
        .expect("config")
        .with_upload_chunk_size(4)
        .expect("chunk size");
    CourseClient::new(config).expect("client")
}

fn drain(events: &mut broadcast::Receiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

fn notices(events: &[ClientEvent]) -> Vec<Notice> {
    events
        .iter()
        .filter_map(|event| match event {
            ClientEvent::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

fn go_basics_profile() -> Value {
    json!({
        "_id": "1",
        "name": "Ada",
        "email": "a@b.com",
        "role": "student",
        "enrolledCourses": [{ "_id": "c1", "title": "Go Basics" }]
    })
}

fn lecture_json(id: &str, title: &str) -> Value {
    json!({ "_id": id, "lectureTitle": title, "isPreviewFree": false })
}

fn seeded_lectures() -> Vec<Lecture> {
    vec![Lecture {
        id: LectureId::new("l1"),
        lecture_title: "Old title".into(),
        is_preview_free: false,
        video_url: Some("https://cdn.example/old.mp4".into()),
    }]
}

fn edit_route() -> Route {
    Route::EditLecture {
        course_id: CourseId::new("c1"),
        lecture_id: LectureId::new("l1"),
    }
}

#[tokio::test]
async fn empty_credentials_fail_validation_without_network() {
    let mock = MockBackend::default();
    let client = client_with(&mock).await;
    let mut events = client.subscribe_events();

    for (email, password) in [("", "x"), ("a@b.com", ""), ("", "")] {
        let err = client
            .login_with_password(email, password)
            .await
            .expect_err("validation");
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Please fill all fields");
    }

    assert!(mock.routes().await.is_empty());
    assert!(!client.login_busy().is_busy());
    assert_eq!(client.users().snapshot(), UserProfile::empty());
    let notices = notices(&drain(&mut events));
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|notice| notice.level == NoticeLevel::Error));
}

#[tokio::test]
async fn password_login_overwrites_partial_profile_with_current_user() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::OK, json!({ "_id": "1", "role": "student" }))
        .await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;
    client.navigator().navigate(Route::Login);
    let mut events = client.subscribe_events();

    let profile = client
        .login_with_password("a@b.com", "x")
        .await
        .expect("login");

    assert_eq!(profile.enrolled_courses.len(), 1);
    assert_eq!(profile.enrolled_courses[0].title, "Go Basics");
    assert_eq!(client.users().snapshot(), profile);
    assert_eq!(mock.routes().await, vec!["login", "current_user"]);
    assert_eq!(
        mock.body_of("login").await,
        Some(json!({ "email": "a@b.com", "password": "x" }))
    );
    assert_eq!(client.navigator().current(), Route::Landing);
    assert!(!client.login_busy().is_busy());

    let events = drain(&mut events);
    let phases: Vec<(ProfilePhase, usize)> = events
        .iter()
        .filter_map(|event| match event {
            ClientEvent::ProfileApplied { phase, profile } => {
                Some((*phase, profile.enrolled_courses.len()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![(ProfilePhase::Partial, 0), (ProfilePhase::Complete, 1)]
    );
    assert_eq!(
        notices(&events),
        vec![Notice::success("Login Successfully")]
    );
}

#[tokio::test]
async fn login_payload_with_course_ids_is_completed_by_current_user() {
    let mock = MockBackend::default();
    mock.reply(
        "login",
        StatusCode::OK,
        json!({ "_id": "1", "photoUrl": null, "enrolledCourses": ["c1"] }),
    )
    .await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;
    let mut events = client.subscribe_events();

    client
        .login_with_password("a@b.com", "x")
        .await
        .expect("login");

    let expected: UserProfile =
        serde_json::from_value(go_basics_profile()).expect("current user profile");
    assert_eq!(client.users().snapshot(), expected);
    assert_eq!(mock.routes().await, vec!["login", "current_user"]);

    let partial = drain(&mut events)
        .into_iter()
        .find_map(|event| match event {
            ClientEvent::ProfileApplied {
                phase: ProfilePhase::Partial,
                profile,
            } => Some(profile),
            _ => None,
        })
        .expect("partial profile applied");
    assert_eq!(partial.enrolled_courses.len(), 1);
    assert_eq!(partial.enrolled_courses[0].id, CourseId::new("c1"));
}

#[tokio::test]
async fn login_sends_email_exactly_as_typed() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::OK, json!({ "_id": "1" }))
        .await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;

    client
        .login_with_password(" a@b.com ", "x")
        .await
        .expect("login");

    assert_eq!(
        mock.body_of("login").await,
        Some(json!({ "email": " a@b.com ", "password": "x" }))
    );
}

#[tokio::test]
async fn failed_login_keeps_previous_profile() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::OK, json!({ "_id": "1" })).await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;
    let before = client
        .login_with_password("a@b.com", "x")
        .await
        .expect("first login");

    mock.reply(
        "login",
        StatusCode::BAD_REQUEST,
        json!({ "message": "Incorrect Password" }),
    )
    .await;
    client.navigator().navigate(Route::Login);
    let mut events = client.subscribe_events();

    let err = client
        .login_with_password("a@b.com", "wrong")
        .await
        .expect_err("rejected");

    assert!(matches!(err, FlowError::Remote { .. }));
    assert_eq!(err.user_message(), "Incorrect Password");
    assert_eq!(client.users().snapshot(), before);
    assert_eq!(
        mock.routes().await,
        vec!["login", "current_user", "login"]
    );
    assert_eq!(client.navigator().current(), Route::Login);
    assert!(!client.login_busy().is_busy());
    assert_eq!(
        notices(&drain(&mut events)),
        vec![Notice::error("Incorrect Password")]
    );
}

#[tokio::test]
async fn login_failure_without_server_message_uses_fallback() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::INTERNAL_SERVER_ERROR, json!({}))
        .await;
    let client = client_with(&mock).await;

    let err = client
        .login_with_password("a@b.com", "x")
        .await
        .expect_err("server error");

    assert_eq!(err.user_message(), "Login failed");
    assert_eq!(client.users().snapshot(), UserProfile::empty());
}

#[tokio::test]
async fn current_user_failure_keeps_login_payload() {
    let mock = MockBackend::default();
    mock.reply(
        "login",
        StatusCode::OK,
        json!({ "_id": "1", "role": "student", "name": "Ada" }),
    )
    .await;
    mock.reply(
        "current_user",
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Not authenticated" }),
    )
    .await;
    let client = client_with(&mock).await;

    let profile = client
        .login_with_password("a@b.com", "x")
        .await
        .expect("login still succeeds");

    assert_eq!(profile.name, "Ada");
    assert!(profile.enrolled_courses.is_empty());
    assert_eq!(client.users().snapshot(), profile);
    assert_eq!(client.catalog(), CatalogView::Empty);
}

#[tokio::test]
async fn provider_login_submits_unset_role_and_merges_profile() {
    let mock = MockBackend::default();
    mock.reply(
        "provider_signup",
        StatusCode::OK,
        json!({ "_id": "1", "name": "Ada" }),
    )
    .await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;
    client.navigator().navigate(Route::Login);

    let provider = StaticIdentityProvider::new("Ada", "a@b.com");
    let profile = client
        .login_with_provider(&provider)
        .await
        .expect("provider login");

    assert_eq!(
        mock.body_of("provider_signup").await,
        Some(json!({ "name": "Ada", "email": "a@b.com", "role": "" }))
    );
    assert_eq!(mock.routes().await, vec!["provider_signup", "current_user"]);
    assert_eq!(profile.enrolled_courses[0].title, "Go Basics");
    assert_eq!(client.navigator().current(), Route::Landing);
}

#[tokio::test]
async fn provider_popup_failure_makes_no_backend_call() {
    let mock = MockBackend::default();
    let client = client_with(&mock).await;

    let err = client
        .login_with_provider(&MissingIdentityProvider)
        .await
        .expect_err("popup failed");

    assert!(matches!(err, FlowError::IdentityProvider { .. }));
    assert_eq!(err.user_message(), "Google login failed");
    assert!(mock.routes().await.is_empty());
    assert_eq!(client.users().snapshot(), UserProfile::empty());
    assert!(!client.login_busy().is_busy());
}

#[tokio::test]
async fn provider_signup_rejection_leaves_store_unchanged() {
    let mock = MockBackend::default();
    mock.reply("provider_signup", StatusCode::FORBIDDEN, json!({}))
        .await;
    let client = client_with(&mock).await;

    let err = client
        .login_with_provider(&StaticIdentityProvider::new("Ada", "a@b.com"))
        .await
        .expect_err("rejected");

    assert_eq!(err.user_message(), "Google login failed");
    assert_eq!(mock.routes().await, vec!["provider_signup"]);
    assert_eq!(client.users().snapshot(), UserProfile::empty());
}

#[tokio::test]
async fn redirect_is_skipped_when_user_left_the_login_screen() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::OK, json!({ "_id": "1" })).await;
    mock.reply_after(
        "current_user",
        Duration::from_millis(300),
        go_basics_profile(),
    )
    .await;
    let client = client_with(&mock).await;
    client.navigator().navigate(Route::Login);

    let flow = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.login_with_password("a@b.com", "x").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.navigator().navigate(Route::SignUp);

    let profile = flow.await.expect("join").expect("login");
    assert_eq!(profile.enrolled_courses.len(), 1);
    assert_eq!(client.navigator().current(), Route::SignUp);
}

#[tokio::test]
async fn logout_resets_profile_and_catalog() {
    let mock = MockBackend::default();
    mock.reply("login", StatusCode::OK, json!({ "_id": "1" })).await;
    mock.reply("current_user", StatusCode::OK, go_basics_profile())
        .await;
    let client = client_with(&mock).await;
    client
        .login_with_password("a@b.com", "x")
        .await
        .expect("login");
    assert_eq!(client.catalog().cards().len(), 1);

    client.logout();

    assert_eq!(client.users().snapshot(), UserProfile::empty());
    assert_eq!(client.catalog(), CatalogView::Loading);
}

#[tokio::test]
async fn update_without_video_omits_video_url_and_replaces_lectures() {
    let mock = MockBackend::default();
    mock.reply(
        "edit_lecture",
        StatusCode::OK,
        json!([
            lecture_json("l1", "Intro"),
            lecture_json("l2", "Setup"),
            lecture_json("l3", "Wrap-up")
        ]),
    )
    .await;
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());
    client.navigator().navigate(edit_route());
    let mut stage = client.lecture_stage();
    let mut events = client.subscribe_events();

    let lectures = client
        .update_lecture(LectureEdit::new(
            CourseId::new("c1"),
            LectureId::new("l1"),
            "Intro",
        ))
        .await
        .expect("update");

    assert_eq!(lectures.len(), 3);
    assert_eq!(client.lectures().snapshot(), lectures);
    assert_eq!(mock.routes().await, vec!["edit_lecture"]);
    let body = mock.body_of("edit_lecture").await.expect("edit body");
    assert_eq!(body["lectureTitle"], "Intro");
    assert_eq!(body["isPreviewFree"], false);
    assert!(body.get("videoUrl").is_none());
    assert_eq!(client.navigator().current(), Route::CourseList);
    assert_eq!(*stage.borrow_and_update(), LectureStage::Applied);
    assert!(!client.update_busy().is_busy());
    assert_eq!(
        notices(&drain(&mut events)),
        vec![Notice::success("Lecture Updated")]
    );
}

#[tokio::test]
async fn update_with_video_uploads_before_submitting_metadata() {
    let mock = MockBackend::default();
    mock.reply(
        "signature",
        StatusCode::OK,
        json!({
            "signature": "sig-123",
            "timestamp": 1_700_000_000,
            "cloud_name": "demo",
            "api_key": "key-9"
        }),
    )
    .await;
    mock.reply(
        "media_upload",
        StatusCode::OK,
        json!({ "secure_url": "https://cdn.example/new.mp4" }),
    )
    .await;
    mock.reply(
        "edit_lecture",
        StatusCode::OK,
        json!({
            "lectures": [{
                "_id": "l1",
                "lectureTitle": "Intro",
                "isPreviewFree": true,
                "videoUrl": "https://cdn.example/new.mp4"
            }],
            "message": "Lecture edited"
        }),
    )
    .await;
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());
    let progress = client.upload_progress();
    let mut events = client.subscribe_events();

    let edit = LectureEdit::prefilled_from(CourseId::new("c1"), &seeded_lectures()[0]);
    let edit = LectureEdit {
        title: "Intro".into(),
        ..edit
    }
    .preview_free(true)
    .with_video(MediaFile::new("new.mp4", b"0123456789".to_vec()));
    client.update_lecture(edit).await.expect("update");

    assert_eq!(
        mock.routes().await,
        vec!["signature", "media_upload", "edit_lecture"]
    );
    let upload = mock.body_of("media_upload").await.expect("upload body");
    assert_eq!(upload["cloud_name"], "demo");
    assert_eq!(upload["api_key"], "key-9");
    assert_eq!(upload["timestamp"], "1700000000");
    assert_eq!(upload["signature"], "sig-123");
    assert_eq!(upload["folder"], "courses");
    assert_eq!(upload["resource_type"], "video");
    assert_eq!(upload["file_name"], "new.mp4");
    assert_eq!(upload["file_len"], 10);
    assert_eq!(upload["file_text"], "0123456789");

    let edit_body = mock.body_of("edit_lecture").await.expect("edit body");
    assert_eq!(edit_body["videoUrl"], "https://cdn.example/new.mp4");
    assert_eq!(edit_body["isPreviewFree"], true);

    let lecture = client
        .lectures()
        .find(&LectureId::new("l1"))
        .expect("lecture");
    assert_eq!(
        lecture.video_url.as_deref(),
        Some("https://cdn.example/new.mp4")
    );
    assert_eq!(
        *progress.borrow(),
        UploadProgress {
            sent: 10,
            total: 10
        }
    );
    assert_eq!(
        notices(&drain(&mut events)),
        vec![Notice::success("Lecture edited")]
    );
}

#[tokio::test]
async fn signature_failure_never_reaches_metadata_endpoint() {
    let mock = MockBackend::default();
    mock.reply(
        "signature",
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Not authenticated" }),
    )
    .await;
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());
    client.navigator().navigate(edit_route());
    let stage = client.lecture_stage();

    let err = client
        .update_lecture(
            LectureEdit::new(CourseId::new("c1"), LectureId::new("l1"), "Intro")
                .with_video(MediaFile::new("new.mp4", vec![1, 2, 3])),
        )
        .await
        .expect_err("authorization failed");

    assert!(matches!(
        err,
        FlowError::Upload {
            source: UploadError::Authorization(_),
            ..
        }
    ));
    assert_eq!(err.user_message(), "Not authenticated");
    assert_eq!(mock.routes().await, vec!["signature"]);
    assert_eq!(client.lectures().snapshot(), seeded_lectures());
    assert_eq!(client.navigator().current(), edit_route());
    assert_eq!(*stage.borrow(), LectureStage::Failed);
    assert!(!client.update_busy().is_busy());
}

#[tokio::test]
async fn storage_rejection_never_reaches_metadata_endpoint() {
    let mock = MockBackend::default();
    mock.reply(
        "signature",
        StatusCode::OK,
        json!({
            "signature": "sig",
            "timestamp": 1,
            "cloud_name": "demo",
            "api_key": "key"
        }),
    )
    .await;
    mock.reply(
        "media_upload",
        StatusCode::BAD_REQUEST,
        json!({ "error": { "message": "Invalid Signature" } }),
    )
    .await;
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());

    let err = client
        .update_lecture(
            LectureEdit::new(CourseId::new("c1"), LectureId::new("l1"), "Intro")
                .with_video(MediaFile::new("new.mp4", vec![1, 2, 3])),
        )
        .await
        .expect_err("upload rejected");

    assert!(matches!(
        err,
        FlowError::Upload {
            source: UploadError::Rejected { status: 400, .. },
            ..
        }
    ));
    assert_eq!(err.user_message(), "Invalid Signature");
    assert_eq!(mock.routes().await, vec!["signature", "media_upload"]);
    assert_eq!(client.lectures().snapshot(), seeded_lectures());
}

#[tokio::test]
async fn empty_title_is_rejected_before_any_request() {
    let mock = MockBackend::default();
    let client = client_with(&mock).await;

    let err = client
        .update_lecture(
            LectureEdit::new(CourseId::new("c1"), LectureId::new("l1"), "")
                .with_video(MediaFile::new("new.mp4", vec![1])),
        )
        .await
        .expect_err("validation");

    assert!(err.is_validation());
    assert_eq!(err.user_message(), "Lecture title required");
    assert!(mock.routes().await.is_empty());
    assert_eq!(*client.lecture_stage().borrow(), LectureStage::Failed);
}

#[tokio::test]
async fn rejected_metadata_update_leaves_lectures_unchanged() {
    let mock = MockBackend::default();
    mock.reply(
        "edit_lecture",
        StatusCode::NOT_FOUND,
        json!({ "message": "Lecture is not found" }),
    )
    .await;
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());

    let err = client
        .update_lecture(LectureEdit::new(
            CourseId::new("c1"),
            LectureId::new("l1"),
            "Intro",
        ))
        .await
        .expect_err("rejected");

    assert!(matches!(err, FlowError::Remote { .. }));
    assert_eq!(err.user_message(), "Lecture is not found");
    assert_eq!(client.lectures().snapshot(), seeded_lectures());
}

#[tokio::test]
async fn update_is_rejected_while_another_update_holds_the_flag() {
    let mock = MockBackend::default();
    let client = client_with(&mock).await;
    let held = client.update_busy().try_begin().expect("hold flag");

    let err = client
        .update_lecture(LectureEdit::new(
            CourseId::new("c1"),
            LectureId::new("l1"),
            "Intro",
        ))
        .await
        .expect_err("re-entry");

    assert!(matches!(err, FlowError::AlreadyRunning(_)));
    assert!(mock.routes().await.is_empty());
    assert!(!client.remove_busy().is_busy());
    drop(held);
    assert!(!client.update_busy().is_busy());
}

#[tokio::test]
async fn removing_twice_surfaces_remote_error_and_keeps_store() {
    let mock = MockBackend::default();
    let client = client_with(&mock).await;
    client.lectures().load(seeded_lectures());
    client.navigator().navigate(edit_route());
    let mut events = client.subscribe_events();
    let course_id = CourseId::new("c1");
    let lecture_id = LectureId::new("l1");

    client
        .remove_lecture(&course_id, &lecture_id)
        .await
        .expect("first removal");
    assert_eq!(
        client.navigator().current(),
        Route::LectureList(course_id.clone())
    );

    client.navigator().navigate(edit_route());
    let err = client
        .remove_lecture(&course_id, &lecture_id)
        .await
        .expect_err("already removed");

    assert!(matches!(err, FlowError::Remote { .. }));
    assert_eq!(err.user_message(), "Lecture not found");
    assert_eq!(client.lectures().snapshot(), seeded_lectures());
    assert_eq!(client.navigator().current(), edit_route());
    assert!(!client.remove_busy().is_busy());
    assert_eq!(
        notices(&drain(&mut events)),
        vec![
            Notice::success("Lecture Removed"),
            Notice::error("Lecture not found")
        ]
    );
}
