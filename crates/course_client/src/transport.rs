use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LectureId, UserProfile},
    error::ApiError,
    protocol::{
        Acknowledgement, EditLectureRequest, EditLectureResponse, LoginRequest,
        ProviderSignupRequest, UploadSignature,
    },
};
use tracing::debug;

use crate::{config::ClientConfig, error::RemoteError};

/// Thin wrapper over a cookie-carrying [`Client`]; every call shares one jar so
/// the session cookie set by the auth endpoints rides along on later requests.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: Client, config: ClientConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn current_user(&self) -> Result<UserProfile, RemoteError> {
        let res = self
            .request(Method::GET, "/api/user/currentuser")
            .send()
            .await?;
        decode(res).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<UserProfile, RemoteError> {
        let res = self
            .request(Method::POST, "/api/auth/login")
            .json(body)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn provider_signup(
        &self,
        body: &ProviderSignupRequest,
    ) -> Result<UserProfile, RemoteError> {
        let res = self
            .request(Method::POST, "/api/auth/googlesignup")
            .json(body)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn upload_signature(&self) -> Result<UploadSignature, RemoteError> {
        let res = self
            .request(Method::GET, "/api/course/get-signature")
            .send()
            .await?;
        decode(res).await
    }

    pub async fn edit_lecture(
        &self,
        lecture_id: &LectureId,
        body: &EditLectureRequest,
    ) -> Result<EditLectureResponse, RemoteError> {
        let res = self
            .request(
                Method::POST,
                &format!("/api/course/editlecture/{lecture_id}"),
            )
            .json(body)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn remove_lecture(
        &self,
        lecture_id: &LectureId,
    ) -> Result<Acknowledgement, RemoteError> {
        let res = self
            .request(
                Method::DELETE,
                &format!("/api/course/removelecture/{lecture_id}"),
            )
            .send()
            .await?;
        let res = check_status(res).await?;
        let body = res.bytes().await?;
        // Some deployments answer with an empty body or plain text.
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        debug!("http: {method} {url}");
        self.http
            .request(method, url)
            .timeout(self.config.request_timeout)
    }
}

async fn check_status(res: Response) -> Result<Response, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.bytes().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        api: ApiError::from_response(status.as_u16(), &body),
    })
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, RemoteError> {
    let res = check_status(res).await?;
    Ok(res.json().await?)
}
