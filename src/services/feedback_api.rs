use crate::models::{
    AcceptFeedbackRequest, AcceptingFeedbackResponse, FeedbackList, StatusMessage,
};
use crate::utils::AppError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use std::sync::Arc;
use std::time::Duration;

const FEEDBACKS_PATH: &str = "/api/get-feedbacks";
const ACCEPT_FEEDBACKS_PATH: &str = "/api/accept-feedbacks";
const DELETE_FEEDBACK_PATH: &str = "/api/delete-feedback";

/// Remote feedback store as seen by one signed-in user.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    async fn list_feedbacks(&self) -> Result<FeedbackList, AppError>;
    async fn accepting_feedback(&self) -> Result<bool, AppError>;
    /// Returns the server's status message.
    async fn set_accepting_feedback(&self, accept: bool) -> Result<String, AppError>;
    /// Returns the server's status message.
    async fn delete_feedback(&self, id: &str) -> Result<String, AppError>;
}

/// Hands out a `FeedbackApi` bound to the caller's session token.
pub trait FeedbackBackend: Send + Sync {
    fn for_session(&self, token: &str) -> Arc<dyn FeedbackApi>;
}

/// Shared HTTP settings for the data API.
#[derive(Clone)]
pub struct HttpFeedbackBackend {
    client: reqwest::Client,
    base_url: String,
    cookie_name: String,
    timeout: Duration,
}

impl HttpFeedbackBackend {
    pub fn new(base_url: &str, cookie_name: &str, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_name: cookie_name.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl FeedbackBackend for HttpFeedbackBackend {
    fn for_session(&self, token: &str) -> Arc<dyn FeedbackApi> {
        Arc::new(HttpFeedbackApi {
            backend: self.clone(),
            cookie: format!("{}={}", self.cookie_name, token),
        })
    }
}

/// `FeedbackApi` over HTTP, forwarding the session cookie on each call.
pub struct HttpFeedbackApi {
    backend: HttpFeedbackBackend,
    cookie: String,
}

impl HttpFeedbackApi {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.backend.base_url, path);
        self.backend
            .client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(COOKIE, &self.cookie)
            .timeout(self.backend.timeout)
    }

    /// Sends the request and maps non-2xx answers to `AppError::Rejected`.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(AppError::Rejected {
            status: status.as_u16(),
            message: StatusMessage::from_error_body(&body),
        })
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn list_feedbacks(&self) -> Result<FeedbackList, AppError> {
        log::debug!("📥 GET {}", FEEDBACKS_PATH);
        let response = self.send(self.request(reqwest::Method::GET, FEEDBACKS_PATH)).await?;
        let bytes = response.bytes().await?;
        // A 2xx body that is not JSON at all is treated like a missing list.
        let list = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(body) => FeedbackList::decode(body),
            Err(e) => {
                log::warn!("⚠️  Feedback list response is not JSON: {}", e);
                FeedbackList::Missing
            }
        };
        Ok(list)
    }

    async fn accepting_feedback(&self) -> Result<bool, AppError> {
        log::debug!("📥 GET {}", ACCEPT_FEEDBACKS_PATH);
        let response = self
            .send(self.request(reqwest::Method::GET, ACCEPT_FEEDBACKS_PATH))
            .await?;
        let body: AcceptingFeedbackResponse = response.json().await?;
        Ok(body.is_accepting_feedback)
    }

    async fn set_accepting_feedback(&self, accept: bool) -> Result<String, AppError> {
        log::debug!("📤 POST {} acceptfeedbacks={}", ACCEPT_FEEDBACKS_PATH, accept);
        let builder = self
            .request(reqwest::Method::POST, ACCEPT_FEEDBACKS_PATH)
            .json(&AcceptFeedbackRequest { acceptfeedbacks: accept });
        let body: StatusMessage = self.send(builder).await?.json().await?;
        Ok(body.feedback)
    }

    async fn delete_feedback(&self, id: &str) -> Result<String, AppError> {
        let path = format!("{}/{}", DELETE_FEEDBACK_PATH, urlencoding::encode(id));
        log::debug!("🗑️  DELETE {}", path);
        let body: StatusMessage = self
            .send(self.request(reqwest::Method::DELETE, &path))
            .await?
            .json()
            .await?;
        Ok(body.feedback)
    }
}
