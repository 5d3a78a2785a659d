use crate::config::AppConfig;
use crate::services::{FeedbackBackend, HttpFeedbackBackend, JwtSessionResolver, SessionResolver};
use std::sync::Arc;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub resolver: Arc<dyn SessionResolver>,
    pub backend: Arc<dyn FeedbackBackend>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let resolver = Arc::new(JwtSessionResolver::new(&config.session_secret));
        let backend = Arc::new(HttpFeedbackBackend::new(
            &config.feedback_api_url,
            &config.session_cookie,
            config.request_timeout_secs,
        ));
        Self {
            config,
            resolver,
            backend,
        }
    }
}
