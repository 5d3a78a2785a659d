//! Scripted collaborators shared by handler and view-model tests.

use crate::config::AppConfig;
use crate::models::FeedbackList;
use crate::services::session_service::tests::SECRET;
use crate::services::{FeedbackApi, FeedbackBackend, JwtSessionResolver};
use crate::state::AppState;
use crate::utils::AppError;
use actix_web::web;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// `FeedbackApi` whose answers are set up front; unscripted calls fail with a transport error.
#[derive(Default)]
pub struct ScriptedApi {
    pub list: Mutex<Option<Result<FeedbackList, AppError>>>,
    pub flag: Mutex<Option<Result<bool, AppError>>>,
    pub set: Mutex<Option<Result<String, AppError>>>,
    pub delete: Mutex<Option<Result<String, AppError>>>,
    pub sent_flags: Mutex<Vec<bool>>,
    pub deleted: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedApi {
    fn next<T: Clone>(slot: &Mutex<Option<Result<T, AppError>>>) -> Result<T, AppError> {
        slot.lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(AppError::Transport("not scripted".into())))
    }
}

#[async_trait]
impl FeedbackApi for ScriptedApi {
    async fn list_feedbacks(&self) -> Result<FeedbackList, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.list)
    }

    async fn accepting_feedback(&self) -> Result<bool, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.flag)
    }

    async fn set_accepting_feedback(&self, accept: bool) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent_flags.lock().unwrap().push(accept);
        Self::next(&self.set)
    }

    async fn delete_feedback(&self, id: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.deleted.lock().unwrap().push(id.to_string());
        Self::next(&self.delete)
    }
}

/// Hands the same `ScriptedApi` to every session and records the tokens it saw.
pub struct ScriptedBackend {
    pub api: Arc<ScriptedApi>,
    pub tokens: Mutex<Vec<String>>,
}

impl FeedbackBackend for ScriptedBackend {
    fn for_session(&self, token: &str) -> Arc<dyn FeedbackApi> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.api.clone()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "SESSION_SECRET" => Some(SECRET.to_string()),
        "PUBLIC_ORIGIN" => Some("https://app.example.com".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_state_with(api: Arc<ScriptedApi>) -> web::Data<AppState> {
    test_state_with_backend(api).0
}

/// Like `test_state_with`, also returning the backend so tests can inspect its tokens.
pub fn test_state_with_backend(api: Arc<ScriptedApi>) -> (web::Data<AppState>, Arc<ScriptedBackend>) {
    let backend = Arc::new(ScriptedBackend {
        api,
        tokens: Mutex::new(Vec::new()),
    });
    let state = web::Data::new(AppState {
        config: test_config(),
        resolver: Arc::new(JwtSessionResolver::new(SECRET)),
        backend: backend.clone(),
    });
    (state, backend)
}

pub fn test_state() -> web::Data<AppState> {
    test_state_with(Arc::new(ScriptedApi::default()))
}
