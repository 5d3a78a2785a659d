use crate::models::{Session, SessionState, SessionStatus, User};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

// JWT Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user id
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,            // expiration
}

impl Claims {
    pub fn into_session(self) -> Session {
        let expires = chrono::DateTime::from_timestamp(self.exp as i64, 0)
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();

        Session {
            user: User {
                id: self.sub,
                username: self.username,
                email: self.email,
            },
            expires,
        }
    }
}

/// Turns a provider token into a session. Any failure means "no session".
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, token: Option<&str>) -> Option<Session>;
}

/// Verifies HS256 tokens signed with the identity provider's shared secret.
pub struct JwtSessionResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionResolver {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // An expired token is no session, with no grace period.
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, token: Option<&str>) -> Option<Session> {
        let token = token.filter(|t| !t.is_empty())?;
        match self.verify(token) {
            Ok(claims) => Some(claims.into_session()),
            Err(e) => {
                log::debug!("🔒 Session token rejected: {}", e);
                None
            }
        }
    }
}

/// Session provider shared by every view: a read-only snapshot plus change notifications.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Starts in `Loading` until something publishes a resolved state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Loading);
        Self { state: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    /// Re-resolves the session from `token`, passing through `Loading`.
    pub async fn refresh(&self, resolver: &dyn SessionResolver, token: Option<&str>) -> SessionState {
        self.publish(SessionState::Loading);
        let state = SessionState::from(resolver.resolve(token).await);
        self.publish(state.clone());
        state
    }

    pub fn sign_out(&self) {
        self.publish(SessionState::Unauthenticated);
    }

    /// Waits until the state is no longer `Loading`.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|s| !s.is_loading()).await.map(|s| s.clone());
        settled.unwrap_or(SessionState::Unauthenticated)
    }
}
