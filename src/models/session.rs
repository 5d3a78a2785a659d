use super::User;
use serde::{Deserialize, Serialize};

/// Proof of an authenticated identity, resolved from the provider's token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct Session {
    pub user: User,
    /// Expiry as RFC 3339.
    pub expires: String,
}

/// Session plus the raw token it came from, stored in request extensions by the route guard.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub token: String,
    pub session: Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Loading => SessionStatus::Loading,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        }
    }
}
