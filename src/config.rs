use crate::utils::AppError;
use std::env;

pub const DEFAULT_SESSION_COOKIE: &str = "next-auth.session-token";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_cookie: String,
    pub feedback_api_url: String,
    pub auth_provider_url: String,
    pub public_origin: Option<String>,
    pub allowed_origin: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let session_secret = lookup("SESSION_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("SESSION_SECRET must be set".to_string()))?;

        let port = get("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT is not a valid port: {}", e)))?;

        let request_timeout_secs = get("REQUEST_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {}", e)))?;

        let public_origin = lookup("PUBLIC_ORIGIN")
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port,
            session_secret,
            session_cookie: get("SESSION_COOKIE", DEFAULT_SESSION_COOKIE),
            feedback_api_url: get("FEEDBACK_API_URL", "http://localhost:3001")
                .trim_end_matches('/')
                .to_string(),
            auth_provider_url: get("AUTH_PROVIDER_URL", "http://localhost:3001/api/auth"),
            public_origin,
            allowed_origin: get("ALLOWED_ORIGIN", "http://localhost:3000"),
            request_timeout_secs,
        })
    }
}
