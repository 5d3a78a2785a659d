use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Config(String),
    Transport(String),
    /// Non-2xx answer from the data API; `message` is the `{ feedback }` text when the body had one
    Rejected { status: u16, message: Option<String> },
    Decode(String),
}

impl AppError {
    /// Human-readable text supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::Rejected { status, message } => match message {
                Some(msg) => write!(f, "Rejected with status {}: {}", status, msg),
                None => write!(f, "Rejected with status {}", status),
            },
            AppError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Decode(e.to_string())
        } else {
            AppError::Transport(e.to_string())
        }
    }
}
