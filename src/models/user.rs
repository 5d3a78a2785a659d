use serde::{Deserialize, Serialize};

/// User projection carried by a session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Name shown in greetings: username first, email as fallback.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("")
    }
}
