use crate::middleware::route_guard::SIGN_IN_PATH;
use crate::models::Session;
use crate::utils::html::escape;

pub const BRAND: &str = "Anonymous Feedback";
pub const SIGN_OUT_PATH: &str = "/api/auth/signout";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navbar {
    Guest,
    Member { greeting: String },
}

impl Navbar {
    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Navbar::Member {
                greeting: format!("Welcome, {}", session.user.display_name()),
            },
            None => Navbar::Guest,
        }
    }

    pub fn render(&self) -> String {
        let controls = match self {
            Navbar::Guest => format!(
                r#"<a href="{}"><button class="button outline">Login</button></a>"#,
                SIGN_IN_PATH
            ),
            Navbar::Member { greeting } => format!(
                r#"<span class="greeting">{}</span>
      <form method="post" action="{}"><button type="submit" class="button outline">Logout</button></form>"#,
                escape(greeting),
                SIGN_OUT_PATH
            ),
        };

        format!(
            r##"<nav class="navbar">
    <div class="container">
      <a href="#" class="brand">{}</a>
      {}
    </div>
  </nav>"##,
            BRAND, controls
        )
    }
}
