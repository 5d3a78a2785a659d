// Service layer - Business logic
pub mod feedback_api;
pub mod session_service;

pub use feedback_api::{FeedbackApi, FeedbackBackend, HttpFeedbackBackend};
pub use session_service::{JwtSessionResolver, SessionContext, SessionResolver};
