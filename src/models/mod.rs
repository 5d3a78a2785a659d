pub mod feedback;
pub mod session;
pub mod user;

pub use feedback::*;
pub use session::*;
pub use user::*;
