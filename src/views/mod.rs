pub mod dashboard;
pub mod navbar;
pub mod notification;
pub mod pages;

pub use dashboard::{DashboardCommand, DashboardViewModel, MountOutcome};
pub use navbar::Navbar;
