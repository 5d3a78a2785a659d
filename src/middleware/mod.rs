pub mod route_guard;

pub use route_guard::RouteGuard;
