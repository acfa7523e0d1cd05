//! HTTP middleware for admin.

pub mod auth;
pub mod session;

pub use auth::{RequireAdministrator, RequireAuth};
pub use session::create_session_layer;
