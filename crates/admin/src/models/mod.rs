//! Domain models for admin.

pub mod admin_user;
pub mod catalog;
pub mod session;

pub use admin_user::{AdminUser, RoleRecord};
pub use catalog::{OrderSummary, ProductSummary};
pub use session::{CurrentUser, keys as session_keys};
