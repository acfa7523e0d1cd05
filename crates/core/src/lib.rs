//! StoreDesk Core - Shared types library.
//!
//! This crate provides the pieces of StoreDesk that have no I/O:
//! - `admin` - Administration server (consumes schemas, roles and formatting)
//! - `cli` - Command-line tools (reuses the same request schemas)
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails and roles
//! - [`validation`] - Batch schema evaluator for untyped JSON payloads
//! - [`dto`] - Admin-entity request schemas and their normalized payloads
//! - [`money`] - Locale-configured money display formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dto;
pub mod money;
pub mod types;
pub mod validation;

pub use money::{MoneyFormat, MoneyFormatError};
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
