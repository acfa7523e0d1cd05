//! StoreDesk Admin library.
//!
//! This crate provides the admin server as a library so that the binary,
//! the CLI and the tests share one implementation.
//!
//! # Security
//!
//! This crate manages admin accounts and role assignments. Every mutation
//! of an admin user goes through the request schemas in
//! [`storedesk_core::dto`] before it reaches the database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
