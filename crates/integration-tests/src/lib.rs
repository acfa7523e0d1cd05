//! Integration test helpers for StoreDesk.
//!
//! # Running Tests
//!
//! The tests talk to a running admin server and log in with an existing
//! administrator account:
//!
//! ```bash
//! export ADMIN_BASE_URL=http://localhost:3001
//! export TEST_ADMIN_EMAIL=admin@example.com
//! export TEST_ADMIN_PASSWORD=secret1
//! cargo test -p storedesk-integration-tests -- --ignored
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode, redirect};

/// Base URL for the admin server (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with a cookie store that does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Log `client` in with the given credentials and return the redirect target.
///
/// # Panics
///
/// Panics if the request fails or the response is not a redirect.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to submit login form");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// A client logged in as the administrator named by `TEST_ADMIN_EMAIL`.
///
/// # Panics
///
/// Panics if the credentials are missing or rejected.
pub async fn administrator_client() -> Client {
    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL must be set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD must be set");

    let client = client();
    let location = login(&client, &email, &password).await;
    assert_eq!(location, "/", "administrator login was rejected");
    client
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}-{nanos}@example.com")
}
