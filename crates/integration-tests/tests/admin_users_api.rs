//! Integration tests for the admin users JSON API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`sd-cli migrate`)
//! - The admin server running (`cargo run -p storedesk-admin`)
//! - An administrator account in `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`

use reqwest::StatusCode;
use serde_json::{Value, json};

use storedesk_integration_tests::{admin_base_url, administrator_client, client, unique_email};

// ============================================================================
// Access Control
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_requires_session() {
    let resp = client()
        .get(format!("{}/api/admin-users", admin_base_url()))
        .send()
        .await
        .expect("Failed to list admin users");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_roles_are_seeded() {
    let client = administrator_client().await;

    let roles: Vec<Value> = client
        .get(format!("{}/api/roles", admin_base_url()))
        .send()
        .await
        .expect("Failed to list roles")
        .json()
        .await
        .expect("Roles response is not JSON");

    let names: Vec<&str> = roles.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, ["customer", "product_manager", "administrator"]);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_create_reports_every_violated_field() {
    let client = administrator_client().await;

    let resp = client
        .post(format!("{}/api/admin-users", admin_base_url()))
        .json(&json!({ "email": "not-an-email", "roleIds": ["a"] }))
        .send()
        .await
        .expect("Failed to post admin user");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Error body is not JSON");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();

    for field in ["name", "email", "phone", "password", "roleIds"] {
        assert!(fields.contains(&field), "missing {field} in {fields:?}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_unknown_role_id_is_bad_request() {
    let client = administrator_client().await;

    let resp = client
        .post(format!("{}/api/admin-users", admin_base_url()))
        .json(&json!({
            "name": "Unknown Role",
            "email": unique_email("unknown-role"),
            "phone": "0900000001",
            "password": "secret1",
            "roleIds": [999],
        }))
        .send()
        .await
        .expect("Failed to post admin user");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_email_is_unique_ignoring_case() {
    let client = administrator_client().await;
    let base_url = admin_base_url();
    let email = unique_email("case");

    let resp = client
        .post(format!("{base_url}/api/admin-users"))
        .json(&json!({
            "name": "Le Thi C",
            "email": email,
            "phone": "0900000003",
            "password": "secret1",
        }))
        .send()
        .await
        .expect("Failed to create admin user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: Value = resp.json().await.expect("User is not JSON");
    let id = user["id"].as_i64().expect("numeric id");

    let resp = client
        .post(format!("{base_url}/api/admin-users"))
        .json(&json!({
            "name": "Le Thi C",
            "email": email.to_uppercase(),
            "phone": "0900000003",
            "password": "secret1",
        }))
        .send()
        .await
        .expect("Failed to create admin user");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .delete(format!("{base_url}/api/admin-users/{id}"))
        .send()
        .await
        .expect("Failed to delete admin user");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_admin_user_lifecycle() {
    let client = administrator_client().await;
    let base_url = admin_base_url();

    // Duplicates are dropped, submission order is kept
    let resp = client
        .post(format!("{base_url}/api/admin-users"))
        .json(&json!({
            "name": "Tran Van B",
            "email": unique_email("lifecycle"),
            "phone": "0900000002",
            "password": "secret1",
            "roleIds": [2, 1, 2],
        }))
        .send()
        .await
        .expect("Failed to create admin user");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let user: Value = resp.json().await.expect("User is not JSON");
    assert_eq!(user["roleIds"], json!([2, 1]));
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    let id = user["id"].as_i64().expect("numeric id");

    // An empty update returns the user unchanged
    let resp = client
        .patch(format!("{base_url}/api/admin-users/{id}"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to update admin user");
    assert_eq!(resp.status(), StatusCode::OK);

    // Replace roles
    let resp = client
        .put(format!("{base_url}/api/admin-users/{id}/roles"))
        .json(&json!({ "roleIds": [1, 2] }))
        .send()
        .await
        .expect("Failed to set roles");
    assert_eq!(resp.status(), StatusCode::OK);
    let user: Value = resp.json().await.expect("User is not JSON");
    assert_eq!(user["roleIds"], json!([1, 2]));

    let user: Value = client
        .get(format!("{base_url}/api/admin-users/{id}"))
        .send()
        .await
        .expect("Failed to fetch admin user")
        .json()
        .await
        .expect("User is not JSON");
    assert_eq!(user["roleIds"], json!([1, 2]));

    // Short password is rejected with the schema message
    let resp = client
        .post(format!("{base_url}/api/admin-users/{id}/reset-password"))
        .json(&json!({ "newPassword": "12345" }))
        .send()
        .await
        .expect("Failed to reset password");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Error body is not JSON");
    assert_eq!(
        body["errors"][0]["message"],
        "Password must be at least 6 characters long"
    );

    let resp = client
        .post(format!("{base_url}/api/admin-users/{id}/reset-password"))
        .json(&json!({ "newPassword": "123456" }))
        .send()
        .await
        .expect("Failed to reset password");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .post(format!("{base_url}/api/admin-users/{id}/reset-password"))
        .json(&json!({ "newPassword": "      " }))
        .send()
        .await
        .expect("Failed to reset password");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .delete(format!("{base_url}/api/admin-users/{id}"))
        .send()
        .await
        .expect("Failed to delete admin user");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/admin-users/{id}"))
        .send()
        .await
        .expect("Failed to fetch admin user");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
