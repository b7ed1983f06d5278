//! User API integration tests.
//!
//! Run with: `cargo test -p actimon-api --test users_test`

mod helpers;

use helpers::fixtures::create_user_body;
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_user_crud_workflow() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/users")
        .json(&create_user_body("bob@example.com"))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["message"], "User successfully created!");
    assert_eq!(body["data"]["roles"], json!(["operator"]));
    assert!(body["data"].get("password_hash").is_none());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = client.get("/users").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = client.get("/users/bob@example.com").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"]["first_name"], "Bob");

    let response = client.get(&format!("/users/id/{}", id)).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"], json!({ "email": "bob@example.com" }));

    let response = client.get("/users/bob@example.com/id").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"], json!({ "id": id }));

    let response = client
        .put("/users/bob@example.com")
        .json(&json!({ "first_name": "Robert", "roles": ["admin"] }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "User successfully updated!");
    assert_eq!(body["data"]["first_name"], "Robert");
    assert_eq!(body["data"]["last_name"], "Builder");
    assert_eq!(body["data"]["roles"], json!(["admin"]));

    let response = client.delete("/users/bob@example.com").await;
    assert_eq!(response.status_code(), 204);

    let response = client.get("/users/bob@example.com").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "User does not exist.");
}

#[tokio::test]
async fn test_create_duplicate_email_is_conflict() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/users")
        .json(&create_user_body("dup@example.com"))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = client
        .post("/users")
        .json(&create_user_body("dup@example.com"))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_create_with_invalid_body_is_conflict() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/users")
        .json(&json!({ "first_name": "X", "last_name": "Y", "email": "nope", "password": "pw" }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_missing_user_routes_are_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .put("/users/ghost@example.com")
        .json(&json!({ "first_name": "Ghost" }))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client.delete("/users/ghost@example.com").await;
    assert_eq!(response.status_code(), 404);

    let response = client.get("/users/ghost@example.com/id").await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .get("/users/id/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_update_to_taken_email_is_conflict() {
    let app = setup_test_app().await;
    let client = app.client();

    for email in ["one@example.com", "two@example.com"] {
        let response = client.post("/users").json(&create_user_body(email)).await;
        assert_eq!(response.status_code(), 201);
    }

    let response = client
        .put("/users/one@example.com")
        .json(&json!({ "email": "two@example.com" }))
        .await;
    assert_eq!(response.status_code(), 409);
}
