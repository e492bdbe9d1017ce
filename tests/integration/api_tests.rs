//! API integration tests
//!
//! These run against a live server backed by a real database:
//! start the server, then run `cargo test -- --ignored`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("LIBRARY_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// ISBNs must be unique, so every test makes its own
fn unique_isbn() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("978{}", nanos % 10_000_000_000)
}

/// Helper to create a book and return its id
async fn create_book(client: &Client, copies: i64) -> String {
    let response = client
        .post(format!("{}/api/books", base_url()))
        .json(&json!({
            "title": "Integration Test Book",
            "author": "Test Author",
            "genre": "SCIENCE",
            "isbn": unique_isbn(),
            "description": "Created by the integration suite",
            "copies": copies
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse create response");
    body["data"]["_id"].as_str().expect("No book ID").to_string()
}

async fn get_book(client: &Client, id: &str) -> Value {
    let response = client
        .get(format!("{}/api/books/{}", base_url(), id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

async fn borrow(client: &Client, id: &str, quantity: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/borrow", base_url()))
        .json(&json!({
            "book": id,
            "quantity": quantity,
            "dueDate": "2030-01-01T00:00:00.000Z"
        }))
        .send()
        .await
        .expect("Failed to send borrow request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_get_update_delete_book() {
    let client = Client::new();
    let id = create_book(&client, 2).await;

    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 2);
    assert_eq!(book["available"], true);

    let response = client
        .put(format!("{}/api/books/{}", base_url(), id))
        .json(&json!({ "copies": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["available"], false);

    let response = client
        .delete(format!("{}/api/books/{}", base_url(), id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/api/books/{}", base_url(), id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflict() {
    let client = Client::new();
    let isbn = unique_isbn();
    let payload = json!({
        "title": "Twice",
        "author": "Someone",
        "genre": "FICTION",
        "isbn": isbn,
        "copies": 1
    });

    let first = client
        .post(format!("{}/api/books", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/api/books", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_list_books_with_invalid_genre() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/books?filter=ROMANCE", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_borrow_updates_copies() {
    let client = Client::new();
    let id = create_book(&client, 3).await;

    let response = borrow(&client, &id, 2).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["quantity"], 2);
    assert_eq!(body["data"]["book"], id.as_str());

    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 1);
    assert_eq!(book["available"], true);

    let response = borrow(&client, &id, 1).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 0);
    assert_eq!(book["available"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_more_than_available() {
    let client = Client::new();
    let id = create_book(&client, 1).await;

    let response = borrow(&client, &id, 2).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_borrow_summary_totals() {
    let client = Client::new();
    let book_a = create_book(&client, 10).await;
    let book_b = create_book(&client, 10).await;

    for (id, quantity) in [(&book_a, 2), (&book_a, 3), (&book_b, 1)] {
        assert_eq!(borrow(&client, id, quantity).await.status(), StatusCode::CREATED);
    }

    let a = get_book(&client, &book_a).await;
    let b = get_book(&client, &book_b).await;

    let response = client
        .get(format!("{}/api/borrow", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    let summary = body["data"].as_array().expect("summary is a list");

    let total_for = |isbn: &Value| {
        summary
            .iter()
            .find(|entry| &entry["book"]["isbn"] == isbn)
            .map(|entry| entry["totalQuantity"].clone())
    };
    assert_eq!(total_for(&a["isbn"]), Some(json!(5)));
    assert_eq!(total_for(&b["isbn"]), Some(json!(1)));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_never_exceed_copies() {
    let client = Client::new();
    let copies = 3;
    let id = create_book(&client, copies).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let client = client.clone();
        let id = id.clone();
        tasks.spawn(async move { borrow(&client, &id, 1).await.status() });
    }

    let mut succeeded = 0;
    while let Some(status) = tasks.join_next().await {
        if status.expect("borrow task panicked") == StatusCode::CREATED {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, copies);
    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 0);
    assert_eq!(book["available"], false);
}
