//! API integration tests
//!
//! Require a running server with a migrated database.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so repeated runs do not collide on unique columns
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn post(client: &Client, path: &str, payload: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get(client: &Client, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn delete(client: &Client, path: &str) -> StatusCode {
    client
        .delete(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

async fn put(client: &Client, path: &str, payload: Value) -> (StatusCode, Value) {
    let response = client
        .put(format!("{}{}", BASE_URL, path))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn create_student(client: &Client, name: &str) -> i64 {
    let registration = unique("REG");
    let (status, body) = post(
        client,
        "/students",
        json!({
            "name": name,
            "registration": registration,
            "course": "Computer Science",
            "email": format!("{}@example.com", registration.to_lowercase())
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No student id")
}

async fn create_book(client: &Client, title: &str) -> i64 {
    let (status, body) = post(
        client,
        "/books",
        json!({
            "title": title,
            "year": 2008,
            "isbn": unique("ISBN"),
            "category": "Software"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No book id")
}

async fn create_author(client: &Client, name: &str) -> i64 {
    let (status, body) = post(client, "/authors", json!({ "name": name, "nationality": "American" })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No author id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let (status, body) = get(&client, "/health").await;
    assert!(status.is_success());
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_one_active_loan_per_pair() {
    let client = Client::new();
    let ana = create_student(&client, "Ana").await;
    let clean_code = create_book(&client, "Clean Code").await;

    let loan = json!({
        "student_id": ana,
        "book_id": clean_code,
        "loan_date": "2024-03-01",
        "expected_return_date": "2024-03-15"
    });

    let (status, first) = post(&client, "/loans", loan.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "active");

    // Same pair while the first loan is active
    let (status, body) = post(&client, "/loans", loan.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    // Return it, then borrowing again is allowed
    let loan_id = first["id"].as_i64().expect("No loan id");
    let (status, returned) = post(
        &client,
        &format!("/loans/{}/return", loan_id),
        json!({ "returned_on": "2024-03-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "returned");
    assert_eq!(returned["actual_return_date"], "2024-03-10");

    let (status, _) = post(&client, &format!("/loans/{}/return", loan_id), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(&client, "/loans", loan).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&client, &format!("/students/{}/loans", ana)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
#[ignore]
async fn test_loan_update_guard() {
    let client = Client::new();
    let ana = create_student(&client, "Ana").await;
    let bruno = create_student(&client, "Bruno").await;
    let clean_code = create_book(&client, "Clean Code").await;

    let loan = json!({
        "student_id": ana,
        "book_id": clean_code,
        "loan_date": "2024-01-01",
        "expected_return_date": "2024-01-15"
    });
    let (status, first) = post(&client, "/loans", loan.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["id"].as_i64().expect("No loan id");

    let (status, _) = post(&client, "/loans", loan.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Returning through a partial update frees the pair
    let (status, returned) = put(
        &client,
        &format!("/loans/{}", first_id),
        json!({ "actual_return_date": "2024-01-10" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "returned");
    assert_eq!(returned["expected_return_date"], "2024-01-15");

    let (status, second) = post(&client, "/loans", loan).await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = second["id"].as_i64().expect("No loan id");

    // Re-sending its own pair does not collide with itself
    let (status, same_pair) = put(
        &client,
        &format!("/loans/{}", second_id),
        json!({ "student_id": ana, "book_id": clean_code, "expected_return_date": "2024-01-20" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same_pair["expected_return_date"], "2024-01-20");

    // Moving another active loan onto Ana's pair
    let (status, other) = post(
        &client,
        "/loans",
        json!({
            "student_id": bruno,
            "book_id": clean_code,
            "loan_date": "2024-01-02",
            "expected_return_date": "2024-01-16"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_id = other["id"].as_i64().expect("No loan id");

    let (status, body) = put(&client, &format!("/loans/{}", other_id), json!({ "student_id": ana })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, body) = put(&client, &format!("/loans/{}", other_id), json!({ "book_id": 999_999_999 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    // Rejected updates left the loan untouched
    let (_, unchanged) = get(&client, &format!("/loans/{}", other_id)).await;
    assert_eq!(unchanged["student"]["id"].as_i64(), Some(bruno));
    assert_eq!(unchanged["book"]["id"].as_i64(), Some(clean_code));
}

#[tokio::test]
#[ignore]
async fn test_overdue_report() {
    let client = Client::new();
    let student = create_student(&client, "Bruno").await;
    let book = create_book(&client, "Refactoring").await;

    let (status, created) = post(
        &client,
        "/loans",
        json!({
            "student_id": student,
            "book_id": book,
            "loan_date": "2024-01-01",
            "expected_return_date": "2024-01-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = created["id"].as_i64().expect("No loan id");

    // Due date itself is not overdue
    let (_, on_due) = get(&client, "/loans/overdue?as_of=2024-01-15&per_page=100").await;
    let ids: Vec<i64> = on_due["items"]
        .as_array()
        .expect("No items")
        .iter()
        .filter_map(|l| l["id"].as_i64())
        .collect();
    assert!(!ids.contains(&loan_id));

    let (_, after_due) = get(&client, &format!("/loans?book_id={}&status=overdue", book)).await;
    assert_eq!(after_due["total"], 1);
    assert_eq!(after_due["items"][0]["is_overdue"], true);
    assert_eq!(after_due["items"][0]["student"]["name"], "Bruno");

    let (status, _) = post(&client, &format!("/loans/{}/return", loan_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after_return) = get(&client, &format!("/loans?book_id={}&status=overdue", book)).await;
    assert_eq!(after_return["total"], 0);
}

#[tokio::test]
#[ignore]
async fn test_author_book_linking() {
    let client = Client::new();
    let knuth = create_author(&client, "Donald Knuth").await;
    let volume_1 = create_book(&client, "TAOCP Vol. 1").await;
    let volume_2 = create_book(&client, "TAOCP Vol. 2").await;
    let volume_3 = create_book(&client, "TAOCP Vol. 3").await;

    for book in [volume_1, volume_2] {
        let (status, _) = post(&client, &format!("/books/{}/authors/{}", book, knuth), json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    // Linking works from the author side too
    let (status, link) = post(&client, &format!("/authors/{}/books/{}", knuth, volume_3), json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["book_id"].as_i64(), Some(volume_3));

    let (_, books) = get(&client, &format!("/authors/{}/books", knuth)).await;
    assert_eq!(books["total"], 3);

    let (status, body) = post(&client, &format!("/books/{}/authors/{}", volume_1, knuth), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    assert_eq!(
        delete(&client, &format!("/books/{}/authors/{}", volume_2, knuth)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete(&client, &format!("/books/{}/authors/{}", volume_2, knuth)).await,
        StatusCode::NOT_FOUND
    );

    let (_, books) = get(&client, &format!("/authors/{}/books", knuth)).await;
    assert_eq!(books["total"], 2);

    let (_, authors) = get(&client, &format!("/books/{}/authors", volume_2)).await;
    assert_eq!(authors.as_array().map(Vec::len), Some(0));

    // Search reaches books through the author name
    let (_, found) = get(&client, "/books/search?q=knuth&per_page=100").await;
    let titles: Vec<&str> = found["items"]
        .as_array()
        .expect("No items")
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert!(titles.contains(&"TAOCP Vol. 1"));
}

#[tokio::test]
#[ignore]
async fn test_create_loan_with_missing_references() {
    let client = Client::new();
    let student = create_student(&client, "Carla").await;

    let (status, body) = post(
        &client,
        "/loans",
        json!({
            "student_id": student,
            "book_id": 999_999_999,
            "loan_date": "2024-03-01",
            "expected_return_date": "2024-03-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
#[ignore]
async fn test_link_missing_author() {
    let client = Client::new();
    let book = create_book(&client, "Orphan Book").await;

    let (status, _) = post(&client, &format!("/books/{}/authors/999999999", book), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_student_with_loans_cannot_be_deleted() {
    let client = Client::new();
    let student = create_student(&client, "Diego").await;
    let book = create_book(&client, "Domain-Driven Design").await;

    let (status, _) = post(
        &client,
        "/loans",
        json!({
            "student_id": student,
            "book_id": book,
            "loan_date": "2024-03-01",
            "expected_return_date": "2024-03-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = client
        .delete(format!("{}/students/{}", BASE_URL, student))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "StillReferenced");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration() {
    let client = Client::new();
    let registration = unique("DUP");
    let payload = json!({
        "name": "Eva",
        "registration": registration,
        "course": "Mathematics",
        "email": format!("{}@example.com", registration.to_lowercase())
    });

    let (status, _) = post(&client, "/students", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut second = payload;
    second["email"] = json!(format!("other-{}@example.com", registration.to_lowercase()));
    let (status, body) = post(&client, "/students", second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Registration number already in use");
}

#[tokio::test]
#[ignore]
async fn test_stats() {
    let client = Client::new();

    let (status, body) = get(&client, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    let total = body["total_loans"].as_i64().expect("No total_loans");
    let active = body["active_loans"].as_i64().expect("No active_loans");
    let finished = body["finished_loans"].as_i64().expect("No finished_loans");
    assert_eq!(total, active + finished);
}
