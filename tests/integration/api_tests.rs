//! API integration tests against a running server with a fresh database.
//!
//! Run with: cargo test --test api_tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Roll numbers and book names unique across runs (roll numbers max out at 20 chars)
fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{}", prefix, nanos % 1_000_000_000_000)
}

async fn login(client: &Client, body: Value) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(
        client,
        json!({ "user_type": "admin", "username": "Captain", "password": "Captain123" }),
    )
    .await
}

async fn register_student(client: &Client, name: &str, roll_number: &str) -> String {
    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({ "name": name, "roll_number": roll_number, "password": "p" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    login(
        client,
        json!({ "user_type": "student", "roll_number": roll_number, "password": "p" }),
    )
    .await
}

async fn add_book(client: &Client, token: &str, name: &str, quantity: i32) -> Value {
    let response = client
        .post(format!("{}/admin/add_book", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    body["book"].clone()
}

async fn get(client: &Client, token: &str, path: &str) -> reqwest::Response {
    client
        .get(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
}

async fn json(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

fn find_book(dashboard: &Value, book_id: i64) -> Value {
    dashboard["books"]
        .as_array()
        .expect("books array")
        .iter()
        .find(|b| b["id"].as_i64() == Some(book_id))
        .cloned()
        .expect("book listed")
}

fn pending_request(dashboard: &Value, borrow_id: i64) -> Option<Value> {
    dashboard["pending_requests"]
        .as_array()
        .expect("pending_requests array")
        .iter()
        .find(|r| r["id"].as_i64() == Some(borrow_id))
        .cloned()
}

async fn borrow(client: &Client, token: &str, book_id: i64) -> i64 {
    let response = get(client, token, &format!("/student/borrow/{}", book_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json(response).await["borrowing"]["id"].as_i64().unwrap()
}

async fn handle(client: &Client, admin: &str, borrow_id: i64, action: &str) -> reqwest::Response {
    get(client, admin, &format!("/admin/handle_request/{}/{}", borrow_id, action)).await
}

/// A student holds a book exactly when one approved borrowing is theirs,
/// and that borrowing is for the book they hold.
async fn assert_single_loan(client: &Client, token: &str) {
    let dashboard = json(get(client, token, "/student/dashboard").await).await;
    let history = json(get(client, token, "/student/borrowings").await).await;

    let approved: Vec<&Value> = history
        .as_array()
        .expect("borrowings array")
        .iter()
        .filter(|b| b["status"] == "approved")
        .collect();
    let has_book = dashboard["student"]["has_book"].as_bool().expect("has_book flag");

    assert!(approved.len() <= 1, "more than one approved borrowing: {:?}", approved);
    assert_eq!(has_book, approved.len() == 1);
    assert_eq!(
        dashboard["student"]["borrowed_book_id"],
        approved.first().map(|b| b["book_id"].clone()).unwrap_or(Value::Null)
    );
}

#[tokio::test]
#[ignore]
async fn test_full_borrow_and_return_cycle() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let alice = register_student(&client, "Alice", &unique("R1")).await;

    let book = add_book(&client, &admin, &unique("Go"), 1).await;
    let book_id = book["id"].as_i64().unwrap();
    assert_eq!(book["quantity"], 1);

    // Borrow: pending, quantity untouched
    let response = get(&client, &alice, &format!("/student/borrow/{}", book_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let borrowing = json(response).await["borrowing"].clone();
    assert_eq!(borrowing["status"], "pending");
    let borrow_id = borrowing["id"].as_i64().unwrap();

    let dashboard = json(get(&client, &admin, "/admin/dashboard").await).await;
    assert!(pending_request(&dashboard, borrow_id).is_some());
    assert_eq!(find_book(&dashboard, book_id)["quantity"], 1);

    // Approve: quantity 0, student holds the book
    let response = get(&client, &admin, &format!("/admin/handle_request/{}/approve", borrow_id)).await;
    assert!(response.status().is_success());
    let body = json(response).await;
    assert_eq!(body["message"], "Request approved");
    assert_eq!(body["borrowing"]["status"], "approved");

    let dashboard = json(get(&client, &alice, "/student/dashboard").await).await;
    assert_eq!(dashboard["student"]["has_book"], true);
    assert_eq!(dashboard["borrowed_book"]["id"].as_i64(), Some(book_id));
    assert_eq!(find_book(&dashboard, book_id)["quantity"], 0);

    // A second request while holding a book is refused
    let response = get(&client, &alice, &format!("/student/borrow/{}", book_id)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["message"], "You already have a book borrowed");

    // Return: quantity 1, flag cleared
    let response = get(&client, &alice, "/student/return").await;
    assert!(response.status().is_success());
    let body = json(response).await;
    assert_eq!(body["message"], "Book returned successfully");
    assert_eq!(body["borrowing"]["status"], "returned");

    let dashboard = json(get(&client, &alice, "/student/dashboard").await).await;
    assert_eq!(dashboard["student"]["has_book"], false);
    assert!(dashboard["borrowed_book"].is_null());
    assert_eq!(find_book(&dashboard, book_id)["quantity"], 1);

    // Nothing left to return
    let response = get(&client, &alice, "/student/return").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let history = json(get(&client, &admin, &format!("/admin/books/{}/borrowings", book_id)).await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "returned");
}

#[tokio::test]
#[ignore]
async fn test_second_approval_fails_when_no_copies_left() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let first = register_student(&client, "First", &unique("S1")).await;
    let second = register_student(&client, "Second", &unique("S2")).await;

    let book = add_book(&client, &admin, &unique("Rust"), 1).await;
    let book_id = book["id"].as_i64().unwrap();

    let mut ids = Vec::new();
    for token in [&first, &second] {
        let response = get(&client, token, &format!("/student/borrow/{}", book_id)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(json(response).await["borrowing"]["id"].as_i64().unwrap());
    }

    let response = get(&client, &admin, &format!("/admin/handle_request/{}/approve", ids[0])).await;
    assert!(response.status().is_success());

    let response = get(&client, &admin, &format!("/admin/handle_request/{}/approve", ids[1])).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["message"], "Book not available");

    let dashboard = json(get(&client, &admin, "/admin/dashboard").await).await;
    let still_pending = pending_request(&dashboard, ids[1]).expect("second request still pending");
    assert_eq!(still_pending["status"], "pending");
    assert_eq!(find_book(&dashboard, book_id)["quantity"], 0);

    // Rejecting is still possible, and terminal
    let response = get(&client, &admin, &format!("/admin/handle_request/{}/reject", ids[1])).await;
    assert_eq!(json(response).await["borrowing"]["status"], "rejected");

    let response = get(&client, &admin, &format!("/admin/handle_request/{}/approve", ids[1])).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_roll_number_is_rejected() {
    let client = Client::new();
    let roll_number = unique("DUP");
    register_student(&client, "Original", &roll_number).await;

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({ "name": "Copy", "roll_number": roll_number, "password": "other" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json(response).await["message"], "Roll number already exists");

    // The second password was never stored
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "user_type": "student", "roll_number": roll_number, "password": "other" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_restock_adds_to_existing_title() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let name = unique("Restock");

    let first = add_book(&client, &admin, &name, 2).await;
    let second = add_book(&client, &admin, &name, 3).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["quantity"], 5);
}

#[tokio::test]
#[ignore]
async fn test_invalid_admin_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "user_type": "admin", "username": "Captain", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(response).await["message"], "Invalid admin credentials");
}

#[tokio::test]
#[ignore]
async fn test_unknown_borrow_request_is_not_found() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = get(&client, &admin, "/admin/handle_request/2147483647/approve").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_approval_refused_while_student_holds_a_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let student = register_student(&client, "Two Requests", &unique("TR")).await;

    let first = add_book(&client, &admin, &unique("First"), 1).await;
    let second = add_book(&client, &admin, &unique("Second"), 2).await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    // Both requests are accepted while the student holds nothing
    let held = borrow(&client, &student, first_id).await;
    let waiting = borrow(&client, &student, second_id).await;

    let response = handle(&client, &admin, held, "approve").await;
    assert!(response.status().is_success());

    let response = handle(&client, &admin, waiting, "approve").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["message"], "Student already has a book borrowed");

    let dashboard = json(get(&client, &admin, "/admin/dashboard").await).await;
    let request = pending_request(&dashboard, waiting).expect("request still pending");
    assert_eq!(request["status"], "pending");
    assert_eq!(find_book(&dashboard, second_id)["quantity"], 2);
    assert_eq!(find_book(&dashboard, first_id)["quantity"], 0);

    assert_single_loan(&client, &student).await;
}

#[tokio::test]
#[ignore]
async fn test_has_book_tracks_single_approved_borrowing() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let student = register_student(&client, "Invariant", &unique("IV")).await;

    let first_id = add_book(&client, &admin, &unique("Inv A"), 1).await["id"].as_i64().unwrap();
    let second_id = add_book(&client, &admin, &unique("Inv B"), 1).await["id"].as_i64().unwrap();
    assert_single_loan(&client, &student).await;

    let held = borrow(&client, &student, first_id).await;
    let waiting = borrow(&client, &student, second_id).await;
    assert_single_loan(&client, &student).await;

    assert!(handle(&client, &admin, held, "approve").await.status().is_success());
    assert_single_loan(&client, &student).await;

    // Refused while the first book is out
    let response = handle(&client, &admin, waiting, "approve").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_single_loan(&client, &student).await;

    assert!(get(&client, &student, "/student/return").await.status().is_success());
    assert_single_loan(&client, &student).await;

    // Once the first book is back the waiting request can go through
    let response = handle(&client, &admin, waiting, "approve").await;
    assert!(response.status().is_success());
    assert_single_loan(&client, &student).await;

    let dashboard = json(get(&client, &student, "/student/dashboard").await).await;
    assert_eq!(dashboard["borrowed_book"]["id"].as_i64(), Some(second_id));

    assert!(get(&client, &student, "/student/return").await.status().is_success());
    assert_single_loan(&client, &student).await;
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_is_not_found_while_holding_a_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let student = register_student(&client, "Holder", &unique("HB")).await;

    let book_id = add_book(&client, &admin, &unique("Held"), 1).await["id"].as_i64().unwrap();
    let held = borrow(&client, &student, book_id).await;
    assert!(handle(&client, &admin, held, "approve").await.status().is_success());

    let response = get(&client, &student, "/student/borrow/2147483647").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["error"], "NotFound");
}
