//! API integration tests

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, AppConfig, AppState};

fn app() -> Router {
    api::create_router(AppState::new(AppConfig::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

fn book(name: &str, page_count: i64, read_page: i64, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

async fn create(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

async fn list(app: &Router, query: &str) -> Vec<String> {
    let (status, body) = send(app, Method::GET, &format!("/books{}", query), None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["books"]
        .as_array()
        .expect("No books array")
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    create(&app, book("Dune", 10, 1, false)).await;
    let (_, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_create_and_get_book() {
    let app = app();
    let payload = book("Dune", 100, 25, true);
    let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book added successfully");
    let id = body["data"]["bookId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 16);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());

    let stored = &body["data"]["book"];
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["name"], "Dune");
    assert_eq!(stored["year"], 2010);
    assert_eq!(stored["pageCount"], 100);
    assert_eq!(stored["readPage"], 25);
    assert_eq!(stored["finished"], false);
    assert_eq!(stored["reading"], true);
    assert_eq!(stored["insertedAt"], stored["updatedAt"]);
    assert!(stored["insertedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_create_finished_book() {
    let app = app();
    let id = create(&app, book("Done", 50, 50, false)).await;
    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["finished"], true);
}

#[tokio::test]
async fn test_create_without_name() {
    let app = app();
    let mut payload = book("x", 10, 1, false);
    payload.as_object_mut().unwrap().remove("name");

    let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": "fail", "message": "Failed to add book. Please provide the book name" })
    );
    assert!(list(&app, "").await.is_empty());
}

#[tokio::test]
async fn test_create_with_empty_name() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/books", Some(book("", 10, 1, false))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_with_read_page_over_page_count() {
    let app = app();
    let payload = book("Dune", 10, 20, false);
    let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Failed to add book. readPage must not be greater than pageCount"
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = json!({ "name": "x", "pageCount": "many" });
    let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_list_books() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "data": { "books": [] } }));

    let id = create(&app, book("Foobar", 10, 10, true)).await;
    create(&app, book("Dune", 10, 3, true)).await;
    create(&app, book("Moon", 10, 10, false)).await;

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    let first = &body["data"]["books"][0];
    assert_eq!(
        first,
        &json!({ "id": id, "name": "Foobar", "publisher": "Dicoding Indonesia" })
    );

    assert_eq!(list(&app, "").await, vec!["Foobar", "Dune", "Moon"]);
    assert_eq!(list(&app, "?name=OO").await, vec!["Foobar", "Moon"]);
    assert_eq!(list(&app, "?finished=1").await, vec!["Foobar", "Moon"]);
    assert_eq!(list(&app, "?finished=0").await, vec!["Dune"]);
    assert_eq!(list(&app, "?reading=1").await, vec!["Foobar", "Dune"]);
    assert_eq!(list(&app, "?reading=0").await, vec!["Moon"]);
    assert_eq!(list(&app, "?reading=1&finished=1&name=bar").await, vec!["Foobar"]);
    assert!(list(&app, "?name=zzz").await.is_empty());
}

#[tokio::test]
async fn test_list_with_repeated_query_keys() {
    let app = app();
    create(&app, book("Alpha", 10, 1, false)).await;
    create(&app, book("Beta", 10, 1, false)).await;

    let (status, body) = send(&app, Method::GET, "/books?name=a&name=b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(list(&app, "?name=lph&name=bet").await, vec!["Alpha"]);
    assert_eq!(list(&app, "?finished=0&finished=1").await, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_create_with_fractional_counts() {
    let app = app();
    let payload = json!({ "name": "x", "pageCount": 100.0, "readPage": 100 });
    let id = create(&app, payload).await;
    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["finished"], true);

    let payload = json!({ "name": "y", "pageCount": 100.5, "readPage": 5 });
    let id = create(&app, payload).await;
    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["finished"], false);
    assert_eq!(body["data"]["book"]["pageCount"], 100.5);
    assert_eq!(body["data"]["book"]["readPage"], 5);

    let payload = json!({ "name": "z", "pageCount": 5, "readPage": 5.5 });
    let (status, _) = send(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_null_name() {
    let app = app();
    let payload = json!({ "name": null, "pageCount": 10, "readPage": 1 });
    let id = create(&app, payload).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["name"], Value::Null);
    assert!(list(&app, "?name=x").await.is_empty());
}

#[tokio::test]
async fn test_get_unknown_book() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/xxxxx", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "fail", "message": "Book not found" }));
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = create(&app, book("Dune", 100, 10, false)).await;
    let uri = format!("/books/{}", id);
    let (_, before) = send(&app, Method::GET, &uri, None).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let payload = book("Dune Messiah", 200, 200, true);
    let (status, body) = send(&app, Method::PUT, &uri, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "message": "Book updated successfully" }));

    let (_, after) = send(&app, Method::GET, &uri, None).await;
    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["name"], "Dune Messiah");
    assert_eq!(after["pageCount"], 200);
    assert_eq!(after["readPage"], 200);
    assert_eq!(after["reading"], true);
    assert_eq!(after["finished"], true);
}

#[tokio::test]
async fn test_update_rejections() {
    let app = app();
    let id = create(&app, book("Dune", 100, 10, false)).await;
    let uri = format!("/books/{}", id);
    let (_, before) = send(&app, Method::GET, &uri, None).await;

    let (status, body) = send(&app, Method::PUT, &uri, Some(book("Dune", 5, 6, false))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Failed to update book. readPage must not be greater than pageCount"
    );

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "pageCount": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update book. Please provide the book name");

    let (_, after) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(after, before);

    let payload = book("Dune", 1, 1, false);
    let (status, body) = send(&app, Method::PUT, "/books/xxxxx", Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "fail", "message": "Failed to update book. Id not found" }));
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    create(&app, book("Keep", 10, 1, false)).await;
    let id = create(&app, book("Gone", 10, 1, false)).await;
    let uri = format!("/books/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "message": "Book deleted successfully" }));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "fail", "message": "Failed to delete book. Id not found" }));

    assert_eq!(list(&app, "").await, vec!["Keep"]);
}
