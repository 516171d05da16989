//! Router-level tests against the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca_server::{api, repository::Repository, services::Services, AppState};

fn app() -> Router {
    let services = Services::new(Repository::in_memory()).expect("services");
    api::create_router(AppState {
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn dune() -> Value {
    json!({
        "title": "Dune",
        "author": "Herbert",
        "date": "1965-08-01",
        "genre": "Sci-Fi",
        "stock": 3
    })
}

#[tokio::test]
async fn welcome_and_health() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Bienvenido a la API");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn book_create_update_list() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    let id = body["libro"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["libro"]["stock"], 3);
    assert_eq!(body["libro"]["anio"], "1965-08-01");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{id}"),
        Some(json!({ "stock": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["libro"]["stock"], 5);
    assert_eq!(body["libro"]["titulo"], "Dune");

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let matching = body
        .as_array()
        .expect("list")
        .iter()
        .filter(|b| b["id"] == id.as_str())
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn spanish_routes_under_api_prefix() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/libro",
        Some(json!({
            "titulo": "Rayuela",
            "autor": "Cortázar",
            "anioPublicacion": 1963,
            "genero": "Novela",
            "stock": "2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["libro"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["libro"]["anio"], "1963-01-01");
    assert_eq!(body["libro"]["stock"], 2);

    let (status, body) = send(&app, Method::GET, "/api/libros", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["autor"], "Cortázar");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/libro/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/libro/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_book_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "title": "Dune", "author": "Herbert", "stock": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_date_leaves_book_untouched() {
    let app = app();

    let (_, body) = send(&app, Method::POST, "/books", Some(dune())).await;
    let id = body["libro"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/books/{id}"),
        Some(json!({ "stock": 9, "anio": "not a date" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 3);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = app();

    for uri in [
        "/books/not-an-id",
        "/books/00000000-0000-0000-0000-000000000000",
        "/users/not-an-id",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], 20);
    }
}

#[tokio::test]
async fn non_json_body_is_a_bad_request() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/users", Some(json!("Ana"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_registration_and_login() {
    let app = app();
    let ana = json!({ "name": "Ana", "email": "a@x.com", "password": "secret" });

    let (status, body) = send(&app, Method::POST, "/users", Some(ana.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, body) = send(&app, Method::POST, "/users", Some(ana)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "email": "a@x.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");
    assert!(!body.to_string().contains("argon2"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({ "email": "nobody@x.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_update_and_delete() {
    let app = app();

    let (_, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "Ana", "email": "a@x.com", "password": "secret" })),
    )
    .await;
    let id = body["user"]["id"].as_str().expect("id").to_string();
    send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "Luis", "email": "l@x.com", "password": "secret" })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        Some(json!({ "email": "l@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        Some(json!({ "name": "Ana María", "password": "changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana María");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "email": "a@x.com", "password": "changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana María");

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
