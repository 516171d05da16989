//! API handlers for Biblioteca REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections use the API error format
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

/// Create the application router with all routes.
///
/// Every route has a Spanish and an English spelling. The whole table is
/// served at the root and again under `/api`.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Books
        .route("/libro", post(books::create_book))
        .route("/libros", get(books::list_books))
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/libro/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/login", post(users::login))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(state);

    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .merge(routes.clone())
        .nest("/api", routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
