//! Book (catalog) endpoints
//!
//! Each handler is mounted twice, `/books...` and `/libro...` (`/libros` for
//! the list).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{error::AppResult, models::Book};

use super::JsonBody;

/// Created or updated book
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub ok: bool,
    pub libro: Book,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteBookResponse {
    pub ok: bool,
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&id).await?;
    Ok(Json(book))
}

/// Create a new book
///
/// Field names may be Spanish or English (`titulo`/`title`,
/// `anio`/`anioPublicacion`/`year`/`date`, `genero`/`gender`/`genre`).
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = crate::models::book::BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Missing fields or invalid date", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(input), _): JsonBody<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let created = state.services.catalog.create_book(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            ok: true,
            libro: created,
        }),
    ))
}

/// Update an existing book, only supplied fields change
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = crate::models::book::BookPayload,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): JsonBody<Map<String, Value>>,
) -> AppResult<Json<BookResponse>> {
    let updated = state.services.catalog.update_book(&id, &input).await?;
    Ok(Json(BookResponse {
        ok: true,
        libro: updated,
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteBookResponse>> {
    let deleted_count = state.services.catalog.delete_book(&id).await?;
    Ok(Json(DeleteBookResponse {
        ok: true,
        deleted_count,
    }))
}
