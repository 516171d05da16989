//! Catalog management service

use serde_json::{Map, Value};

use crate::{
    error::{AppResult, ErrorClassifier},
    models::Book,
    normalize::BookFields,
    repository::Repository,
    validation,
};

use super::parse_id;

/// Books carry no unique field today; a duplicate can only come from a
/// constraint added later and is reported as a 409.
const BOOKS: ErrorClassifier = ErrorClassifier::new("Book", "Book is already registered");

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book from a raw payload using any accepted field spelling
    pub async fn create_book(&self, input: &Map<String, Value>) -> AppResult<Book> {
        let book = validation::validate_new_book(BookFields::from_map(input))?;

        let created = self
            .repository
            .books
            .create(book)
            .await
            .map_err(|e| BOOKS.classify(e))?;

        tracing::info!(book_id = %created.id, title = %created.title, "book created");
        Ok(created)
    }

    /// List every book in the catalog
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .find_all()
            .await
            .map_err(|e| BOOKS.classify(e))
    }

    /// Get book by ID
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        let id = parse_id(id, &BOOKS)?;
        self.repository
            .books
            .find_by_id(id)
            .await
            .map_err(|e| BOOKS.classify(e))
    }

    /// Partially update a book.
    ///
    /// The whole payload is validated first; an invalid value leaves the
    /// stored book untouched.
    pub async fn update_book(&self, id: &str, input: &Map<String, Value>) -> AppResult<Book> {
        let id = parse_id(id, &BOOKS)?;
        let changes = validation::validate_book_changes(BookFields::from_map(input))?;

        let updated = self
            .repository
            .books
            .update_by_id(id, changes)
            .await
            .map_err(|e| BOOKS.classify(e))?;

        tracing::info!(book_id = %updated.id, "book updated");
        Ok(updated)
    }

    /// Delete a book, returns the number of deleted books (always 1)
    pub async fn delete_book(&self, id: &str) -> AppResult<u64> {
        let id = parse_id(id, &BOOKS)?;
        let deleted = self
            .repository
            .books
            .delete_by_id(id)
            .await
            .map_err(|e| BOOKS.classify(e))?;

        if deleted == 0 {
            return Err(BOOKS.not_found());
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(deleted)
    }
}
