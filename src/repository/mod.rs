//! Repository layer: store contracts and their adapters.
//!
//! The services only see [`BookStore`] and [`UserStore`]. Production uses the
//! PostgreSQL adapters; tests and database-less runs use the in-memory ones.

pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, BookChanges, NewBook, NewUserRecord, UserChanges, UserRecord};

/// Failures reported by a store, before classification
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("record not found")]
    NotFound,

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateKey(db.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for the book collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book, the store generates its id
    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Book>;

    /// Apply the present fields only; empty changes return the book as is
    async fn update_by_id(&self, id: Uuid, changes: BookChanges) -> StoreResult<Book>;

    /// Number of deleted books, 0 or 1
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64>;
}

/// Persistence contract for the user collection.
///
/// Email uniqueness is enforced atomically by the store: of two concurrent
/// writes with the same email exactly one fails with
/// [`StoreError::DuplicateKey`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUserRecord) -> StoreResult<UserRecord>;

    async fn find_all(&self) -> StoreResult<Vec<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<UserRecord>;

    /// Exact match on the login email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> StoreResult<UserRecord>;

    /// Delete and return the removed user, `None` if there was none
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;
}

/// Store handles shared by the services
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Create a repository keeping everything in process memory
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(memory::InMemoryBookStore::new()),
            users: Arc::new(memory::InMemoryUserStore::new()),
        }
    }

    pub fn from_stores(books: Arc<dyn BookStore>, users: Arc<dyn UserStore>) -> Self {
        Self { books, users }
    }
}
