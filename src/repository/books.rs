//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{Book, BookChanges, NewBook};

use super::{BookStore, StoreError, StoreResult};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, publication_date, genre, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, author, publication_date, genre, stock
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publication_date)
        .bind(&book.genre)
        .bind(book.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, publication_date, genre, stock
            FROM books
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, publication_date, genre, stock
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: Uuid, changes: BookChanges) -> StoreResult<Book> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publication_date = COALESCE($4, publication_date),
                genre = COALESCE($5, genre),
                stock = COALESCE($6, stock)
            WHERE id = $1
            RETURNING id, title, author, publication_date, genre, stock
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(changes.publication_date)
        .bind(&changes.genre)
        .bind(changes.stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
