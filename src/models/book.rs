//! Book (catalog entry) model and related types.
//!
//! Books keep the Spanish field names of the original catalog on the wire
//! (`titulo`, `autor`, `anio`, `genero`); the columns use the English names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Book as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Identifier generated by the store
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    /// Publication date
    #[serde(rename = "anio")]
    pub publication_date: NaiveDate,
    /// Free text category, not an enumeration
    #[serde(rename = "genero")]
    pub genre: String,
    /// Copies available, negative values are not rejected
    pub stock: i32,
}

/// Validated book ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    pub stock: i32,
}

/// Validated partial update, `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub stock: Option<i32>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publication_date.is_none()
            && self.genre.is_none()
            && self.stock.is_none()
    }

    /// Apply the present fields on top of `book`
    pub fn apply(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
        if let Some(date) = self.publication_date {
            book.publication_date = date;
        }
        if let Some(ref genre) = self.genre {
            book.genre = genre.clone();
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
    }
}

impl NewBook {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            publication_date: self.publication_date,
            genre: self.genre,
            stock: self.stock,
        }
    }
}

/// Request body accepted by the create and update endpoints.
///
/// Only documents the preferred spelling of each field; the synonyms listed
/// in [`crate::normalize`] are accepted as well.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookPayload {
    #[schema(example = "Dune")]
    pub titulo: Option<String>,
    #[schema(example = "Frank Herbert")]
    pub autor: Option<String>,
    #[schema(example = "1965-08-01")]
    pub anio: Option<String>,
    #[schema(example = "Sci-Fi")]
    pub genero: Option<String>,
    #[schema(example = 3)]
    pub stock: Option<i32>,
}
