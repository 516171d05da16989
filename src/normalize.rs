//! Field-name normalization for book payloads.
//!
//! Clients send books with Spanish or English field names, and a few legacy
//! spellings on top of that. Every logical field has an ordered list of
//! accepted keys; the first key present with a non-null value wins.

use serde_json::{Map, Value};

pub const TITLE_KEYS: &[&str] = &["titulo", "title"];
pub const AUTHOR_KEYS: &[&str] = &["autor", "author"];
pub const DATE_KEYS: &[&str] = &["anio", "anioPublicacion", "year", "publicationDate", "date"];
pub const GENRE_KEYS: &[&str] = &["genero", "gender", "genre"];
pub const STOCK_KEYS: &[&str] = &["stock"];

/// Canonical book record, values still raw JSON
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFields {
    pub title: Option<Value>,
    pub author: Option<Value>,
    pub publication_date: Option<Value>,
    pub genre: Option<Value>,
    pub stock: Option<Value>,
}

impl BookFields {
    pub fn from_map(input: &Map<String, Value>) -> Self {
        Self {
            title: pick(input, TITLE_KEYS),
            author: pick(input, AUTHOR_KEYS),
            publication_date: pick(input, DATE_KEYS),
            genre: pick(input, GENRE_KEYS),
            stock: pick(input, STOCK_KEYS),
        }
    }
}

/// First non-null value among `keys`, in order
fn pick(input: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| input.get(*key))
        .find(|value| !value.is_null())
        .cloned()
}
