//! In-memory store adapters.
//!
//! Used by the test suites and by `database.backend = "memory"`. Records live
//! in insertion order behind a `RwLock`; uniqueness is checked and the record
//! inserted under the same write guard.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Book, BookChanges, NewBook, NewUserRecord, UserChanges, UserRecord};

use super::{BookStore, StoreError, StoreResult, UserStore};

#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let book = book.into_book(Uuid::new_v4());
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: Uuid, changes: BookChanges) -> StoreResult<Book> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;
        changes.apply(book);
        Ok(book.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok((before - books.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email() -> StoreError {
    StoreError::DuplicateKey("users_email_key".to_string())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUserRecord) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<UserRecord> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(ref email) = changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(duplicate_email());
            }
        }

        let user = &mut users[index];
        if changes.is_empty() {
            return Ok(user.clone());
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password_hash {
            user.password = password;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let mut users = self.users.write().await;
        let position = users.iter().position(|user| user.id == id);
        Ok(position.map(|index| users.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;

    fn new_book() -> NewBook {
        NewBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            publication_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            genre: "Sci-Fi".into(),
            stock: 3,
        }
    }

    fn new_user(email: &str) -> NewUserRecord {
        NewUserRecord {
            name: "Ana".into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        }
    }

    #[tokio::test]
    async fn book_round_trip() {
        let store = InMemoryBookStore::new();
        let created = store.create(new_book()).await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, new_book().into_book(created.id));
    }

    #[tokio::test]
    async fn empty_update_keeps_book() {
        let store = InMemoryBookStore::new();
        let created = store.create(new_book()).await.unwrap();
        let updated = store
            .update_by_id(created.id, BookChanges::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let store = InMemoryBookStore::new();
        let created = store.create(new_book()).await.unwrap();
        assert_eq!(store.delete_by_id(created.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(created.id).await.unwrap(), 0);
        assert!(matches!(
            store.find_by_id(created.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn missing_book_update_is_not_found() {
        let store = InMemoryBookStore::new();
        let result = store
            .update_by_id(Uuid::new_v4(), BookChanges::default())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_with_same_email_yield_one_success() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("a@x.com")).await })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::DuplicateKey(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_duplicate() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();
        let other = store.create(new_user("b@x.com")).await.unwrap();

        let result = store
            .update_by_id(
                other.id,
                UserChanges {
                    email: Some("a@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(_))));

        // keeping its own email is not a conflict
        let same = store
            .update_by_id(
                other.id,
                UserChanges {
                    email: Some("b@x.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.email, "b@x.com");
    }

    #[tokio::test]
    async fn missing_user_update_is_not_found_even_with_taken_email() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();

        let result = store
            .update_by_id(
                Uuid::new_v4(),
                UserChanges {
                    email: Some("a@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn email_lookup_is_exact() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();
        assert!(store.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_removed_user() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("a@x.com")).await.unwrap();
        let deleted = store.delete_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.email, "a@x.com");
        assert!(store.delete_by_id(created.id).await.unwrap().is_none());
    }
}
