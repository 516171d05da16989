//! Data models for Biblioteca

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookChanges, NewBook};
pub use user::{NewUser, NewUserRecord, User, UserChanges, UserRecord, UserSummary};
