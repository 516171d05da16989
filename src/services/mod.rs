//! Business logic services

pub mod catalog;
pub mod password;
pub mod users;

use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorClassifier},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> AppResult<Self> {
        let hasher = password::PasswordHasher::new()?;
        Ok(Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            users: users::UsersService::new(repository, hasher),
        })
    }
}

/// Parse a record id from the path.
///
/// A string that is not a UUID cannot name a stored record, so it is
/// reported as missing without asking the store.
pub(crate) fn parse_id(id: &str, classifier: &ErrorClassifier) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| classifier.not_found())
}
