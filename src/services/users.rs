//! User management and login service

use crate::{
    error::{AppError, AppResult, ConflictStatus, ErrorClassifier},
    models::user::{
        CreateUser, LoginRequest, NewUserRecord, UpdateUser, User, UserChanges, UserSummary,
    },
    repository::Repository,
    validation,
};

use super::{parse_id, password::PasswordHasher};

const USERS: ErrorClassifier = ErrorClassifier::new("User", "Email is already registered")
    .with_conflict_status(ConflictStatus::BadRequest);
const USERS_UPDATE: ErrorClassifier = ErrorClassifier::new("User", "Email is already in use")
    .with_conflict_status(ConflictStatus::BadRequest);

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    hasher: PasswordHasher,
}

impl UsersService {
    pub fn new(repository: Repository, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user, the password is stored hashed
    pub async fn create_user(&self, request: CreateUser) -> AppResult<UserSummary> {
        let user = validation::validate_new_user(request)?;
        let password_hash = self.hasher.hash_blocking(user.password).await?;

        let created = self
            .repository
            .users
            .create(NewUserRecord {
                name: user.name,
                email: user.email,
                password_hash,
            })
            .await
            .map_err(|e| USERS.classify(e))?;

        tracing::info!(user_id = %created.id, "user created");
        Ok(UserSummary::from(created))
    }

    /// List every user
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = self
            .repository
            .users
            .find_all()
            .await
            .map_err(|e| USERS.classify(e))?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get user by ID
    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        let id = parse_id(id, &USERS)?;
        self.repository
            .users
            .find_by_id(id)
            .await
            .map(User::from)
            .map_err(|e| USERS.classify(e))
    }

    /// Update name, email and password independently.
    ///
    /// Empty strings count as not supplied; the password is re-hashed only
    /// when a new one is given.
    pub async fn update_user(&self, id: &str, request: UpdateUser) -> AppResult<User> {
        let id = parse_id(id, &USERS_UPDATE)?;
        let request = validation::supplied_user_fields(request);

        let password_hash = match request.password {
            Some(password) => Some(self.hasher.hash_blocking(password).await?),
            None => None,
        };

        let updated = self
            .repository
            .users
            .update_by_id(
                id,
                UserChanges {
                    name: request.name,
                    email: request.email,
                    password_hash,
                },
            )
            .await
            .map_err(|e| USERS_UPDATE.classify(e))?;

        tracing::info!(user_id = %updated.id, "user updated");
        Ok(User::from(updated))
    }

    /// Delete a user and return what was removed
    pub async fn delete_user(&self, id: &str) -> AppResult<UserSummary> {
        let id = parse_id(id, &USERS)?;
        let deleted = self
            .repository
            .users
            .delete_by_id(id)
            .await
            .map_err(|e| USERS.classify(e))?
            .ok_or_else(|| USERS.not_found())?;

        tracing::info!(user_id = %deleted.id, "user deleted");
        Ok(UserSummary::from(deleted))
    }

    /// Check a user's password. No token or session is issued.
    pub async fn login(&self, request: LoginRequest) -> AppResult<UserSummary> {
        let (email, password) = validation::validate_login(request)?;

        let user = self
            .repository
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| USERS.classify(e))?
            .ok_or_else(|| USERS.not_found())?;

        let valid = self
            .hasher
            .verify_blocking(password, user.password.clone())
            .await?;
        if !valid {
            tracing::debug!(user_id = %user.id, "login rejected");
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }

        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(UserSummary::from(user))
    }
}
