use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{Role, UserModel};
use crate::database::lock_collection;
use crate::shared::AppError;

const USER_COLUMNS: &str = "id, email, name, photo_url, role, created_at";

/// Result of the find-or-create upsert
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertUserResult {
    /// A user with that email already existed and was left untouched
    Existing(UserModel),
    /// No user had that email; the candidate record was stored
    Created(UserModel),
}

impl UpsertUserResult {
    pub fn into_user(self) -> UserModel {
        match self {
            UpsertUserResult::Existing(user) | UpsertUserResult::Created(user) => user,
        }
    }
}

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn list_by_email(&self, email: &str) -> Result<Vec<UserModel>, AppError>;

    /// Atomically stores `candidate` unless a user with the same email exists
    async fn find_or_create(&self, candidate: &UserModel) -> Result<UpsertUserResult, AppError>;

    /// Sets the role of one user, returning the number of matched records
    async fn set_role(&self, id: Uuid, role: Role) -> Result<u64, AppError>;

    /// Removes one user, returning the number of deleted records
    async fn delete_user(&self, id: Uuid) -> Result<u64, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// Records are kept in insertion order. Data is lost when the process exits.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = lock_collection(&self.users)?;
        debug!(user_count = users.len(), "Listing users from memory");
        Ok(users.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let users = lock_collection(&self.users)?;
        let user = users.iter().find(|u| u.email == email).cloned();

        match &user {
            Some(u) => debug!(email = %email, role = %u.role, "User found in memory"),
            None => debug!(email = %email, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_by_email(&self, email: &str) -> Result<Vec<UserModel>, AppError> {
        let users = lock_collection(&self.users)?;
        Ok(users.iter().filter(|u| u.email == email).cloned().collect())
    }

    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    async fn find_or_create(&self, candidate: &UserModel) -> Result<UpsertUserResult, AppError> {
        // Check and insert happen under one lock so concurrent callers see one record
        let mut users = lock_collection(&self.users)?;

        if let Some(existing) = users.iter().find(|u| u.email == candidate.email) {
            debug!("User already exists in memory");
            return Ok(UpsertUserResult::Existing(existing.clone()));
        }

        users.push(candidate.clone());
        debug!(user_id = %candidate.id, "User created in memory");
        Ok(UpsertUserResult::Created(candidate.clone()))
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: Uuid, role: Role) -> Result<u64, AppError> {
        let mut users = lock_collection(&self.users)?;

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role.to_string();
                debug!(user_id = %id, role = %role, "User role updated in memory");
                Ok(1)
            }
            None => {
                debug!(user_id = %id, "User not found for role update in memory");
                Ok(0)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let mut users = lock_collection(&self.users)?;
        let before = users.len();
        users.retain(|u| u.id != id);

        let removed = (before - users.len()) as u64;
        debug!(user_id = %id, removed, "Deleted user from memory");
        Ok(removed)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {} FROM users ORDER BY seq",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list users");
            AppError::from(e)
        })?;

        debug!(user_count = users.len(), "Listed users from database");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, email = %email, "Failed to fetch user by email");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn list_by_email(&self, email: &str) -> Result<Vec<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {} FROM users WHERE email = $1 ORDER BY seq",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, email = %email, "Failed to list users by email");
            AppError::from(e)
        })
    }

    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    async fn find_or_create(&self, candidate: &UserModel) -> Result<UpsertUserResult, AppError> {
        // The unique email constraint arbitrates concurrent registrations
        let created = sqlx::query_as::<_, UserModel>(&format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (email) DO NOTHING RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        ))
        .bind(candidate.id)
        .bind(&candidate.email)
        .bind(&candidate.name)
        .bind(&candidate.photo_url)
        .bind(&candidate.role)
        .bind(candidate.timestamp)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert user");
            AppError::from(e)
        })?;

        if let Some(user) = created {
            debug!(user_id = %user.id, "User created in database");
            return Ok(UpsertUserResult::Created(user));
        }

        let existing = self
            .find_by_email(&candidate.email)
            .await?
            .ok_or_else(|| AppError::DatabaseError("User vanished during upsert".to_string()))?;

        debug!(user_id = %existing.id, "User already exists in database");
        Ok(UpsertUserResult::Existing(existing))
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: Uuid, role: Role) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %id, "Failed to update user role");
                AppError::from(e)
            })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %id, "Failed to delete user");
                AppError::from(e)
            })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(email: &str) -> UserModel {
        UserModel::new(email.to_string(), None, None, Role::User)
    }

    #[tokio::test]
    async fn test_find_or_create_creates_once() {
        let repo = InMemoryUserRepository::new();

        let first = repo.find_or_create(&user("e@x.com")).await.unwrap();
        let created = match first {
            UpsertUserResult::Created(u) => u,
            other => panic!("expected a new user, got {:?}", other),
        };

        let second = repo.find_or_create(&user("e@x.com")).await.unwrap();
        assert_eq!(second, UpsertUserResult::Existing(created));
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.find_or_create(&user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if let UpsertUserResult::Created(_) = task.await.unwrap().unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_set_role() {
        let alice = user("alice@x.com");
        let repo = InMemoryUserRepository::with_users(vec![alice.clone()]);

        assert_eq!(repo.set_role(alice.id, Role::Admin).await.unwrap(), 1);
        let stored = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert!(stored.is_admin());
        assert_eq!(stored.timestamp, alice.timestamp);

        assert_eq!(repo.set_role(Uuid::new_v4(), Role::Admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let alice = user("alice@x.com");
        let repo = InMemoryUserRepository::with_users(vec![alice.clone(), user("bob@x.com")]);

        assert_eq!(repo.delete_user(alice.id).await.unwrap(), 1);
        assert_eq!(repo.delete_user(alice.id).await.unwrap(), 0);
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for email in ["c@x.com", "a@x.com", "b@x.com"] {
            repo.find_or_create(&user(email)).await.unwrap();
        }

        let emails: Vec<String> = repo
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["c@x.com", "a@x.com", "b@x.com"]);

        assert_eq!(repo.list_by_email("a@x.com").await.unwrap().len(), 1);
        assert!(repo.list_by_email("nobody@x.com").await.unwrap().is_empty());
    }
}
