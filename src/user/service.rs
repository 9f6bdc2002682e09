use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{Role, UserModel},
    repository::{UpsertUserResult, UserRepository},
    types::UpsertUserRequest,
};
use crate::database::{parse_id, DeleteResult, UpdateResult};
use crate::shared::AppError;

/// Service for user records and role checks
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Returns the user stored under `email`, creating it first if needed.
    /// An existing record is returned unchanged.
    #[instrument(skip(self, request))]
    pub async fn upsert_by_email(
        &self,
        email: String,
        request: UpsertUserRequest,
    ) -> Result<UserModel, AppError> {
        let candidate = UserModel::new(email, request.name, request.photo_url, Role::User);

        let result = self.repository.find_or_create(&candidate).await?;
        match &result {
            UpsertUserResult::Existing(user) => {
                debug!(user_id = %user.id, "User already registered");
            }
            UpsertUserResult::Created(user) => {
                info!(user_id = %user.id, email = %user.email, "Registered new user");
            }
        }
        Ok(result.into_user())
    }

    /// Whether the user stored under `email` holds the admin role
    #[instrument(skip(self))]
    pub async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        let admin = self
            .repository
            .find_by_email(email)
            .await?
            .map(|user| user.is_admin())
            .unwrap_or(false);

        debug!(email = %email, admin, "Checked admin status");
        Ok(admin)
    }

    /// Sets the role of the user with the given id; unknown ids match nothing
    #[instrument(skip(self))]
    pub async fn set_role(&self, raw_id: &str, role: Role) -> Result<UpdateResult, AppError> {
        let matched = match parse_id(raw_id) {
            Some(id) => self.repository.set_role(id, role).await?,
            None => {
                warn!(id = %raw_id, "Malformed user id");
                0
            }
        };

        info!(id = %raw_id, role = %role, matched, "User role update finished");
        Ok(UpdateResult::matched(matched))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<DeleteResult, AppError> {
        let deleted = match parse_id(raw_id) {
            Some(id) => self.repository.delete_user(id).await?,
            None => {
                warn!(id = %raw_id, "Malformed user id");
                0
            }
        };

        Ok(DeleteResult::deleted(deleted))
    }

    pub async fn list(&self) -> Result<Vec<UserModel>, AppError> {
        self.repository.list_users().await
    }

    pub async fn list_by_email(&self, email: Option<&str>) -> Result<Vec<UserModel>, AppError> {
        match email {
            Some(email) => self.repository.list_by_email(email).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_upsert_twice_returns_first_record() {
        let (service, repo) = service();

        let first = service
            .upsert_by_email(
                "e@x.com".to_string(),
                UpsertUserRequest {
                    name: Some("Eve".to_string()),
                    photo_url: None,
                },
            )
            .await
            .unwrap();

        let second = service
            .upsert_by_email(
                "e@x.com".to_string(),
                UpsertUserRequest {
                    name: Some("Someone Else".to_string()),
                    photo_url: Some("https://img/x.png".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.name.as_deref(), Some("Eve"));
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_new_users_are_not_admin() {
        let (service, _) = service();

        let user = service
            .upsert_by_email("new@x.com".to_string(), UpsertUserRequest::default())
            .await
            .unwrap();

        assert_eq!(user.role, "user");
        assert!(!service.is_admin("new@x.com").await.unwrap());
        assert!(!service.is_admin("missing@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_promote_and_demote() {
        let (service, _) = service();
        let user = service
            .upsert_by_email("a@b.com".to_string(), UpsertUserRequest::default())
            .await
            .unwrap();

        let result = service
            .set_role(&user.id.to_string(), Role::Admin)
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert!(service.is_admin("a@b.com").await.unwrap());

        service
            .set_role(&user.id.to_string(), Role::User)
            .await
            .unwrap();
        assert!(!service.is_admin("a@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_ids_match_nothing() {
        let (service, _) = service();

        let update = service.set_role("not-an-id", Role::Admin).await.unwrap();
        assert_eq!(update.matched_count, 0);

        let delete = service.delete("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap();
        assert_eq!(delete.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_list_by_email_without_email_is_empty() {
        let (service, _) = service();
        service
            .upsert_by_email("a@b.com".to_string(), UpsertUserRequest::default())
            .await
            .unwrap();

        assert!(service.list_by_email(None).await.unwrap().is_empty());
        assert_eq!(service.list_by_email(Some("a@b.com")).await.unwrap().len(), 1);
    }
}
