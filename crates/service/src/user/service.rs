use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::user::UserRole;

use super::domain::User;
use super::repository::UserRepository;
use crate::errors::ServiceError;

/// User profile service independent of web framework
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Return the profile for `firebase_id`, creating it with the default role if absent.
    ///
    /// # Examples
    /// ```
    /// use service::user::{UserService, repository::mock::MockUserRepository};
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(MockUserRepository::default()));
    /// let a = tokio_test::block_on(svc.sync("uid-1", "a@example.com", None)).unwrap();
    /// let b = tokio_test::block_on(svc.sync("uid-1", "a@example.com", None)).unwrap();
    /// assert_eq!(a.id, b.id);
    /// ```
    #[instrument(skip(self, email, display_name))]
    pub async fn sync(&self, firebase_id: &str, email: &str, display_name: Option<&str>) -> Result<User, ServiceError> {
        models::user::validate_firebase_id(firebase_id)?;
        if let Some(existing) = self.repo.find_by_firebase_id(firebase_id).await? {
            debug!(user_id = %existing.id, "user exists");
            return Ok(existing);
        }
        models::user::validate_email(email)?;
        match self.repo.create(firebase_id, email, display_name).await {
            Ok(user) => {
                info!(user_id = %user.id, "user_created");
                Ok(user)
            }
            // a concurrent sync inserted the same firebase id first
            Err(ServiceError::Conflict(msg)) => self
                .repo
                .find_by_firebase_id(firebase_id)
                .await?
                .ok_or(ServiceError::Conflict(msg)),
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_firebase_id(&self, firebase_id: &str) -> Result<User, ServiceError> {
        self.repo
            .find_by_firebase_id(firebase_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn promote(&self, id: Uuid) -> Result<User, ServiceError> {
        let user = self
            .repo
            .set_role(id, UserRole::Officer)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        info!(user_id = %user.id, "user_promoted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::mock::MockUserRepository;

    #[tokio::test]
    async fn sync_twice_returns_same_user() {
        let repo = Arc::new(MockUserRepository::default());
        let svc = UserService::new(repo.clone());
        let first = svc.sync("uid-42", "jo@example.com", Some("Jo")).await.unwrap();
        let second = svc.sync("uid-42", "jo@example.com", Some("Jo")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.role, UserRole::User);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn sync_validates_input() {
        let svc = UserService::new(Arc::new(MockUserRepository::default()));
        assert!(matches!(svc.sync("", "jo@example.com", None).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.sync("uid-1", "not-an-email", None).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn lookup_and_promote() {
        let svc = UserService::new(Arc::new(MockUserRepository::default()));
        assert!(matches!(svc.get_by_firebase_id("ghost").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.promote(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));

        let user = svc.sync("uid-9", "cop@example.com", None).await.unwrap();
        let promoted = svc.promote(user.id).await.unwrap();
        assert_eq!(promoted.role, UserRole::Officer);
        assert_eq!(svc.get_by_firebase_id("uid-9").await.unwrap().role, UserRole::Officer);
    }
}
