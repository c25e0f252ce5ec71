use async_trait::async_trait;
use uuid::Uuid;

use models::user::UserRole;

use super::domain::User;
use crate::errors::ServiceError;

/// Repository abstraction for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_firebase_id(&self, firebase_id: &str) -> Result<Option<User>, ServiceError>;
    /// Fails with [`ServiceError::Conflict`] when the firebase id is already taken.
    async fn create(&self, firebase_id: &str, email: &str, display_name: Option<&str>) -> Result<User, ServiceError>;
    /// `Ok(None)` when no user has this id.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<String, User>>, // key: firebase_id
    }

    impl MockUserRepository {
        pub fn len(&self) -> usize { self.users.lock().unwrap().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_firebase_id(&self, firebase_id: &str) -> Result<Option<User>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(firebase_id).cloned())
        }

        async fn create(&self, firebase_id: &str, email: &str, display_name: Option<&str>) -> Result<User, ServiceError> {
            models::user::validate_firebase_id(firebase_id)?;
            models::user::validate_email(email)?;
            let mut users = self.users.lock().unwrap();
            if users.contains_key(firebase_id) {
                return Err(ServiceError::Conflict(format!("firebaseId {firebase_id} already exists")));
            }
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                firebase_id: firebase_id.to_string(),
                email: email.trim().to_string(),
                display_name: display_name.map(str::to_string),
                role: UserRole::User,
                created_at: now,
                updated_at: now,
            };
            users.insert(firebase_id.to_string(), user.clone());
            Ok(user)
        }

        async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>, ServiceError> {
            let mut users = self.users.lock().unwrap();
            let Some(found) = users.values_mut().find(|u| u.id == id) else { return Ok(None); };
            found.role = role;
            found.updated_at = Utc::now();
            Ok(Some(found.clone()))
        }
    }
}
