use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::user::{self, UserRole};

use crate::errors::ServiceError;
use crate::user::domain::User;
use crate::user::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_firebase_id(&self, firebase_id: &str) -> Result<Option<User>, ServiceError> {
        let found = user::find_by_firebase_id(&self.db, firebase_id).await?;
        Ok(found.map(User::from))
    }

    async fn create(&self, firebase_id: &str, email: &str, display_name: Option<&str>) -> Result<User, ServiceError> {
        let created = user::create(&self.db, firebase_id, email, display_name).await?;
        Ok(created.into())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>, ServiceError> {
        let updated = user::set_role(&self.db, id, role).await?;
        Ok(updated.map(User::from))
    }
}
