use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::incident::{self, IncidentChanges, NewIncident};

use crate::errors::ServiceError;
use crate::incident::domain::Incident;
use crate::incident::repository::IncidentRepository;

pub struct SeaOrmIncidentRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl IncidentRepository for SeaOrmIncidentRepository {
    async fn list(&self) -> Result<Vec<Incident>, ServiceError> {
        let rows = incident::list_newest_first(&self.db).await?;
        Ok(rows.into_iter().map(Incident::from).collect())
    }

    async fn create(&self, new: NewIncident) -> Result<Incident, ServiceError> {
        let created = incident::create(&self.db, new).await?;
        Ok(created.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Incident>, ServiceError> {
        let found = incident::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.map(Incident::from))
    }

    async fn update(&self, id: Uuid, changes: IncidentChanges) -> Result<Option<Incident>, ServiceError> {
        let updated = incident::apply_changes(&self.db, id, changes).await?;
        Ok(updated.map(Incident::from))
    }
}
