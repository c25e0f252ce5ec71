use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{Incident, IncidentInput};
use super::repository::IncidentRepository;
use crate::errors::ServiceError;

/// Incident business service independent of web framework
pub struct IncidentService<R: IncidentRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: IncidentRepository + ?Sized> IncidentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Every incident, newest first. No pagination or filtering.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Incident>, ServiceError> {
        let list = self.repo.list().await?;
        info!(count = list.len(), "incidents_listed");
        Ok(list)
    }

    /// Validate and persist a new incident. Nothing is stored when validation fails.
    ///
    /// # Examples
    /// ```
    /// use service::incident::{IncidentService, domain::IncidentInput, repository::mock::MockIncidentRepository};
    /// use std::sync::Arc;
    /// let svc = IncidentService::new(Arc::new(MockIncidentRepository::default()));
    /// let input: IncidentInput = serde_json::from_value(serde_json::json!({
    ///     "description": "Fallen tree", "address": "Elm St", "category": "hazard",
    ///     "location": {"type": "Point", "coordinates": [10.0, 50.0]},
    ///     "priority": 0, "reporterId": "uid-1", "images": []
    /// })).unwrap();
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.category, "hazard");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: IncidentInput) -> Result<Incident, ServiceError> {
        let new = input.into_new_incident()?;
        let created = self.repo.create(new).await?;
        info!(id = %created.id, category = %created.category, priority = created.priority.level(), "incident_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Incident, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("incident"))
    }

    /// Merge the given fields into an existing incident.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: IncidentInput) -> Result<Incident, ServiceError> {
        let changes = input.into_changes()?;
        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("incident"))?;
        info!(id = %updated.id, status = ?updated.status, "incident_updated");
        Ok(updated)
    }
}
