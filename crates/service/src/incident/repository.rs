use async_trait::async_trait;
use uuid::Uuid;

use models::incident::{IncidentChanges, NewIncident};

use super::domain::Incident;
use crate::errors::ServiceError;

/// Repository abstraction for incident persistence.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// All incidents, newest first.
    async fn list(&self) -> Result<Vec<Incident>, ServiceError>;
    async fn create(&self, new: NewIncident) -> Result<Incident, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Incident>, ServiceError>;
    /// `Ok(None)` when the id does not resolve.
    async fn update(&self, id: Uuid, changes: IncidentChanges) -> Result<Option<Incident>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockIncidentRepository {
        rows: Mutex<Vec<Incident>>, // insertion order
    }

    impl MockIncidentRepository {
        pub fn len(&self) -> usize { self.rows.lock().unwrap().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl IncidentRepository for MockIncidentRepository {
        async fn list(&self) -> Result<Vec<Incident>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            let mut out: Vec<Incident> = rows.iter().rev().cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn create(&self, new: NewIncident) -> Result<Incident, ServiceError> {
            let incident = Incident::from_new(new, Utc::now());
            self.rows.lock().unwrap().push(incident.clone());
            Ok(incident)
        }

        async fn get(&self, id: Uuid) -> Result<Option<Incident>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|i| i.id == id).cloned())
        }

        async fn update(&self, id: Uuid, changes: IncidentChanges) -> Result<Option<Incident>, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(found) = rows.iter_mut().find(|i| i.id == id) else { return Ok(None); };
            found.apply(changes, Utc::now());
            Ok(Some(found.clone()))
        }
    }
}
