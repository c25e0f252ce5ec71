use std::sync::Arc;

use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::{
    health::StoreProbe,
    incident::{repo::seaorm::SeaOrmIncidentRepository, repository::IncidentRepository, IncidentService},
    upload::{BlobStore, LocalBlobStore, UploadService},
    user::{repo::seaorm::SeaOrmUserRepository, repository::UserRepository, UserService},
};

/// Shared handler state; every field is cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub incidents: Arc<IncidentService<dyn IncidentRepository>>,
    pub users: Arc<UserService<dyn UserRepository>>,
    pub uploads: Arc<UploadService<dyn BlobStore>>,
    pub probe: Arc<dyn StoreProbe>,
}

impl ServerState {
    pub fn new(
        incident_repo: Arc<dyn IncidentRepository>,
        user_repo: Arc<dyn UserRepository>,
        blob_store: Arc<dyn BlobStore>,
        probe: Arc<dyn StoreProbe>,
        cfg: &AppConfig,
    ) -> Self {
        let uploads = UploadService::new(
            blob_store,
            cfg.uploads.max_bytes,
            cfg.uploads.public_base_url.clone(),
            cfg.server.base_url(),
        );
        Self {
            incidents: Arc::new(IncidentService::new(incident_repo)),
            users: Arc::new(UserService::new(user_repo)),
            uploads: Arc::new(uploads),
            probe,
        }
    }

    /// Production wiring: SeaORM repositories and local upload storage.
    pub fn from_db(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        Self::new(
            Arc::new(SeaOrmIncidentRepository { db: db.clone() }),
            Arc::new(SeaOrmUserRepository { db: db.clone() }),
            Arc::new(LocalBlobStore::new(&cfg.uploads.dir)),
            Arc::new(db),
            cfg,
        )
    }
}
