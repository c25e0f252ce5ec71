//! Store connectivity probe backing `GET /health`.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}

#[async_trait]
impl StoreProbe for DatabaseConnection {
    async fn is_connected(&self) -> bool {
        models::db::test_connection(self).await
    }
}

/// Fixed answer, for tests and doc examples
pub mod mock {
    use super::*;

    pub struct StaticProbe(pub bool);

    #[async_trait]
    impl StoreProbe for StaticProbe {
        async fn is_connected(&self) -> bool { self.0 }
    }
}
