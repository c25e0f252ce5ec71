use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INCIDENT_INDEXES: [&str; 5] = [
    "idx_incident_address",
    "idx_incident_category",
    "idx_incident_description",
    "idx_incident_location",
    "idx_incident_created_at",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Incident: equality lookups on free text; hash entries stay fixed-size whatever the length
        manager
            .create_index(
                Index::create()
                    .name("idx_incident_address")
                    .table(Incident::Table)
                    .col(Incident::Address)
                    .index_type(IndexType::Hash)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_incident_category")
                    .table(Incident::Table)
                    .col(Incident::Category)
                    .index_type(IndexType::Hash)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_incident_description")
                    .table(Incident::Table)
                    .col(Incident::Description)
                    .index_type(IndexType::Hash)
                    .to_owned(),
            )
            .await?;

        // Incident: geospatial lookups by (longitude, latitude)
        manager
            .create_index(
                Index::create()
                    .name("idx_incident_location")
                    .table(Incident::Table)
                    .col(Incident::Longitude)
                    .col(Incident::Latitude)
                    .to_owned(),
            )
            .await?;

        // Incident: newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_incident_created_at")
                    .table(Incident::Table)
                    .col((Incident::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INCIDENT_INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(Incident::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Incident { Table, Address, Category, Description, Longitude, Latitude, CreatedAt }
