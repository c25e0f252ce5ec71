//! Create `incident` table.
//!
//! Location is stored as a longitude/latitude pair; images as a JSONB array of URLs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incident::Table)
                    .if_not_exists()
                    .col(uuid(Incident::Id).primary_key())
                    .col(ColumnDef::new(Incident::Title).text().null())
                    .col(text(Incident::Description).not_null())
                    .col(double(Incident::Longitude).not_null())
                    .col(double(Incident::Latitude).not_null())
                    .col(text(Incident::Address).not_null())
                    .col(text(Incident::Category).not_null())
                    .col(string_len(Incident::Status, 16).not_null().default("open"))
                    .col(small_integer(Incident::Priority).not_null())
                    .col(text(Incident::ReporterId).not_null())
                    .col(json_binary(Incident::Images).not_null())
                    .col(timestamp_with_time_zone(Incident::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Incident::UpdatedAt).not_null())
                    .col(
                        ColumnDef::new(Incident::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .check(Expr::col(Incident::Status).is_in(["open", "inProgress", "resolved"]))
                    .check(Expr::col(Incident::Priority).between(0, 2))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Incident::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Incident {
    Table,
    Id,
    Title,
    Description,
    Longitude,
    Latitude,
    Address,
    Category,
    Status,
    Priority,
    ReporterId,
    Images,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}
