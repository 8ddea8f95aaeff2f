//! Create agency table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agency::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agency::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agency::Name).string().not_null())
                    .col(ColumnDef::new(Agency::PrimaryColor).string_len(16))
                    .col(ColumnDef::new(Agency::SecondaryColor).string_len(16))
                    .col(ColumnDef::new(Agency::LogoUrl).string())
                    .col(ColumnDef::new(Agency::ContactEmail).string().not_null())
                    .col(ColumnDef::new(Agency::ContactPhone).string_len(32))
                    .col(ColumnDef::new(Agency::Website).string())
                    .col(
                        ColumnDef::new(Agency::ServiceLocations)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Agency::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Agency::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agency::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Agency {
    Table,
    Id,
    Name,
    PrimaryColor,
    SecondaryColor,
    LogoUrl,
    ContactEmail,
    ContactPhone,
    Website,
    ServiceLocations,
    CreatedAt,
    UpdatedAt,
}
