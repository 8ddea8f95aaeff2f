//! Create property table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Property::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Property::AgencyId).string_len(32).not_null())
                    .col(ColumnDef::new(Property::AgentId).string_len(32).not_null())
                    .col(ColumnDef::new(Property::Title).string().not_null())
                    .col(ColumnDef::new(Property::Description).text())
                    .col(ColumnDef::new(Property::City).string().not_null())
                    .col(ColumnDef::new(Property::District).string())
                    .col(ColumnDef::new(Property::Address).string())
                    .col(ColumnDef::new(Property::PricePerNight).big_integer())
                    .col(ColumnDef::new(Property::PricePerMonth).big_integer())
                    .col(
                        ColumnDef::new(Property::Bedrooms)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Property::Bathrooms)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Property::AreaSqm).integer())
                    .col(ColumnDef::new(Property::Amenities).json_binary().not_null())
                    .col(ColumnDef::new(Property::MediaKeys).json_binary().not_null())
                    .col(
                        ColumnDef::new(Property::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Property::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Property::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_agency")
                            .from(Property::Table, Property::AgencyId)
                            .to(Agency::Table, Agency::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_agent")
                            .from(Property::Table, Property::AgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: agency_id (tenant scoping on every list query)
        manager
            .create_index(
                Index::create()
                    .name("idx_property_agency_id")
                    .table(Property::Table)
                    .col(Property::AgencyId)
                    .to_owned(),
            )
            .await?;

        // Index: (status, city) for public listing filters
        manager
            .create_index(
                Index::create()
                    .name("idx_property_status_city")
                    .table(Property::Table)
                    .col(Property::Status)
                    .col(Property::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Property::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Property {
    Table,
    Id,
    AgencyId,
    AgentId,
    Title,
    Description,
    City,
    District,
    Address,
    PricePerNight,
    PricePerMonth,
    Bedrooms,
    Bathrooms,
    AreaSqm,
    Amenities,
    MediaKeys,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Agency {
    Table,
    Id,
}

#[derive(Iden)]
enum Agent {
    Table,
    Id,
}
