//! Create sales property table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalesProperty::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesProperty::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::AgencyId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::AgentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesProperty::Title).string().not_null())
                    .col(ColumnDef::new(SalesProperty::Description).text())
                    .col(ColumnDef::new(SalesProperty::City).string().not_null())
                    .col(ColumnDef::new(SalesProperty::District).string())
                    .col(ColumnDef::new(SalesProperty::Address).string())
                    .col(
                        ColumnDef::new(SalesProperty::Price)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::Bedrooms)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::Bathrooms)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SalesProperty::AreaSqm).integer())
                    .col(
                        ColumnDef::new(SalesProperty::Amenities)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::MediaKeys)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SalesProperty::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_property_agency")
                            .from(SalesProperty::Table, SalesProperty::AgencyId)
                            .to(Agency::Table, Agency::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_property_agent")
                            .from(SalesProperty::Table, SalesProperty::AgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_property_agency_id")
                    .table(SalesProperty::Table)
                    .col(SalesProperty::AgencyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_property_status_city")
                    .table(SalesProperty::Table)
                    .col(SalesProperty::Status)
                    .col(SalesProperty::City)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalesProperty::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SalesProperty {
    Table,
    Id,
    AgencyId,
    AgentId,
    Title,
    Description,
    City,
    District,
    Address,
    Price,
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
