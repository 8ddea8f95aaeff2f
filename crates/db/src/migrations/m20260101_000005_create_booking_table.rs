//! Create booking table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Booking::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Booking::PropertyId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Booking::OwnerAgentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Booking::BookingAgentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Booking::ClientName).string().not_null())
                    .col(ColumnDef::new(Booking::ClientEmail).string().not_null())
                    .col(ColumnDef::new(Booking::ClientPhone).string_len(32))
                    .col(ColumnDef::new(Booking::CheckIn).date().not_null())
                    .col(ColumnDef::new(Booking::CheckOut).date().not_null())
                    .col(ColumnDef::new(Booking::Duration).string_len(32).not_null())
                    .col(ColumnDef::new(Booking::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Booking::Notes).text())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Booking::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Booking::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_property")
                            .from(Booking::Table, Booking::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_owner_agent")
                            .from(Booking::Table, Booking::OwnerAgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_booking_agent")
                            .from(Booking::Table, Booking::BookingAgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: property_id (availability and listing lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_property_id")
                    .table(Booking::Table)
                    .col(Booking::PropertyId)
                    .to_owned(),
            )
            .await?;

        // Index: status (dashboard filters)
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_status")
                    .table(Booking::Table)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        // Indexes: per-agent dashboards
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_owner_agent_id")
                    .table(Booking::Table)
                    .col(Booking::OwnerAgentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_booking_agent_id")
                    .table(Booking::Table)
                    .col(Booking::BookingAgentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Booking {
    Table,
    Id,
    PropertyId,
    OwnerAgentId,
    BookingAgentId,
    ClientName,
    ClientEmail,
    ClientPhone,
    CheckIn,
    CheckOut,
    Duration,
    TotalAmount,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Property {
    Table,
    Id,
}

#[derive(Iden)]
enum Agent {
    Table,
    Id,
}
