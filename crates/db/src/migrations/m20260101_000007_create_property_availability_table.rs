//! Create property availability table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyAvailability::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyAvailability::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PropertyAvailability::PropertyId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyAvailability::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyAvailability::EndDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyAvailability::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PropertyAvailability::BookingId).string_len(32))
                    .col(ColumnDef::new(PropertyAvailability::Note).string())
                    .col(
                        ColumnDef::new(PropertyAvailability::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PropertyAvailability::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_availability_property")
                            .from(
                                PropertyAvailability::Table,
                                PropertyAvailability::PropertyId,
                            )
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_availability_booking")
                            .from(
                                PropertyAvailability::Table,
                                PropertyAvailability::BookingId,
                            )
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (property_id, is_available); the overlap check scans this
        manager
            .create_index(
                Index::create()
                    .name("idx_availability_property_blocked")
                    .table(PropertyAvailability::Table)
                    .col(PropertyAvailability::PropertyId)
                    .col(PropertyAvailability::IsAvailable)
                    .to_owned(),
            )
            .await?;

        // Index: booking_id (release on cancellation)
        manager
            .create_index(
                Index::create()
                    .name("idx_availability_booking_id")
                    .table(PropertyAvailability::Table)
                    .col(PropertyAvailability::BookingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyAvailability::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PropertyAvailability {
    Table,
    Id,
    PropertyId,
    StartDate,
    EndDate,
    IsAvailable,
    BookingId,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Property {
    Table,
    Id,
}

#[derive(Iden)]
enum Booking {
    Table,
    Id,
}
