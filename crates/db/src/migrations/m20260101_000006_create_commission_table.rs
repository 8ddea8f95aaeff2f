//! Create commission table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Commission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Commission::BookingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commission::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Commission::OwnerCommission)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commission::BookingCommission)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commission::PlatformFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commission::Rate).double().not_null())
                    .col(
                        ColumnDef::new(Commission::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Commission::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Commission::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commission_booking")
                            .from(Commission::Table, Commission::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one commission per booking
        manager
            .create_index(
                Index::create()
                    .name("idx_commission_booking_id")
                    .table(Commission::Table)
                    .col(Commission::BookingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Commission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Commission {
    Table,
    Id,
    BookingId,
    Amount,
    OwnerCommission,
    BookingCommission,
    PlatformFee,
    Rate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Booking {
    Table,
    Id,
}
