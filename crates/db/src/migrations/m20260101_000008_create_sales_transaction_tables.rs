//! Create sales transaction and sales commission tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalesTransaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesTransaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesTransaction::SalesPropertyId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesTransaction::ListingAgentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesTransaction::SellingAgentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesTransaction::BuyerName).string().not_null())
                    .col(ColumnDef::new(SalesTransaction::BuyerEmail).string())
                    .col(ColumnDef::new(SalesTransaction::BuyerPhone).string_len(32))
                    .col(
                        ColumnDef::new(SalesTransaction::SalePrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesTransaction::ClosedOn).date().not_null())
                    .col(
                        ColumnDef::new(SalesTransaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_transaction_property")
                            .from(SalesTransaction::Table, SalesTransaction::SalesPropertyId)
                            .to(SalesProperty::Table, SalesProperty::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_transaction_listing_agent")
                            .from(SalesTransaction::Table, SalesTransaction::ListingAgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_transaction_selling_agent")
                            .from(SalesTransaction::Table, SalesTransaction::SellingAgentId)
                            .to(Agent::Table, Agent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_transaction_property_id")
                    .table(SalesTransaction::Table)
                    .col(SalesTransaction::SalesPropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalesCommission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesCommission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::TransactionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesCommission::Pool).big_integer().not_null())
                    .col(
                        ColumnDef::new(SalesCommission::ListingCommission)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::SellingCommission)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::PlatformFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SalesCommission::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_commission_transaction")
                            .from(SalesCommission::Table, SalesCommission::TransactionId)
                            .to(SalesTransaction::Table, SalesTransaction::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one commission record per transaction
        manager
            .create_index(
                Index::create()
                    .name("idx_sales_commission_transaction_id")
                    .table(SalesCommission::Table)
                    .col(SalesCommission::TransactionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalesCommission::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesTransaction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SalesTransaction {
    Table,
    Id,
    SalesPropertyId,
    ListingAgentId,
    SellingAgentId,
    BuyerName,
    BuyerEmail,
    BuyerPhone,
    SalePrice,
    ClosedOn,
    CreatedAt,
}

#[derive(Iden)]
enum SalesCommission {
    Table,
    Id,
    TransactionId,
    Pool,
    ListingCommission,
    SellingCommission,
    PlatformFee,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SalesProperty {
    Table,
    Id,
}

#[derive(Iden)]
enum Agent {
    Table,
    Id,
}
