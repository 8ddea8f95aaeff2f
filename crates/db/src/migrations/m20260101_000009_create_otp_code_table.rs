//! Create OTP code table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpCode::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpCode::Email).string().not_null())
                    .col(ColumnDef::new(OtpCode::Code).string_len(8).not_null())
                    .col(ColumnDef::new(OtpCode::Purpose).string_len(16).not_null())
                    .col(
                        ColumnDef::new(OtpCode::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OtpCode::ConsumedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OtpCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (email, purpose); verification looks up the latest live code
        manager
            .create_index(
                Index::create()
                    .name("idx_otp_code_email_purpose")
                    .table(OtpCode::Table)
                    .col(OtpCode::Email)
                    .col(OtpCode::Purpose)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpCode::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OtpCode {
    Table,
    Id,
    Email,
    Code,
    Purpose,
    ExpiresAt,
    ConsumedAt,
    CreatedAt,
}
