//! Create agent table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agent::Email).string().not_null())
                    .col(ColumnDef::new(Agent::Name).string().not_null())
                    .col(ColumnDef::new(Agent::Phone).string_len(32))
                    .col(ColumnDef::new(Agent::AvatarUrl).string())
                    .col(
                        ColumnDef::new(Agent::Role)
                            .string_len(16)
                            .not_null()
                            .default("agent"),
                    )
                    .col(
                        ColumnDef::new(Agent::OnboardingStep)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Agent::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Agent::AgencyId).string_len(32))
                    .col(
                        ColumnDef::new(Agent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Agent::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_agency")
                            .from(Agent::Table, Agent::AgencyId)
                            .to(Agency::Table, Agency::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email (one account per address)
        manager
            .create_index(
                Index::create()
                    .name("idx_agent_email")
                    .table(Agent::Table)
                    .col(Agent::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: agency_id (for listing an agency's agents)
        manager
            .create_index(
                Index::create()
                    .name("idx_agent_agency_id")
                    .table(Agent::Table)
                    .col(Agent::AgencyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Agent {
    Table,
    Id,
    Email,
    Name,
    Phone,
    AvatarUrl,
    Role,
    OnboardingStep,
    EmailVerified,
    AgencyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Agency {
    Table,
    Id,
}
