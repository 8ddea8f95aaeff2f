//! Booking entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking lifecycle states.
///
/// `Cancelled` and `Archived` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancellation_requested")]
    CancellationRequested,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl BookingStatus {
    /// Whether no further transitions are allowed out of this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Archived)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub property_id: String,

    /// Agent who owns the listing
    pub owner_agent_id: String,

    /// Agent who brought the booking (defaults to the owner)
    pub booking_agent_id: String,

    pub client_name: String,

    pub client_email: String,

    #[sea_orm(nullable)]
    pub client_phone: Option<String>,

    pub check_in: Date,

    pub check_out: Date,

    /// Human-readable stay length, e.g. "4 nights" or "2 months"
    pub duration: String,

    /// Total booking amount in cents
    pub total_amount: i64,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub status: BookingStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,

    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::OwnerAgentId",
        to = "super::agent::Column::Id"
    )]
    OwnerAgent,

    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::BookingAgentId",
        to = "super::agent::Column::Id"
    )]
    BookingAgent,

    #[sea_orm(has_one = "super::commission::Entity")]
    Commission,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::commission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
