//! Sales property entity (for-sale listings).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales listing statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SalesStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "sold")]
    Sold,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_property")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub agency_id: String,

    /// Agent who created the listing
    pub agent_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub city: String,

    #[sea_orm(nullable)]
    pub district: Option<String>,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    /// Asking price in cents
    pub price: i64,

    pub bedrooms: i16,

    pub bathrooms: i16,

    #[sea_orm(nullable)]
    pub area_sqm: Option<i32>,

    /// JSON array of amenity strings
    pub amenities: Json,

    /// JSON array of storage keys for listing media
    pub media_keys: Json,

    pub status: SalesStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agency::Entity",
        from = "Column::AgencyId",
        to = "super::agency::Column::Id",
        on_delete = "Cascade"
    )]
    Agency,

    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,

    #[sea_orm(has_many = "super::sales_transaction::Entity")]
    Transactions,
}

impl Related<super::agency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agency.def()
    }
}

impl Related<super::sales_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
