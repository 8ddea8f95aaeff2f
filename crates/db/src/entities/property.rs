//! Rental property entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rental listing statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property")]
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

    /// Nightly rate in cents
    #[sea_orm(nullable)]
    pub price_per_night: Option<i64>,

    /// Monthly rate in cents
    #[sea_orm(nullable)]
    pub price_per_month: Option<i64>,

    pub bedrooms: i16,

    pub bathrooms: i16,

    #[sea_orm(nullable)]
    pub area_sqm: Option<i32>,

    /// JSON array of amenity strings
    pub amenities: Json,

    /// JSON array of storage keys for listing media
    pub media_keys: Json,

    pub status: ListingStatus,

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

    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,

    #[sea_orm(has_many = "super::property_availability::Entity")]
    Availability,
}

impl Related<super::agency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agency.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::property_availability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Availability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
