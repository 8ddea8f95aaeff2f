//! Agency entity (a tenant organization owning agents and listings).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agency")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Primary brand color (hex)
    #[sea_orm(nullable)]
    pub primary_color: Option<String>,

    /// Secondary brand color (hex)
    #[sea_orm(nullable)]
    pub secondary_color: Option<String>,

    #[sea_orm(nullable)]
    pub logo_url: Option<String>,

    pub contact_email: String,

    #[sea_orm(nullable)]
    pub contact_phone: Option<String>,

    #[sea_orm(nullable)]
    pub website: Option<String>,

    /// Cities/areas the agency operates in (JSON array of strings)
    pub service_locations: Json,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::agent::Entity")]
    Agents,

    #[sea_orm(has_many = "super::property::Entity")]
    Properties,

    #[sea_orm(has_many = "super::sales_property::Entity")]
    SalesProperties,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agents.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
