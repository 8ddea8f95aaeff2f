//! Sales transaction entity (a closed sale of a sales property).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub sales_property_id: String,

    /// Agent who listed the property
    pub listing_agent_id: String,

    /// Agent who brought the buyer
    pub selling_agent_id: String,

    pub buyer_name: String,

    #[sea_orm(nullable)]
    pub buyer_email: Option<String>,

    #[sea_orm(nullable)]
    pub buyer_phone: Option<String>,

    /// Final sale price in cents
    pub sale_price: i64,

    pub closed_on: Date,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_property::Entity",
        from = "Column::SalesPropertyId",
        to = "super::sales_property::Column::Id",
        on_delete = "Cascade"
    )]
    SalesProperty,

    #[sea_orm(has_one = "super::sales_commission::Entity")]
    Commission,
}

impl Related<super::sales_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesProperty.def()
    }
}

impl Related<super::sales_commission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
