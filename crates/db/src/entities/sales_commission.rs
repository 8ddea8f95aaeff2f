//! Sales commission entity (one-to-one with a sales transaction).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::commission::CommissionStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_commission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub transaction_id: String,

    /// Total commission pool in cents (20% of the sale price)
    pub pool: i64,

    /// Listing agent's share in cents
    pub listing_commission: i64,

    /// Selling agent's share in cents
    pub selling_commission: i64,

    /// Platform's share in cents
    pub platform_fee: i64,

    pub status: CommissionStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_transaction::Entity",
        from = "Column::TransactionId",
        to = "super::sales_transaction::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
}

impl Related<super::sales_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
