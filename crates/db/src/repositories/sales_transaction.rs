//! Sales transaction repository.

use std::sync::Arc;

use crate::entities::{
    SalesTransaction, sales_commission, sales_property, sales_property::SalesStatus,
    sales_transaction,
};
use casaflow_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// The rows written when a sale closes.
pub struct ClosedSale {
    /// Transaction row to insert.
    pub transaction: sales_transaction::ActiveModel,
    /// Commission row to insert (its `transaction_id` must match).
    pub commission: sales_commission::ActiveModel,
    /// The listing being sold.
    pub sales_property_id: String,
}

/// Sales transaction repository for database operations.
#[derive(Clone)]
pub struct SalesTransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl SalesTransactionRepository {
    /// Create a new sales transaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a transaction by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<sales_transaction::Model>> {
        SalesTransaction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List transactions for a sales property, newest first.
    pub async fn find_by_property(
        &self,
        sales_property_id: &str,
    ) -> AppResult<Vec<sales_transaction::Model>> {
        SalesTransaction::find()
            .filter(sales_transaction::Column::SalesPropertyId.eq(sales_property_id))
            .order_by_desc(sales_transaction::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically record the sale, its commission, and flip the listing to
    /// `sold`.
    pub async fn close_sale(
        &self,
        sale: ClosedSale,
    ) -> AppResult<(sales_transaction::Model, sales_commission::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let listing = crate::entities::SalesProperty::find_by_id(&sale.sales_property_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::PropertyNotFound(sale.sales_property_id.clone()))?;

        if listing.status == SalesStatus::Sold {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::BadRequest(
                "Property has already been sold".to_string(),
            ));
        }

        let transaction = sale
            .transaction
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let commission = sale
            .commission
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut listing: sales_property::ActiveModel = listing.into();
        listing.status = Set(SalesStatus::Sold);
        listing.updated_at = Set(Utc::now().into());
        listing
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((transaction, commission))
    }
}
