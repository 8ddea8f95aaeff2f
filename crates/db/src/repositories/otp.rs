//! One-time passcode repository.

use std::sync::Arc;

use crate::entities::{OtpCode, otp_code, otp_code::OtpPurpose};
use casaflow_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// OTP repository for database operations.
#[derive(Clone)]
pub struct OtpRepository {
    db: Arc<DatabaseConnection>,
}

impl OtpRepository {
    /// Create a new OTP repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Store a freshly issued code.
    pub async fn create(&self, model: otp_code::ActiveModel) -> AppResult<otp_code::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the latest live (unconsumed, unexpired) code for an address.
    pub async fn find_live(
        &self,
        email: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> AppResult<Option<otp_code::Model>> {
        OtpCode::find()
            .filter(otp_code::Column::Email.eq(email.to_lowercase()))
            .filter(otp_code::Column::Purpose.eq(purpose))
            .filter(otp_code::Column::Code.eq(code))
            .filter(otp_code::Column::ConsumedAt.is_null())
            .filter(otp_code::Column::ExpiresAt.gt(Utc::now()))
            .order_by_desc(otp_code::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Consume a code so it can never verify again.
    pub async fn consume(&self, model: otp_code::Model) -> AppResult<otp_code::Model> {
        let mut active: otp_code::ActiveModel = model.into();
        active.consumed_at = Set(Some(Utc::now().into()));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete expired codes. Called opportunistically on issue.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let res = OtpCode::delete_many()
            .filter(otp_code::Column::ExpiresAt.lt(Utc::now()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(res.rows_affected)
    }
}
