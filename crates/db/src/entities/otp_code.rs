//! One-time passcode entity (email-based authentication).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What the passcode authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    #[sea_orm(string_value = "signup")]
    Signup,
    #[sea_orm(string_value = "login")]
    Login,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "otp_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub email: String,

    /// 6-digit code
    pub code: String,

    pub purpose: OtpPurpose,

    pub expires_at: DateTimeWithTimeZone,

    /// Set once the code has been used; consumed codes never verify again
    #[sea_orm(nullable)]
    pub consumed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
