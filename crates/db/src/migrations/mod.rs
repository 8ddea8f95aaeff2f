//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_agency_table;
mod m20260101_000002_create_agent_table;
mod m20260101_000003_create_property_table;
mod m20260101_000004_create_sales_property_table;
mod m20260101_000005_create_booking_table;
mod m20260101_000006_create_commission_table;
mod m20260101_000007_create_property_availability_table;
mod m20260101_000008_create_sales_transaction_tables;
mod m20260101_000009_create_otp_code_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_agency_table::Migration),
            Box::new(m20260101_000002_create_agent_table::Migration),
            Box::new(m20260101_000003_create_property_table::Migration),
            Box::new(m20260101_000004_create_sales_property_table::Migration),
            Box::new(m20260101_000005_create_booking_table::Migration),
            Box::new(m20260101_000006_create_commission_table::Migration),
            Box::new(m20260101_000007_create_property_availability_table::Migration),
            Box::new(m20260101_000008_create_sales_transaction_tables::Migration),
            Box::new(m20260101_000009_create_otp_code_table::Migration),
        ]
    }
}
