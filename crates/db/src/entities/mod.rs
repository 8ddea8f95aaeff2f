//! Database entities.

pub mod agency;
pub mod agent;
pub mod booking;
pub mod commission;
pub mod otp_code;
pub mod property;
pub mod property_availability;
pub mod sales_commission;
pub mod sales_property;
pub mod sales_transaction;

pub use agency::Entity as Agency;
pub use agent::Entity as Agent;
pub use booking::Entity as Booking;
pub use commission::Entity as Commission;
pub use otp_code::Entity as OtpCode;
pub use property::Entity as Property;
pub use property_availability::Entity as PropertyAvailability;
pub use sales_commission::Entity as SalesCommission;
pub use sales_property::Entity as SalesProperty;
pub use sales_transaction::Entity as SalesTransaction;
