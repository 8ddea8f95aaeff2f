//! Repository layer.
//!
//! One repository per aggregate, each a thin wrapper over the shared
//! connection handle. Multi-table writes (booking creation, cancellation,
//! sale closing) run inside database transactions here so services never
//! see half-applied state.

mod agency;
mod agent;
mod availability;
mod booking;
mod otp;
mod property;
mod sales_property;
mod sales_transaction;

pub use agency::AgencyRepository;
pub use agent::AgentRepository;
pub use availability::AvailabilityRepository;
pub use booking::{BookingFilter, BookingRepository, BookingStats, NewBooking};
pub use otp::OtpRepository;
pub use property::{PropertyFilter, PropertyRepository};
pub use sales_property::SalesPropertyRepository;
pub use sales_transaction::{ClosedSale, SalesTransactionRepository};
