//! Business logic for casaflow: commission math and the services the API
//! layer is built on.

pub mod commission;
pub mod services;

pub use commission::{RentalSplit, SalesSplit, rental_split, sales_split};
pub use services::*;
