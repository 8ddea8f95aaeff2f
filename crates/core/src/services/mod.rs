//! Business logic services.

pub mod agency;
pub mod agent;
pub mod auth;
pub mod booking;
pub mod email;
pub mod property;
pub mod sales;
pub mod storage;

pub use agency::{AgencyService, CreateAgencyInput, UpdateAgencyInput};
pub use agent::{AgentService, UpdateProfileInput};
pub use auth::{AuthService, Claims, RequestOtpInput, VerifyOtpInput, VerifiedLogin};
pub use booking::{
    BookingService, CreateBookingInput, RescheduleBookingInput, UpdateBookingStatusInput,
    duration_label, transition_allowed,
};
pub use email::EmailService;
pub use property::{
    BlockDatesInput, CreatePropertyInput, PropertyService, UpdatePropertyInput,
};
pub use sales::{
    CloseSaleInput, CreateSalesPropertyInput, SalesService, UpdateSalesPropertyInput,
};
pub use storage::{RequestUploadInput, StorageService};
