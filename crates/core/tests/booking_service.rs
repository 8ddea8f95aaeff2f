//! Booking service tests against a mocked database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use casaflow_common::AppError;
use casaflow_common::config::CommissionConfig;
use casaflow_core::{BookingService, CreateBookingInput, RescheduleBookingInput, UpdateBookingStatusInput};
use casaflow_db::entities::agent::AgentRole;
use casaflow_db::entities::booking::BookingStatus;
use casaflow_db::entities::property::ListingStatus;
use casaflow_db::entities::{agent, booking, property};
use casaflow_db::repositories::{AgentRepository, BookingFilter, BookingRepository, PropertyRepository};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service(db: DatabaseConnection) -> BookingService {
    let db = Arc::new(db);
    BookingService::new(
        BookingRepository::new(db.clone()),
        PropertyRepository::new(db.clone()),
        AgentRepository::new(db),
        CommissionConfig { rental_rate: 10.0 },
    )
}

fn agent_fixture(agency_id: &str) -> agent::Model {
    let now = Utc::now();
    agent::Model {
        id: "a1".to_string(),
        email: "lena@example.com".to_string(),
        name: "Lena Agent".to_string(),
        phone: None,
        avatar_url: None,
        role: AgentRole::Agent,
        onboarding_step: 4,
        email_verified: true,
        agency_id: Some(agency_id.to_string()),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn property_fixture(agency_id: &str, status: ListingStatus) -> property::Model {
    let now = Utc::now();
    property::Model {
        id: "p1".to_string(),
        agency_id: agency_id.to_string(),
        agent_id: "a1".to_string(),
        title: "Seaside flat".to_string(),
        description: None,
        city: "Lisbon".to_string(),
        district: None,
        address: None,
        price_per_night: Some(12_000),
        price_per_month: None,
        bedrooms: 2,
        bathrooms: 1,
        area_sqm: Some(64),
        amenities: serde_json::json!([]),
        media_keys: serde_json::json!([]),
        status,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn booking_fixture(status: BookingStatus) -> booking::Model {
    let now = Utc::now();
    booking::Model {
        id: "b1".to_string(),
        property_id: "p1".to_string(),
        owner_agent_id: "a1".to_string(),
        booking_agent_id: "a1".to_string(),
        client_name: "Dana Client".to_string(),
        client_email: "dana@example.com".to_string(),
        client_phone: None,
        check_in: date(2026, 9, 1),
        check_out: date(2026, 9, 5),
        duration: "4 nights".to_string(),
        total_amount: 100_000,
        notes: None,
        status,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn create_input(check_in: NaiveDate, check_out: NaiveDate) -> CreateBookingInput {
    serde_json::from_value(serde_json::json!({
        "propertyId": "p1",
        "clientName": "Dana Client",
        "clientEmail": "dana@example.com",
        "checkIn": check_in,
        "checkOut": check_out,
        "totalAmount": 100_000,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_create_rejects_inverted_dates() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let err = service
        .create(&agent, create_input(date(2026, 9, 5), date(2026, 9, 1)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_rejects_foreign_listing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![property_fixture("other", ListingStatus::Published)]])
        .into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let err = service
        .create(&agent, create_input(date(2026, 9, 1), date(2026, 9, 5)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_rejects_archived_listing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![property_fixture("ag1", ListingStatus::Archived)]])
        .into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let err = service
        .create(&agent, create_input(date(2026, 9, 1), date(2026, 9, 5)))
        .await
        .unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("Archived")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_rejects_foreign_owner_agent() {
    let mut foreign_owner = agent_fixture("other");
    foreign_owner.id = "a9".to_string();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![property_fixture("ag1", ListingStatus::Published)]])
        .append_query_results([vec![foreign_owner]])
        .into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let input: CreateBookingInput = serde_json::from_value(serde_json::json!({
        "propertyId": "p1",
        "ownerAgentId": "a9",
        "clientName": "Dana Client",
        "clientEmail": "dana@example.com",
        "checkIn": date(2026, 9, 1),
        "checkOut": date(2026, 9, 5),
        "totalAmount": 100_000,
    }))
    .unwrap();
    let err = service.create(&agent, input).await.unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("Owner agent")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_requires_agency() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let service = service(db);
    let mut agent = agent_fixture("ag1");
    agent.agency_id = None;

    let err = service
        .list(&agent, BookingFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_update_status_rejects_invalid_transition() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_fixture(BookingStatus::Paid)]])
        .append_query_results([vec![property_fixture("ag1", ListingStatus::Published)]])
        .into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let input = UpdateBookingStatusInput {
        status: BookingStatus::Confirmed,
        notes: None,
    };
    let err = service.update_status(&agent, "b1", input).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_reschedule_rejects_cancelled_booking() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_fixture(BookingStatus::Cancelled)]])
        .append_query_results([vec![property_fixture("ag1", ListingStatus::Published)]])
        .into_connection();
    let service = service(db);
    let agent = agent_fixture("ag1");

    let input = RescheduleBookingInput {
        check_in: date(2026, 10, 1),
        check_out: date(2026, 10, 5),
    };
    let err = service.reschedule(&agent, "b1", input).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}
