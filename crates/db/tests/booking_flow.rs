//! Booking repository flow tests against a mocked database.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use maplit::btreemap;

use casaflow_common::AppError;
use casaflow_db::entities::booking::BookingStatus;
use casaflow_db::entities::commission::CommissionStatus;
use casaflow_db::entities::{booking, commission, property_availability};
use casaflow_db::repositories::{
    AvailabilityRepository, BookingFilter, BookingRepository, NewBooking,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    btreemap! { "num_items" => Value::BigInt(Some(n)) }
}

fn booking_fixture(status: BookingStatus) -> booking::Model {
    let now = Utc::now();
    booking::Model {
        id: "b1".to_string(),
        property_id: "p1".to_string(),
        owner_agent_id: "a1".to_string(),
        booking_agent_id: "a2".to_string(),
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

fn commission_fixture() -> commission::Model {
    let now = Utc::now();
    commission::Model {
        id: "c1".to_string(),
        booking_id: "b1".to_string(),
        amount: 10_000,
        owner_commission: 5_600,
        booking_commission: 2_400,
        platform_fee: 2_000,
        rate: 10.0,
        status: CommissionStatus::Pending,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn availability_fixture() -> property_availability::Model {
    let now = Utc::now();
    property_availability::Model {
        id: "av1".to_string(),
        property_id: "p1".to_string(),
        start_date: date(2026, 9, 1),
        end_date: date(2026, 9, 5),
        is_available: false,
        booking_id: Some("b1".to_string()),
        note: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn new_booking_fixture() -> NewBooking {
    let booking = booking_fixture(BookingStatus::Pending);
    let commission = commission_fixture();
    let availability = availability_fixture();
    let now = Utc::now();

    NewBooking {
        booking: booking::ActiveModel {
            id: Set(booking.id.clone()),
            property_id: Set(booking.property_id.clone()),
            owner_agent_id: Set(booking.owner_agent_id.clone()),
            booking_agent_id: Set(booking.booking_agent_id.clone()),
            client_name: Set(booking.client_name.clone()),
            client_email: Set(booking.client_email.clone()),
            client_phone: Set(None),
            check_in: Set(booking.check_in),
            check_out: Set(booking.check_out),
            duration: Set(booking.duration.clone()),
            total_amount: Set(booking.total_amount),
            notes: Set(None),
            status: Set(BookingStatus::Pending),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        },
        commission: commission::ActiveModel {
            id: Set(commission.id.clone()),
            booking_id: Set(commission.booking_id.clone()),
            amount: Set(commission.amount),
            owner_commission: Set(commission.owner_commission),
            booking_commission: Set(commission.booking_commission),
            platform_fee: Set(commission.platform_fee),
            rate: Set(commission.rate),
            status: Set(CommissionStatus::Pending),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        },
        availability: property_availability::ActiveModel {
            id: Set(availability.id.clone()),
            property_id: Set(availability.property_id.clone()),
            start_date: Set(availability.start_date),
            end_date: Set(availability.end_date),
            is_available: Set(false),
            booking_id: Set(Some(booking.id.clone())),
            note: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        },
        property_id: "p1".to_string(),
        check_in: booking.check_in,
        check_out: booking.check_out,
    }
}

#[tokio::test]
async fn test_has_conflict_when_window_blocked() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .into_connection();

    let conflict =
        AvailabilityRepository::has_conflict(&db, "p1", date(2026, 9, 1), date(2026, 9, 5), None)
            .await
            .unwrap();

    assert!(conflict);
}

#[tokio::test]
async fn test_has_conflict_when_window_free() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .into_connection();

    let conflict =
        AvailabilityRepository::has_conflict(&db, "p1", date(2026, 9, 1), date(2026, 9, 5), None)
            .await
            .unwrap();

    assert!(!conflict);
}

#[tokio::test]
async fn test_create_booked_rejects_conflicting_window() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let err = repo.create_booked(new_booking_fixture()).await.unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("not available")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_booked_inserts_all_three_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(0)]])
        .append_query_results([vec![booking_fixture(BookingStatus::Pending)]])
        .append_query_results([vec![commission_fixture()]])
        .append_query_results([vec![availability_fixture()]])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let (booking, commission) = repo.create_booked(new_booking_fixture()).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(
        commission.owner_commission + commission.booking_commission + commission.platform_fee,
        commission.amount
    );
}

#[tokio::test]
async fn test_cancel_releases_blocked_dates() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_fixture(BookingStatus::Pending)]])
        .append_query_results([vec![booking_fixture(BookingStatus::Cancelled)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let booking = repo.cancel("b1", None).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_mark_paid_updates_commission_too() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_fixture(BookingStatus::Confirmed)]])
        .append_query_results([vec![booking_fixture(BookingStatus::Paid)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let booking = repo.mark_paid("b1").await.unwrap();

    assert_eq!(booking.status, BookingStatus::Paid);
}

#[tokio::test]
async fn test_reschedule_rejects_conflicting_window() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking_fixture(BookingStatus::Confirmed)]])
        .append_query_results([vec![count_row(1)]])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let err = repo
        .reschedule("b1", date(2026, 10, 1), date(2026, 10, 5), "4 nights".into())
        .await
        .unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("not available")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_scopes_to_agency_through_property() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .append_query_results([vec![booking_fixture(BookingStatus::Pending)]])
            .into_connection(),
    );
    let repo = BookingRepository::new(db.clone());

    let filter = BookingFilter {
        agency_id: Some("ag1".to_string()),
        limit: 20,
        ..BookingFilter::default()
    };
    let (rows, total) = repo.list(&filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(total, 1);

    drop(repo);
    let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
    let sql = format!("{log:?}");
    assert!(sql.contains(r#"INNER JOIN "property""#), "{sql}");
    assert!(sql.contains("agency_id"), "{sql}");
}

#[tokio::test]
async fn test_stats_scope_to_agency() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [count_row(5)],
                [count_row(1)],
                [count_row(1)],
                [count_row(2)],
                [count_row(0)],
                [count_row(1)],
                [count_row(0)],
                [btreemap! { "revenue" => Value::BigInt(Some(200_000)) }],
            ])
            .into_connection(),
    );
    let repo = BookingRepository::new(db.clone());

    let stats = repo.stats("ag1").await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.paid, 2);
    assert_eq!(stats.total_revenue, 200_000);

    drop(repo);
    let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
    // Every counter and the revenue sum carry the tenant filter
    for entry in format!("{log:?}").split("Statement").skip(1) {
        assert!(entry.contains("agency_id"), "{entry}");
    }
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<booking::Model>::new()])
        .into_connection();
    let repo = BookingRepository::new(Arc::new(db));

    let err = repo.get_by_id("nope").await.unwrap_err();

    assert!(matches!(err, AppError::BookingNotFound(_)));
}
