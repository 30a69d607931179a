use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use busway_client::{app_config::ApiConfig, HttpGateway};
use busway_core::{
    BookingError, BookingGateway, BookingSubmitter, FarePolicy, GatewayError, Schedule, SeatDisplayState,
    SeatId, SeatSelectionSession, SessionCredential,
};
use busway_shared::CreateBookingPayload;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Backend {
    bookings: Arc<Mutex<Vec<(Option<String>, CreateBookingPayload)>>>,
    booked: Arc<Mutex<Vec<String>>>,
    cancelled: Arc<Mutex<Vec<String>>>,
}

async fn seats(State(backend): State<Backend>, Path(schedule_id): Path<String>) -> impl IntoResponse {
    if schedule_id == "broken" {
        return (StatusCode::OK, Json(json!({ "success": true }))).into_response();
    }
    let booked = backend.booked.lock().unwrap().clone();
    Json(json!({
        "success": true,
        "data": { "booked_seats": booked, "available_seats": 40 - booked.len() }
    }))
    .into_response()
}

async fn create_booking(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingPayload>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    backend.bookings.lock().unwrap().push((auth.clone(), payload.clone()));

    if auth.as_deref() != Some("Bearer token-1") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" }))).into_response();
    }

    let mut booked = backend.booked.lock().unwrap();
    if let Some(taken) = payload.seats.iter().find(|s| booked.contains(&s.seat_number)) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": format!("Seat {} is already booked", taken.seat_number) })),
        )
            .into_response();
    }
    booked.extend(payload.seats.iter().map(|s| s.seat_number.clone()));

    Json(json!({
        "success": true,
        "data": {
            "_id": "bk-100",
            "schedule_id": payload.schedule_id,
            "user_id": payload.user_id,
            "seats": payload.seats,
            "total_amount": 700 * payload.seats.len(),
            "booking_status": "confirmed",
            "createdAt": "2030-01-01T10:00:00Z"
        }
    }))
    .into_response()
}

async fn user_bookings(Path(user_id): Path<String>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [{
            "_id": "bk-1",
            "user_id": user_id,
            "schedule_id": { "_id": "sch-1", "route_id": { "source": "Kathmandu", "destination": "Pokhara" } },
            "seats": [{ "seat_number": "A1", "passenger_name": "Passenger" }],
            "booking_status": "confirmed"
        }]
    }))
}

async fn cancel(State(backend): State<Backend>, Path(booking_id): Path<String>) -> impl IntoResponse {
    if booking_id == "gone" {
        return (StatusCode::NOT_FOUND, "Booking not found").into_response();
    }
    backend.cancelled.lock().unwrap().push(booking_id);
    Json(json!({ "success": true, "message": "Booking cancelled" })).into_response()
}

async fn spawn_backend(backend: Backend) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/seats/schedule/{id}", get(seats))
        .route("/api/booking/create", post(create_booking))
        .route("/api/booking/user/{id}", get(user_bookings))
        .route("/api/booking/{id}/cancel", put(cancel))
        .with_state(backend);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn credential() -> SessionCredential {
    SessionCredential::new("user-1", "token-1")
}

#[tokio::test]
async fn test_fetch_seat_info() {
    let backend = Backend::default();
    backend.booked.lock().unwrap().extend(["A1".to_string(), "C3".to_string()]);
    let gateway = gateway(&spawn_backend(backend).await);

    let info = gateway.fetch_seat_info("sch-1").await.unwrap();
    assert_eq!(info.available_seats, 38);
    assert!(info.booked.contains(&"C3".parse().unwrap()));

    let err = gateway.fetch_seat_info("broken").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_booking_flow_against_backend() {
    let backend = Backend::default();
    backend.booked.lock().unwrap().push("A1".to_string());
    let gateway = Arc::new(gateway(&spawn_backend(backend.clone()).await));
    let submitter = BookingSubmitter::new(gateway.clone());

    let mut session = SeatSelectionSession::open(Schedule::new("sch-1").with_fare(700.0), FarePolicy::default());
    session.load(gateway.as_ref()).await.unwrap();
    assert_eq!(session.classify(&"A1".parse().unwrap()), SeatDisplayState::Booked);

    session.toggle("B2".parse().unwrap());
    session.toggle("B3".parse().unwrap());
    assert_eq!(session.total_price(), 1400.0);

    let record = session.submit(&submitter, Some(&credential())).await.unwrap();
    assert_eq!(record.id, "bk-100");
    assert_eq!(record.seat_numbers(), vec!["B2", "B3"]);
    assert!(session.selected().is_empty());

    let calls = backend.bookings.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some("Bearer token-1"));
    assert_eq!(
        serde_json::to_value(&calls[0].1).unwrap(),
        json!({
            "user_id": "user-1",
            "schedule_id": "sch-1",
            "seats": [
                { "seat_number": "B2", "passenger_name": "Passenger" },
                { "seat_number": "B3", "passenger_name": "Passenger" }
            ]
        })
    );
}

#[tokio::test]
async fn test_concurrent_booking_race_is_rejected_verbatim() {
    let backend = Backend::default();
    let gateway = Arc::new(gateway(&spawn_backend(backend.clone()).await));
    let submitter = BookingSubmitter::new(gateway.clone());

    let mut session = SeatSelectionSession::open(Schedule::new("sch-1"), FarePolicy::default());
    session.load(gateway.as_ref()).await.unwrap();
    session.toggle("B2".parse().unwrap());

    // Someone else books B2 after our fetch.
    backend.booked.lock().unwrap().push("B2".to_string());

    let err = session.submit(&submitter, Some(&credential())).await.unwrap_err();
    assert_eq!(err, BookingError::Rejected("Seat B2 is already booked".into()));
    assert_eq!(session.selected().as_slice(), &["B2".parse::<SeatId>().unwrap()]);
    assert!(session.needs_refresh());

    session.load(gateway.as_ref()).await.unwrap();
    assert!(session.selected().is_empty());
    assert_eq!(session.classify(&"B2".parse().unwrap()), SeatDisplayState::Booked);
}

#[tokio::test]
async fn test_bad_token_maps_to_unauthorized() {
    let gateway = gateway(&spawn_backend(Backend::default()).await);
    let submitter = BookingSubmitter::new(Arc::new(gateway.clone()));

    let stale = SessionCredential::new("user-1", "expired");
    let err = gateway
        .create_booking(
            &stale,
            &submitter
                .prepare(&["A2".parse().unwrap()], &Schedule::new("sch-1"), Some(&stale))
                .unwrap()
                .0,
        )
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized);
}

#[tokio::test]
async fn test_list_and_cancel_bookings() {
    let backend = Backend::default();
    let gateway = gateway(&spawn_backend(backend.clone()).await);

    let bookings = gateway.list_bookings(&credential()).await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_id.as_deref(), Some("user-1"));
    assert_eq!(bookings[0].schedule_id.route_label().as_deref(), Some("Kathmandu → Pokhara"));

    gateway.cancel_booking(&credential(), "bk-1").await.unwrap();
    assert_eq!(backend.cancelled.lock().unwrap().as_slice(), &["bk-1".to_string()]);

    let err = gateway.cancel_booking(&credential(), "gone").await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Rejected {
            status: Some(404),
            message: Some("Booking not found".into())
        }
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = Arc::new(gateway(&format!("http://{}", addr)));
    let submitter = BookingSubmitter::new(gateway.clone());

    let err = submitter
        .submit(&["B2".parse().unwrap()], &Schedule::new("sch-1"), Some(&credential()))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Transport(_)));
    assert_eq!(err.user_message(), "Booking failed. Please try again.");
}
