//! Request and response bodies of the booking REST API.
//!
//! Field names follow the backend exactly (`_id`, `createdAt`, snake_case elsewhere).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope every endpoint wraps its payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// A missing `success` flag counts as success when the payload is present.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(self.data.is_some())
    }
}

/// `GET /api/seats/schedule/{id}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatInfoPayload {
    pub booked_seats: Vec<String>,
    pub available_seats: i64,
}

/// `POST /api/booking/create` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingPayload {
    pub user_id: String,
    pub schedule_id: String,
    pub seats: Vec<SeatRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRequest {
    pub seat_number: String,
    pub passenger_name: String,
}

/// Route as embedded in a populated schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePayload {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulatedSchedule {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub fare: Option<f64>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub route_id: Option<RoutePayload>,
}

/// The backend returns `schedule_id` either as a bare id or populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleField {
    Id(String),
    Populated(PopulatedSchedule),
}

impl ScheduleField {
    pub fn id(&self) -> &str {
        match self {
            ScheduleField::Id(id) => id,
            ScheduleField::Populated(schedule) => &schedule.id,
        }
    }

    /// `"source → destination"` when the route was populated.
    pub fn route_label(&self) -> Option<String> {
        match self {
            ScheduleField::Populated(PopulatedSchedule { route_id: Some(route), .. }) => {
                match (&route.source, &route.destination) {
                    (Some(source), Some(destination)) => Some(format!("{} → {}", source, destination)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSeatPayload {
    pub seat_number: String,
    #[serde(default)]
    pub passenger_name: Option<String>,
}

/// A persisted booking as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub schedule_id: ScheduleField,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub seats: Vec<BookedSeatPayload>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub booking_status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingRecord {
    pub fn seat_numbers(&self) -> Vec<&str> {
        self.seats.iter().map(|s| s.seat_number.as_str()).collect()
    }
}
