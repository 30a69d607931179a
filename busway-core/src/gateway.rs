use async_trait::async_trait;
use busway_shared::{BookingRecord, SeatInfoPayload};

use crate::booking::BookingRequest;
use crate::identity::SessionCredential;
use crate::seat::SeatId;
use crate::selection::BookedSeats;

/// Errors a gateway may report. Transport details never reach the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Request rejected{}: {}", .status.map(|s| format!(" ({})", s)).unwrap_or_default(), .message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Booked-seat snapshot for one schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatInfo {
    pub booked: BookedSeats,
    pub available_seats: i64,
}

impl SeatInfo {
    /// Parse the wire payload. Seat tokens outside the grid are skipped.
    pub fn from_payload(payload: SeatInfoPayload) -> Self {
        let booked = payload.booked_seats.iter().filter_map(|raw| match raw.parse::<SeatId>() {
            Ok(seat) => Some(seat),
            Err(e) => {
                tracing::warn!("Ignoring booked seat {:?}: {}", raw, e);
                None
            }
        });
        Self {
            booked: BookedSeats::new(booked),
            available_seats: payload.available_seats,
        }
    }
}

/// Network seam for everything the booking pages need from the backend.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Booked seats and remaining count for a schedule.
    async fn fetch_seat_info(&self, schedule_id: &str) -> GatewayResult<SeatInfo>;

    /// Reserve all requested seats in one call. The backend books all or none.
    async fn create_booking(
        &self,
        credential: &SessionCredential,
        request: &BookingRequest,
    ) -> GatewayResult<BookingRecord>;

    async fn list_bookings(&self, credential: &SessionCredential) -> GatewayResult<Vec<BookingRecord>>;

    async fn cancel_booking(&self, credential: &SessionCredential, booking_id: &str) -> GatewayResult<()>;
}
