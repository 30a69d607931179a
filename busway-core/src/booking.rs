use busway_shared::{BookingRecord, CreateBookingPayload, SeatRequest};
use chrono::{DateTime, Utc};
use std::fmt;

use crate::seat::SeatId;

pub const NO_SEATS_MESSAGE: &str = "Please select at least one seat to proceed.";
pub const NOT_LOGGED_IN_MESSAGE: &str = "You must be logged in to make a booking.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Booking failed. Please try again.";

/// Passenger name sent for every seat unless configured otherwise.
pub const DEFAULT_PASSENGER_NAME: &str = "Passenger";

/// One multi-seat reservation, sent as a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub user_id: String,
    pub schedule_id: String,
    pub seats: Vec<PassengerSeat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerSeat {
    pub seat: SeatId,
    pub passenger_name: String,
}

impl BookingRequest {
    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.seat).collect()
    }

    pub fn to_payload(&self) -> CreateBookingPayload {
        CreateBookingPayload {
            user_id: self.user_id.clone(),
            schedule_id: self.schedule_id.clone(),
            seats: self
                .seats
                .iter()
                .map(|s| SeatRequest {
                    seat_number: s.seat.to_string(),
                    passenger_name: s.passenger_name.clone(),
                })
                .collect(),
        }
    }
}

/// Why a booking attempt did not produce a booking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("No seats selected")]
    NoSeatsSelected,

    #[error("No session credential")]
    MissingCredential,

    #[error("A booking is already being submitted")]
    SubmissionInFlight,

    /// Backend refused the booking; the message is shown as-is.
    #[error("Booking rejected: {0}")]
    Rejected(String),

    /// Backend did not accept the session token.
    #[error("Session token rejected")]
    Unauthorized,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed booking response: {0}")]
    InvalidResponse(String),

    /// The page was closed before the response arrived.
    #[error("Booking response discarded")]
    Discarded,
}

impl BookingError {
    /// Text to show the user.
    pub fn user_message(&self) -> &str {
        match self {
            BookingError::NoSeatsSelected => NO_SEATS_MESSAGE,
            BookingError::MissingCredential | BookingError::Unauthorized => NOT_LOGGED_IN_MESSAGE,
            BookingError::SubmissionInFlight => "A booking is already being submitted.",
            BookingError::Rejected(message) => message,
            BookingError::Transport(_) | BookingError::InvalidResponse(_) | BookingError::Discarded => {
                GENERIC_FAILURE_MESSAGE
            }
        }
    }

    /// Failures reported before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BookingError::NoSeatsSelected | BookingError::MissingCredential | BookingError::SubmissionInFlight
        )
    }

    /// The same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Transport(_) | BookingError::InvalidResponse(_))
    }
}

/// Outcome of a submit: the persisted booking, or the reason it failed.
pub type BookingResult = Result<BookingRecord, BookingError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            other => BookingStatus::Other(other.to_string()),
        }
    }

    pub fn of(record: &BookingRecord) -> Self {
        record
            .booking_status
            .as_deref()
            .map(Self::parse)
            .unwrap_or(BookingStatus::Pending)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => f.write_str("pending"),
            BookingStatus::Confirmed => f.write_str("confirmed"),
            BookingStatus::Cancelled => f.write_str("cancelled"),
            BookingStatus::Other(s) => f.write_str(s),
        }
    }
}

/// A user's bookings split the way the profile page tabs them.
#[derive(Debug, Clone, Default)]
pub struct BookingPartition {
    pub upcoming: Vec<BookingRecord>,
    pub past: Vec<BookingRecord>,
}

/// Upcoming: created at or after `now` and not cancelled. Everything else is past.
///
/// Bookings without a timestamp count as past.
pub fn partition_bookings(bookings: Vec<BookingRecord>, now: DateTime<Utc>) -> BookingPartition {
    let (upcoming, past) = bookings.into_iter().partition(|b| {
        let recent = b.created_at.map(|at| at >= now).unwrap_or(false);
        recent && BookingStatus::of(b) != BookingStatus::Cancelled
    });
    BookingPartition { upcoming, past }
}
