pub mod seat;
pub mod selection;
pub mod pricing;
pub mod schedule;
pub mod identity;
pub mod gateway;
pub mod booking;
pub mod submitter;
pub mod session;
pub mod history;

pub use booking::{
    partition_bookings, BookingError, BookingPartition, BookingRequest, BookingResult, BookingStatus,
    PassengerSeat,
};
pub use gateway::{BookingGateway, GatewayError, GatewayResult, SeatInfo};
pub use history::BookingHistory;
pub use identity::{SessionCredential, SessionProvider, StaticSession};
pub use pricing::{total_price, FarePolicy, DEFAULT_FALLBACK_FARE};
pub use schedule::{RouteSummary, Schedule};
pub use seat::{SeatError, SeatId, SeatMap};
pub use selection::{BookedSeats, SeatDisplayState, SeatReconciler, SelectedSeats, ToggleOutcome};
pub use session::{PendingSubmission, SeatSelectionSession, VisitToken};
pub use submitter::BookingSubmitter;
