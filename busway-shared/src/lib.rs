pub mod pii;
pub mod models;

pub use pii::Masked;
pub use models::api::{
    ApiEnvelope, BookedSeatPayload, BookingRecord, CreateBookingPayload, PopulatedSchedule,
    RoutePayload, ScheduleField, SeatInfoPayload, SeatRequest,
};
