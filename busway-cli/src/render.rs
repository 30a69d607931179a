use std::fmt::Write;

use busway_core::booking::BookingStatus;
use busway_core::{BookingPartition, SeatDisplayState, SeatSelectionSession};
use busway_shared::BookingRecord;

/// Seat grid with legend, e.g. `[A1] [xx] (A3) [A4]`.
///
/// `[A1]` available, `(A1)` selected, `[xx]` booked.
pub fn seat_grid(session: &SeatSelectionSession) -> String {
    let mut out = String::new();
    if let Some(available) = session.available_seats() {
        let _ = writeln!(out, "Available Seats: {}", available);
    }
    let _ = writeln!(out, "[A1] available   (A1) selected   [xx] booked");

    for row in session.grid() {
        let cells: Vec<String> = row
            .iter()
            .map(|(seat, state)| match state {
                SeatDisplayState::Available => format!("[{}]", seat),
                SeatDisplayState::Selected => format!("({})", seat),
                SeatDisplayState::Booked => "[xx]".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    out
}

/// Selected seats with per-seat fare and the running total.
pub fn selection_summary(session: &SeatSelectionSession) -> String {
    let selected = session.selected();
    if selected.is_empty() {
        return "No seats selected\n".to_string();
    }

    let mut out = String::new();
    for seat in selected.as_slice() {
        let _ = writeln!(out, "Seat {:<4} Rs. {}", seat.to_string(), session.fare());
    }
    let _ = writeln!(out, "Total Price: Rs. {}", session.total_price());
    out
}

pub fn booking_line(booking: &BookingRecord) -> String {
    let route = booking
        .schedule_id
        .route_label()
        .unwrap_or_else(|| format!("schedule {}", booking.schedule_id.id()));
    let amount = booking
        .total_amount
        .map(|a| format!("Rs. {}", a))
        .unwrap_or_else(|| "-".to_string());
    let date = booking
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}  {}  {}  seats: {}  {}  [{}]",
        booking.id,
        date,
        route,
        booking.seat_numbers().join(", "),
        amount,
        BookingStatus::of(booking)
    )
}

pub fn booking_overview(partition: &BookingPartition, include_past: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Upcoming ({})", partition.upcoming.len());
    for booking in &partition.upcoming {
        let _ = writeln!(out, "  {}", booking_line(booking));
    }
    if include_past {
        let _ = writeln!(out, "Past ({})", partition.past.len());
        for booking in &partition.past {
            let _ = writeln!(out, "  {}", booking_line(booking));
        }
    }
    out
}
