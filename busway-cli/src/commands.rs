use std::fmt::Write;

use busway_core::{BookingError, Schedule, SeatId, SeatSelectionSession, ToggleOutcome};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::{CliError, CliResult};
use crate::render;
use crate::state::AppState;

/// Printed text plus whether the command reached its goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, success: true }
    }
}

fn schedule(schedule_id: &str, fare: Option<f64>) -> Schedule {
    let schedule = Schedule::new(schedule_id);
    match fare {
        Some(fare) => schedule.with_fare(fare),
        None => schedule,
    }
}

async fn open_session(state: &AppState, schedule_id: &str, fare: Option<f64>) -> CliResult<SeatSelectionSession> {
    let mut session = SeatSelectionSession::open(schedule(schedule_id, fare), state.fare_policy);
    session.load(state.gateway.as_ref()).await?;
    Ok(session)
}

pub async fn show_seats(state: &AppState, schedule_id: &str, fare: Option<f64>) -> CliResult<CommandOutput> {
    let session = open_session(state, schedule_id, fare).await?;
    Ok(CommandOutput::ok(render::seat_grid(&session)))
}

/// Select `seats` on a fresh seat map and submit them as one booking.
///
/// A rejection reloads the seat map so the user sees what changed.
pub async fn book(
    state: &AppState,
    schedule_id: &str,
    seats: &[String],
    fare: Option<f64>,
) -> CliResult<CommandOutput> {
    let seats = seats
        .iter()
        .map(|raw| raw.parse::<SeatId>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = open_session(state, schedule_id, fare).await?;
    let mut out = String::new();

    for seat in seats {
        if session.selected().contains(&seat) {
            continue;
        }
        if session.toggle(seat) == ToggleOutcome::Rejected {
            let _ = writeln!(out, "Seat {} is already booked", seat);
        }
    }
    out.push_str(&render::selection_summary(&session));

    let credential = state.session.current();
    match session.submit(&state.submitter, credential.as_ref()).await {
        Ok(record) => {
            info!(booking_id = %record.id, "Booked {} seat(s)", record.seats.len());
            let _ = writeln!(out, "Booking successful!");
            let _ = writeln!(out, "{}", render::booking_line(&record));
            Ok(CommandOutput::ok(out))
        }
        Err(err) => {
            let _ = writeln!(out, "{}", err.user_message());
            if session.needs_refresh() {
                match session.load(state.gateway.as_ref()).await {
                    Ok(()) => out.push_str(&render::seat_grid(&session)),
                    Err(reload) => warn!("Seat map reload failed: {}", reload),
                }
            }
            if matches!(err, BookingError::Transport(_) | BookingError::InvalidResponse(_)) {
                warn!("Booking attempt failed: {}", err);
            }
            Ok(CommandOutput { text: out, success: false })
        }
    }
}

pub async fn bookings(state: &AppState, include_past: bool) -> CliResult<CommandOutput> {
    let credential = state.session.current().ok_or(CliError::SignedOut)?;
    let partition = state.history.overview(&credential, Utc::now()).await?;
    Ok(CommandOutput::ok(render::booking_overview(&partition, include_past)))
}

pub async fn cancel(state: &AppState, booking_id: &str) -> CliResult<CommandOutput> {
    let credential = state.session.current().ok_or(CliError::SignedOut)?;
    let remaining = state.history.cancel(&credential, booking_id).await?;

    let mut out = format!("Booking {} cancelled\n", booking_id);
    for booking in &remaining {
        let _ = writeln!(out, "  {}", render::booking_line(booking));
    }
    Ok(CommandOutput::ok(out))
}
