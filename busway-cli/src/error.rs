use busway_core::{BookingError, GatewayError, SeatError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    InvalidSeat(#[from] SeatError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("You must be logged in to view bookings.")]
    SignedOut,
}

impl CliError {
    /// Text to print for the user; transport detail goes to the log only.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Booking(err) => err.user_message().to_string(),
            CliError::Gateway(GatewayError::Rejected { message: Some(m), .. }) => m.clone(),
            CliError::Gateway(GatewayError::Unauthorized) => {
                busway_core::booking::NOT_LOGGED_IN_MESSAGE.to_string()
            }
            CliError::Gateway(err) => {
                tracing::error!("Backend request failed: {}", err);
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
