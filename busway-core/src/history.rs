use std::sync::Arc;

use busway_shared::BookingRecord;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::booking::{partition_bookings, BookingPartition, BookingStatus};
use crate::gateway::{BookingGateway, GatewayError, GatewayResult};
use crate::identity::SessionCredential;

/// The signed-in user's bookings: listing and cancellation.
#[derive(Clone)]
pub struct BookingHistory {
    gateway: Arc<dyn BookingGateway>,
}

impl BookingHistory {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, credential: &SessionCredential) -> GatewayResult<Vec<BookingRecord>> {
        self.gateway.list_bookings(credential).await
    }

    /// Fetch and split into upcoming and past relative to `now`.
    pub async fn overview(&self, credential: &SessionCredential, now: DateTime<Utc>) -> GatewayResult<BookingPartition> {
        let bookings = self.list(credential).await?;
        Ok(partition_bookings(bookings, now))
    }

    /// Cancel `booking_id` and return the refreshed list.
    ///
    /// Cancelling an already cancelled booking is refused locally.
    pub async fn cancel(&self, credential: &SessionCredential, booking_id: &str) -> GatewayResult<Vec<BookingRecord>> {
        let bookings = self.list(credential).await?;
        if let Some(existing) = bookings.iter().find(|b| b.id == booking_id) {
            if BookingStatus::of(existing) == BookingStatus::Cancelled {
                return Err(GatewayError::Rejected {
                    status: None,
                    message: Some(format!("Booking {} is already cancelled", booking_id)),
                });
            }
        }

        self.gateway.cancel_booking(credential, booking_id).await?;
        info!(booking_id, "Booking cancelled");
        self.list(credential).await
    }
}
