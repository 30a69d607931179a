use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::booking::{
    BookingError, BookingRequest, BookingResult, PassengerSeat, DEFAULT_PASSENGER_NAME,
    GENERIC_FAILURE_MESSAGE,
};
use crate::gateway::{BookingGateway, GatewayError};
use crate::identity::SessionCredential;
use crate::schedule::Schedule;
use crate::seat::SeatId;

/// Turns a seat selection into one reservation call and interprets the answer.
#[derive(Clone)]
pub struct BookingSubmitter {
    gateway: Arc<dyn BookingGateway>,
    passenger_name: String,
}

impl BookingSubmitter {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self {
            gateway,
            passenger_name: DEFAULT_PASSENGER_NAME.to_string(),
        }
    }

    pub fn with_passenger_name(mut self, name: impl Into<String>) -> Self {
        self.passenger_name = name.into();
        self
    }

    pub fn gateway(&self) -> &Arc<dyn BookingGateway> {
        &self.gateway
    }

    /// Check preconditions and build the request. Never touches the network.
    pub fn prepare(
        &self,
        selected: &[SeatId],
        schedule: &Schedule,
        identity: Option<&SessionCredential>,
    ) -> Result<(BookingRequest, SessionCredential), BookingError> {
        if selected.is_empty() {
            return Err(BookingError::NoSeatsSelected);
        }
        let credential = identity
            .filter(|c| c.is_usable())
            .ok_or(BookingError::MissingCredential)?;

        let request = BookingRequest {
            user_id: credential.user_id.clone(),
            schedule_id: schedule.id.clone(),
            seats: selected
                .iter()
                .map(|&seat| PassengerSeat {
                    seat,
                    passenger_name: self.passenger_name.clone(),
                })
                .collect(),
        };
        Ok((request, credential.clone()))
    }

    /// Send a prepared request once. No retry.
    pub async fn send(&self, request: &BookingRequest, credential: &SessionCredential) -> BookingResult {
        let attempt = Uuid::new_v4();
        info!(
            %attempt,
            schedule_id = %request.schedule_id,
            seats = request.seats.len(),
            "Submitting booking"
        );

        match self.gateway.create_booking(credential, request).await {
            Ok(record) => {
                info!(%attempt, booking_id = %record.id, "Booking confirmed");
                Ok(record)
            }
            Err(e) => {
                warn!(%attempt, "Booking failed: {}", e);
                Err(map_gateway_error(e))
            }
        }
    }

    /// Validate, build and send in one go.
    pub async fn submit(
        &self,
        selected: &[SeatId],
        schedule: &Schedule,
        identity: Option<&SessionCredential>,
    ) -> BookingResult {
        let (request, credential) = self.prepare(selected, schedule, identity)?;
        self.send(&request, &credential).await
    }
}

fn map_gateway_error(err: GatewayError) -> BookingError {
    match err {
        GatewayError::Rejected { message, .. } => BookingError::Rejected(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        ),
        GatewayError::Unauthorized => BookingError::Unauthorized,
        GatewayError::Transport(detail) => BookingError::Transport(detail),
        GatewayError::InvalidResponse(detail) => BookingError::InvalidResponse(detail),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gateway::{GatewayResult, SeatInfo};
    use async_trait::async_trait;
    use busway_shared::{BookingRecord, BookedSeatPayload, ScheduleField};
    use std::sync::Mutex;

    /// Gateway double that records booking calls and answers with a canned outcome.
    pub(crate) struct MockGateway {
        pub seat_info: GatewayResult<SeatInfo>,
        pub booking_outcome: GatewayResult<()>,
        pub create_calls: Mutex<Vec<BookingRequest>>,
    }

    impl MockGateway {
        pub(crate) fn accepting() -> Self {
            Self {
                seat_info: Ok(SeatInfo::default()),
                booking_outcome: Ok(()),
                create_calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(err: GatewayError) -> Self {
            Self {
                booking_outcome: Err(err),
                ..Self::accepting()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.create_calls.lock().unwrap().len()
        }
    }

    pub(crate) fn record_for(request: &BookingRequest) -> BookingRecord {
        BookingRecord {
            id: "bk-1".into(),
            schedule_id: ScheduleField::Id(request.schedule_id.clone()),
            user_id: Some(request.user_id.clone()),
            seats: request
                .seats
                .iter()
                .map(|s| BookedSeatPayload {
                    seat_number: s.seat.to_string(),
                    passenger_name: Some(s.passenger_name.clone()),
                })
                .collect(),
            total_amount: None,
            booking_status: Some("confirmed".into()),
            payment_status: None,
            created_at: None,
        }
    }

    #[async_trait]
    impl BookingGateway for MockGateway {
        async fn fetch_seat_info(&self, _schedule_id: &str) -> GatewayResult<SeatInfo> {
            self.seat_info.clone()
        }

        async fn create_booking(
            &self,
            _credential: &SessionCredential,
            request: &BookingRequest,
        ) -> GatewayResult<BookingRecord> {
            self.create_calls.lock().unwrap().push(request.clone());
            self.booking_outcome.clone().map(|_| record_for(request))
        }

        async fn list_bookings(&self, _credential: &SessionCredential) -> GatewayResult<Vec<BookingRecord>> {
            Ok(vec![])
        }

        async fn cancel_booking(&self, _credential: &SessionCredential, _booking_id: &str) -> GatewayResult<()> {
            Ok(())
        }
    }

    fn seats(list: &[&str]) -> Vec<SeatId> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn credential() -> SessionCredential {
        SessionCredential::new("user-1", "token-1")
    }

    #[tokio::test]
    async fn test_empty_selection_fails_before_network() {
        let gateway = Arc::new(MockGateway::accepting());
        let submitter = BookingSubmitter::new(gateway.clone());

        let result = submitter.submit(&[], &Schedule::new("sch-1"), Some(&credential())).await;
        let err = result.unwrap_err();
        assert_eq!(err, BookingError::NoSeatsSelected);
        assert!(err.user_message().contains("select at least one seat"));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        let gateway = Arc::new(MockGateway::accepting());
        let submitter = BookingSubmitter::new(gateway.clone());
        let selected = seats(&["B2"]);

        let result = submitter.submit(&selected, &Schedule::new("sch-1"), None).await;
        assert_eq!(result.unwrap_err(), BookingError::MissingCredential);

        let blank = SessionCredential::new("user-1", "");
        let result = submitter.submit(&selected, &Schedule::new("sch-1"), Some(&blank)).await;
        assert_eq!(result.unwrap_err(), BookingError::MissingCredential);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_seats_go_in_one_request() {
        let gateway = Arc::new(MockGateway::accepting());
        let submitter = BookingSubmitter::new(gateway.clone()).with_passenger_name("Sita");

        let selected = seats(&["B2", "A1", "C4"]);
        let record = submitter
            .submit(&selected, &Schedule::new("sch-7"), Some(&credential()))
            .await
            .unwrap();

        assert_eq!(record.seat_numbers(), vec!["B2", "A1", "C4"]);
        let calls = gateway.create_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_id, "user-1");
        assert_eq!(calls[0].schedule_id, "sch-7");
        assert_eq!(calls[0].seat_ids(), selected);
        assert!(calls[0].seats.iter().all(|s| s.passenger_name == "Sita"));
    }

    #[tokio::test]
    async fn test_backend_rejection_is_passed_through() {
        let gateway = Arc::new(MockGateway::failing(GatewayError::Rejected {
            status: Some(409),
            message: Some("Seat B2 is already booked".into()),
        }));
        let submitter = BookingSubmitter::new(gateway.clone());

        let err = submitter
            .submit(&seats(&["B2"]), &Schedule::new("sch-1"), Some(&credential()))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::Rejected("Seat B2 is already booked".into()));
        assert_eq!(err.user_message(), "Seat B2 is already booked");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic_and_not_retried() {
        let gateway = Arc::new(MockGateway::failing(GatewayError::Transport("connection refused".into())));
        let submitter = BookingSubmitter::new(gateway.clone());

        let err = submitter
            .submit(&seats(&["B2"]), &Schedule::new("sch-1"), Some(&credential()))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(err.is_retryable());
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn test_map_gateway_error() {
        assert_eq!(
            map_gateway_error(GatewayError::Rejected { status: Some(400), message: Some("  ".into()) }),
            BookingError::Rejected(GENERIC_FAILURE_MESSAGE.into())
        );
        assert_eq!(
            map_gateway_error(GatewayError::Unauthorized),
            BookingError::Unauthorized
        );
        assert_eq!(
            BookingError::Unauthorized.user_message(),
            crate::booking::NOT_LOGGED_IN_MESSAGE
        );
        assert_eq!(
            map_gateway_error(GatewayError::InvalidResponse("missing data".into())),
            BookingError::InvalidResponse("missing data".into())
        );
    }
}
