//! REST implementation of [`BookingGateway`].

use std::time::Duration;

use async_trait::async_trait;
use busway_core::{BookingGateway, BookingRequest, GatewayError, GatewayResult, SeatInfo, SessionCredential};
use busway_shared::{ApiEnvelope, BookingRecord, SeatInfoPayload};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::app_config::ApiConfig;
use crate::error::{ClientError, ClientResult};

const SEATS_BY_SCHEDULE: &str = "api/seats/schedule";
const CREATE_BOOKING: &str = "api/booking/create";
const BOOKINGS_BY_USER: &str = "api/booking/user";
const BOOKING: &str = "api/booking";

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(request: RequestBuilder, credential: &SessionCredential) -> RequestBuilder {
        request.bearer_auth(credential.bearer())
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> GatewayResult<ApiEnvelope<T>> {
        let response = request.send().await.map_err(ClientError::from)?;
        Self::read_envelope(response).await
    }

    /// Map status and body to an envelope, or to the matching [`GatewayError`].
    async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<ApiEnvelope<T>> {
        let status = response.status();
        let body = response.text().await.map_err(ClientError::from)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }

        if !status.is_success() {
            let message = backend_message(&body);
            if status.is_client_error() {
                return Err(GatewayError::Rejected {
                    status: Some(status.as_u16()),
                    message,
                });
            }
            return Err(GatewayError::Transport(format!(
                "HTTP {}{}",
                status,
                message.map(|m| format!(": {}", m)).unwrap_or_default()
            )));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(ClientError::from)?;
        if envelope.success == Some(false) {
            return Err(GatewayError::Rejected {
                status: Some(status.as_u16()),
                message: envelope.message,
            });
        }
        Ok(envelope)
    }
}

/// `message`/`error` from a JSON error body, or the body itself when it is plain text.
fn backend_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        return envelope.message;
    }
    let text = body.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn require_data<T>(envelope: ApiEnvelope<T>, what: &str) -> GatewayResult<T> {
    envelope
        .data
        .ok_or_else(|| GatewayError::InvalidResponse(format!("{} response without data", what)))
}

#[async_trait]
impl BookingGateway for HttpGateway {
    async fn fetch_seat_info(&self, schedule_id: &str) -> GatewayResult<SeatInfo> {
        let url = self.url(&format!("{}/{}", SEATS_BY_SCHEDULE, schedule_id));
        debug!(%url, "Fetching booked seats");

        let envelope = Self::send::<SeatInfoPayload>(self.client.get(&url)).await?;
        Ok(SeatInfo::from_payload(require_data(envelope, "Seat info")?))
    }

    async fn create_booking(
        &self,
        credential: &SessionCredential,
        request: &BookingRequest,
    ) -> GatewayResult<BookingRecord> {
        let url = self.url(CREATE_BOOKING);
        let payload = request.to_payload();
        debug!(%url, seats = payload.seats.len(), "Creating booking");

        let builder = Self::authorized(self.client.post(&url).json(&payload), credential);
        let envelope = Self::send::<BookingRecord>(builder).await?;
        require_data(envelope, "Booking")
    }

    async fn list_bookings(&self, credential: &SessionCredential) -> GatewayResult<Vec<BookingRecord>> {
        let url = self.url(&format!("{}/{}", BOOKINGS_BY_USER, credential.user_id));
        debug!(%url, "Listing bookings");

        let builder = Self::authorized(self.client.get(&url), credential);
        let envelope = Self::send::<Vec<BookingRecord>>(builder).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn cancel_booking(&self, credential: &SessionCredential, booking_id: &str) -> GatewayResult<()> {
        let url = self.url(&format!("{}/{}/cancel", BOOKING, booking_id));
        debug!(%url, "Cancelling booking");

        let builder = Self::authorized(self.client.put(&url).json(&serde_json::json!({})), credential);
        Self::send::<serde_json::Value>(builder).await?;
        Ok(())
    }
}
