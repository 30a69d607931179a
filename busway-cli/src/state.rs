use std::sync::Arc;

use busway_client::{Config, HttpGateway};
use busway_core::{BookingGateway, BookingHistory, BookingSubmitter, FarePolicy, SessionProvider, StaticSession};

/// Everything a command needs, built once from configuration.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn BookingGateway>,
    pub submitter: BookingSubmitter,
    pub history: BookingHistory,
    pub session: Arc<dyn SessionProvider>,
    pub fare_policy: FarePolicy,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gateway: Arc<dyn BookingGateway> = Arc::new(HttpGateway::new(&config.api)?);
        Ok(Self::with_gateway(config, gateway))
    }

    pub fn with_gateway(config: &Config, gateway: Arc<dyn BookingGateway>) -> Self {
        let submitter =
            BookingSubmitter::new(gateway.clone()).with_passenger_name(config.booking.passenger_name.clone());
        Self {
            history: BookingHistory::new(gateway.clone()),
            submitter,
            gateway,
            session: Arc::new(StaticSession::new(config.session.credential())),
            fare_policy: config.booking.fare_policy(),
        }
    }
}
