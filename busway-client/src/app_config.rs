use busway_core::{FarePolicy, SessionCredential, DEFAULT_FALLBACK_FARE};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Per-seat fare for schedules that carry none.
    #[serde(default = "default_fallback_fare")]
    pub fallback_fare: f64,
    #[serde(default = "default_passenger_name")]
    pub passenger_name: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            fallback_fare: default_fallback_fare(),
            passenger_name: default_passenger_name(),
        }
    }
}

fn default_fallback_fare() -> f64 {
    DEFAULT_FALLBACK_FARE
}

fn default_passenger_name() -> String {
    busway_core::booking::DEFAULT_PASSENGER_NAME.to_string()
}

impl BookingConfig {
    pub fn fare_policy(&self) -> FarePolicy {
        FarePolicy::new(self.fallback_fare)
    }
}

/// Stand-in for the login flow: who is signed in, if anyone.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    pub user_id: Option<String>,
    pub token: Option<busway_shared::Masked<String>>,
}

impl SessionConfig {
    pub fn credential(&self) -> Option<SessionCredential> {
        match (&self.user_id, &self.token) {
            (Some(user_id), Some(token)) => {
                let credential = SessionCredential::new(user_id.clone(), token.expose().clone());
                credential.is_usable().then_some(credential)
            }
            _ => None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            // Defaults shipped with the repo; optional so the binary runs from anywhere
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `BUSWAY__API__BASE_URL=http://api:3000`
            .add_source(Self::environment());

        builder.build()?.try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("BUSWAY")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(toml: &str, env: &[(&str, &str)]) -> Config {
        let vars = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .add_source(Config::environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = build("", &[]);
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.booking.fallback_fare, DEFAULT_FALLBACK_FARE);
        assert_eq!(config.booking.passenger_name, "Passenger");
        assert!(config.session.credential().is_none());
    }

    #[test]
    fn test_file_then_environment_layering() {
        let toml = r#"
            [api]
            base_url = "http://staging:3000"

            [booking]
            fallback_fare = 600.5

            [session]
            user_id = "u-42"
            token = "from-file"
        "#;
        let config = build(
            toml,
            &[("BUSWAY__BOOKING__FALLBACK_FARE", "800"), ("BUSWAY__SESSION__TOKEN", "from-env")],
        );

        assert_eq!(config.api.base_url, "http://staging:3000");
        assert_eq!(config.booking.fallback_fare, 800.0);
        assert_eq!(config.booking.fare_policy().fallback_fare, 800.0);

        let credential = config.session.credential().unwrap();
        assert_eq!(credential.user_id, "u-42");
        assert_eq!(credential.bearer(), "from-env");
    }

    #[test]
    fn test_blank_session_token_is_signed_out() {
        let config = build("[session]\nuser_id = \"u-1\"\ntoken = \"\"\n", &[]);
        assert!(config.session.credential().is_none());
    }
}
