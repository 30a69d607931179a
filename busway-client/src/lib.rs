pub mod app_config;
pub mod error;
pub mod http_gateway;

pub use app_config::Config;
pub use error::{ClientError, ClientResult};
pub use http_gateway::HttpGateway;
