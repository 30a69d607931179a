pub mod commands;
pub mod error;
pub mod render;
pub mod state;

pub use commands::CommandOutput;
pub use error::{CliError, CliResult};
pub use state::AppState;
