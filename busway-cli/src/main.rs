use std::process::ExitCode;

use busway_cli::{commands, AppState, CliResult, CommandOutput};
use busway_client::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "busway", version, about = "Pick seats and book bus trips")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the seat map for a schedule
    Seats {
        schedule_id: String,
        /// Per-seat fare, when the schedule listing showed one
        #[arg(long)]
        fare: Option<f64>,
    },
    /// Select seats and submit them as one booking
    Book {
        schedule_id: String,
        #[arg(required = true)]
        seats: Vec<String>,
        #[arg(long)]
        fare: Option<f64>,
    },
    /// List the signed-in user's bookings
    Bookings {
        /// Include past and cancelled bookings
        #[arg(long)]
        all: bool,
    },
    Cancel {
        booking_id: String,
    },
}

async fn run(state: &AppState, command: Command) -> CliResult<CommandOutput> {
    match command {
        Command::Seats { schedule_id, fare } => commands::show_seats(state, &schedule_id, fare).await,
        Command::Book {
            schedule_id,
            seats,
            fare,
        } => commands::book(state, &schedule_id, &seats, fare).await,
        Command::Bookings { all } => commands::bookings(state, all).await,
        Command::Cancel { booking_id } => commands::cancel(state, &booking_id).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "busway=info,busway_cli=info,busway_core=info,busway_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    tracing::debug!(base_url = %config.api.base_url, "Loaded configuration");

    let state = AppState::from_config(&config)?;

    match run(&state, cli.command).await {
        Ok(output) => {
            print!("{}", output.text);
            Ok(if output.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
