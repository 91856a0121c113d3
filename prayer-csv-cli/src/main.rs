mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prayer-csv")]
#[command(about = "Prayer times calendar CSV export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prayer times and generate a calendar CSV file
    Generate {
        /// Street address the times are calculated for
        #[arg(short, long)]
        address: String,

        /// Calendar year
        #[arg(short, long)]
        year: i32,

        /// Solar depression angle for Fajr, in degrees
        #[arg(long, default_value = "15.0")]
        fajr_angle: f64,

        /// Solar depression angle for Isha, in degrees
        #[arg(long, default_value = "15.0")]
        isha_angle: f64,

        /// Use the Hanafi method for Asr instead of the standard one
        #[arg(long)]
        hanafi_asr: bool,

        /// Minutes each event block starts before the prayer time
        #[arg(long, default_value = "0")]
        lead_minutes: i64,

        /// Minutes each event block ends after the prayer time
        #[arg(long, default_value = "5")]
        lag_minutes: i64,

        /// Number of months to fetch, starting from January
        #[arg(long, default_value = "12")]
        months: u32,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List available timing providers
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("prayer_csv_cli={log_level},prayer_csv_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate {
            address,
            year,
            fajr_angle,
            isha_angle,
            hanafi_asr,
            lead_minutes,
            lag_minutes,
            months,
            output,
        } => {
            commands::generate_command(commands::GenerateParams {
                address,
                year,
                fajr_angle,
                isha_angle,
                hanafi_asr,
                lead_minutes,
                lag_minutes,
                months,
                output,
            })
            .await
        }

        Commands::Providers => commands::providers_command(),
    }
}
