use atlasiq_core::Platform;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analyze;

#[derive(Debug, Parser)]
#[command(name = "atlasiq")]
#[command(about = "Local-area social sentiment from Facebook and Instagram")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch posts near a coordinate and print the aggregate sentiment as JSON
    Analyze {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters (defaults to `ATLASIQ_SEARCH_RADIUS_METERS`)
        #[arg(long)]
        radius: Option<f64>,

        /// Restrict to one or more platforms (repeatable); all when omitted
        #[arg(long = "platform")]
        platforms: Vec<Platform>,

        /// Group posts into category factors in the breakdown
        #[arg(long)]
        categorize: bool,
    },
    /// Score a single text offline and print the result as JSON
    Score { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            lat,
            lon,
            radius,
            platforms,
            categorize,
        } => {
            let config = atlasiq_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let request = analyze::AnalyzeRequest {
                latitude: lat,
                longitude: lon,
                radius_meters: radius,
                platforms,
                categorize,
            };
            analyze::run_analyze(&config, request).await?;
        }
        Commands::Score { text } => {
            let level =
                std::env::var("ATLASIQ_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            init_tracing(&level)?;
            analyze::run_score(&text)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(fallback_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
