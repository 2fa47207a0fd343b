use clap::Parser;
use price_tracker::cli::{Cli, Commands, RunArgs};
use price_tracker::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets usually live in .env next to the binary
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration; the environment overrides the file
    let config = Config::load_or_default(&cli.config)?.with_env()?;

    // Initialize telemetry
    price_tracker::telemetry::init_telemetry(&config.telemetry)?;

    if !cli.config.exists() {
        tracing::debug!(path = %cli.config.display(), "No config file, using defaults");
    }

    match cli.command {
        None => RunArgs::default().execute(&config).await?,
        Some(Commands::Run(args)) => args.execute(&config).await?,
        Some(Commands::Config(args)) => args.execute(&config)?,
    }

    Ok(())
}
