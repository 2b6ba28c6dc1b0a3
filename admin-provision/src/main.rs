use std::process::ExitCode;

use admin_provision::cli::Args;
use admin_provision::client::DockerPsqlClient;
use admin_provision::config::Config;
use admin_provision::prompt::TerminalPrompt;
use admin_provision::provision;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing; stdout is reserved for the operator report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_provision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::debug!(
        container = %config.db_container,
        database = %config.db_name,
        "Configuration loaded"
    );

    let client = DockerPsqlClient::from_config(&config);
    let mut stdout = std::io::stdout();

    let outcome = provision::run(&args, &config, &TerminalPrompt, &client, &mut stdout).await?;
    tracing::debug!(?outcome, "Finished");

    Ok(outcome.exit_code())
}
