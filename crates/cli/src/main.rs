use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ripd_cli::config::CliConfig;
use ripd_cli::{run, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripd_cli=debug,ripd_report=info,ripd_assistant=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = CliConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        output_dir = %config.output_dir.display(),
        deadline_days = config.action_deadline_days,
        generate_defaults = config.generate_defaults,
        "Loaded configuration"
    );

    let today = chrono::Local::now().date_naive();

    let summary = run(&args, &config, today).await?;
    tracing::info!(
        output = %summary.output.display(),
        risks = summary.risks,
        actions = summary.actions,
        maturity = summary.maturity,
        "Report generated"
    );
    println!("{}", summary.output.display());
    Ok(())
}
