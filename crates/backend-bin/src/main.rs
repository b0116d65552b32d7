//! Tokio / Axum entry-point for the `sessiongate` server.
use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use sessiongate_backend::{
    config::{RedactionSettings, Settings},
    create_router,
    logging::{RedactingFormat, Redactor},
    AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session and Basic authentication API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file; environment variables override it
    #[arg(short, long, default_value = sessiongate_backend::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit logs as JSON lines; personal-data masking applies to text logs only
    #[arg(long)]
    json_logs: bool,

    /// Seconds between expired-session sweeps; 0 disables sweeping
    #[arg(long, default_value_t = 300)]
    sweep_interval: u64,
}

fn init_tracing(default_level: &str, json: bool, redaction: &RedactionSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        let redactor = Redactor::from_settings(redaction).context("invalid redaction settings")?;
        let format = RedactingFormat::new(tracing_subscriber::fmt::format(), redactor);
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false).event_format(format))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(&cli.config)?;
    init_tracing(&settings.log_level, cli.json_logs, &settings.redaction)?;

    let addr = settings.bind_addr()?;
    let state = Arc::new(
        AppState::from_settings(settings)
            .await
            .context("failed to initialise application state")?,
    );

    if cli.sweep_interval > 0 && state.strategy.uses_sessions() {
        let strategy = state.strategy.clone();
        let period = Duration::from_secs(cli.sweep_interval);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(err) = strategy.sweep_expired_sessions().await {
                    tracing::warn!(error = %err, "session sweep failed");
                }
            }
        });
    }

    let app = create_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
