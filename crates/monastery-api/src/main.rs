use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use monastery_api::{ApiConfig, AppState};
use monastery_logging::{LogConfig, SubscriberBuilder};

#[derive(Debug, Parser)]
#[command(name = "monastery-api", about = "Monastery360 REST API server", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Development mode: pretty verbose logs and error detail in responses
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ApiConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let _log_guard = if args.dev {
        SubscriberBuilder::new()
            .with_config(LogConfig::development())
            .init()
    } else {
        SubscriberBuilder::new().init()
    };
    monastery_api::set_expose_errors(config.expose_errors || args.dev);

    let state = AppState::seeded(&config)?;
    let app = monastery_api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "monastery api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
