//! Farcaster frame server for checking $GOLDIES balances.
//!
//! Serves the Home -> Check -> Result frame flow and resolves balances
//! through the Airstack GraphQL API. Stateless: every inbound click is an
//! independent request.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod airstack;
mod config;
mod frames;
mod render;
mod routes;
mod state;
mod theme;

use airstack::{AirstackClient, BalanceSource, Identity};
use config::Config;
use state::AppState;
use theme::{Background, Theme};

#[derive(Parser, Debug)]
#[command(name = "frames")]
#[command(about = "Farcaster frame server for checking $GOLDIES balances")]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Background image URL for the frame views (solid fill when omitted)
    #[arg(long)]
    background_image: Option<String>,

    /// Look up a single identity (fid or name) and exit instead of serving
    #[arg(long, value_name = "IDENTITY")]
    lookup: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    // Fail fast on bad configuration, before the listener ever binds.
    let config = Config::from_env(&format!("http://localhost:{}", cli.port))?;
    let client = AirstackClient::new(&config)?;

    if let Some(raw) = cli.lookup {
        return lookup(&client, &raw).await;
    }

    let mut theme = Theme::default();
    if let Some(url) = cli.background_image {
        theme.background = Background::Image(url);
    }

    let state = Arc::new(AppState {
        theme,
        source: Arc::new(client),
        config,
    });

    let app = routes::router(state);

    let address = format!("{}:{}", cli.host, cli.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Frame server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    Ok(())
}

/// One-shot lookup mode, mostly useful as a deployment smoke test.
async fn lookup(client: &AirstackClient, raw: &str) -> Result<()> {
    let identity = Identity::parse(raw);
    let info = client.fetch_user_info(&identity).await?;

    match &info.profile_name {
        Some(name) => println!("Profile: {name}"),
        None => println!("Profile: (none found)"),
    }
    println!("Balance: {}", info.balance);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
