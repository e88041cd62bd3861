mod config;
mod connection;
mod handlers;
mod protocol;
mod state;

use std::sync::Arc;

use clap::Parser;
use kale_k8s::{InClusterEnvironment, LazyKubeClient};
use kale_rok_client::RokClientCell;
use kale_rpc_rok::RokRpc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Args;
use state::DaemonState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Determine token
    let token = if args.require_auth() {
        match &args.token {
            Some(t) => Some(t.clone()),
            None => {
                error!("Token required. Use --token or set KALE_DAEMON_TOKEN");
                std::process::exit(1);
            }
        }
    } else {
        warn!("Auth disabled (--insecure-no-auth). Do not use in production!");
        None
    };

    // Rok and cluster clients are built on first use
    let rok_config = args.rok_client_config()?;
    match &rok_config.url {
        Some(url) => info!("Rok gateway: {url}"),
        None => warn!("ROK_GW_URL not set; Rok requests will report not_found"),
    }
    let rok = RokRpc::new(
        Arc::new(RokClientCell::from_config(rok_config)),
        Arc::new(LazyKubeClient::new()),
        Arc::new(InClusterEnvironment::new()),
    );

    // Create shared state
    let state = Arc::new(DaemonState::new(token, rok));

    // Bind TCP listener
    let listener = TcpListener::bind(&args.listen).await?;
    info!("Listening on {}", args.listen);

    // Accept loop
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    connection::handle_client(stream, state).await;
                });
            }
            Err(e) => {
                error!("Accept error: {e}");
            }
        }
    }
}
