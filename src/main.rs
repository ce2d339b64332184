use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use intentia_gateway::config::Args;
use intentia_gateway::cors::CorsPolicy;
use intentia_gateway::handlers::router;
use intentia_gateway::rate_limit::{RateLimiter, sweeper};
use intentia_gateway::state::AppState;
use intentia_gateway::store::{EventStore, SupabaseStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    init_tracing(args.log_json);

    info!("Starting Intentia gateway v{}", env!("CARGO_PKG_VERSION"));

    let limiter = Arc::new(RateLimiter::new(
        args.rate_limit,
        Duration::from_secs(args.rate_window),
    ));

    let store: Option<Arc<dyn EventStore>> = match args.supabase_credentials() {
        Some((url, key)) => {
            let store = SupabaseStore::new(reqwest::Client::new(), url, key.to_string(), &args.table);
            info!(endpoint = %store.endpoint(), "Event store configured");
            let store: Arc<dyn EventStore> = Arc::new(store);
            Some(store)
        }
        None => {
            warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY missing, security events will be refused");
            None
        }
    };

    let cors = CorsPolicy::from_list(&args.allowed_origins);
    info!(origins = ?cors.allowed_origins(), "CORS allow-list loaded");

    let state = AppState::new(limiter.clone(), store, cors);

    // spawn the background sweeper
    if args.sweep_interval > 0 {
        let every = Duration::from_secs(args.sweep_interval);
        let grace = Duration::from_secs(args.sweep_grace);
        tokio::spawn(sweeper(limiter, every, grace));
    }

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Gateway listening");
    info!(
        "Rate limit: {} events per {} seconds per client",
        args.rate_limit, args.rate_window
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
