//! Menu Bar Timer - independent countdown and count-up timers
//! 
//! This is the main entry point for the menubar-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use menubar_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{change_watcher_task, refresh_ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("menubar_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting menubar-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, refresh={}ms",
          config.host, config.port, config.refresh_ms);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone()));

    // Start the change watcher before any timer exists so it sees every one
    let watcher_state = Arc::clone(&state);
    tokio::spawn(async move {
        change_watcher_task(watcher_state).await;
    });

    for kind in config.initial_kinds() {
        if state.create_timer(kind, None).is_none() {
            warn!("Generated timer id collided, skipping a {} timer", kind.name());
        }
    }

    // Start the refresh ticker background task
    let ticker_state = Arc::clone(&state);
    let period = config.refresh_interval();
    tokio::spawn(async move {
        refresh_ticker_task(ticker_state, period).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers            - List timers");
    info!("  POST   /timers            - Create a timer");
    info!("  GET    /timers/:id        - Show a timer");
    info!("  DELETE /timers/:id        - Remove a timer");
    info!("  POST   /timers/:id/start  - Start or resume");
    info!("  POST   /timers/:id/pause  - Pause");
    info!("  POST   /timers/:id/stop   - Complete now");
    info!("  POST   /timers/:id/toggle - Pause or start");
    info!("  GET    /status            - Server status");
    info!("  GET    /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
