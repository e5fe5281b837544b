use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use metro_server::config::ServerConfig;
use metro_server::store::{TripStore, load_graph};
use metro_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("metro_server=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Fail fast if either data file is unusable
    let graph = load_graph(&config.graph_path).await?;
    let trips = TripStore::load(&config.trips_path).await?;

    let state = AppState::new(graph, trips, &config.cache);

    if config.trips_refresh.is_zero() {
        info!("trip refresh disabled");
    } else {
        let refresh_state = state.clone();
        let period = config.trips_refresh;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match refresh_state.trips.refresh().await {
                    Ok(count) => {
                        refresh_state.rankings.invalidate_all();
                        info!(trips = count, "refreshed trips");
                    }
                    Err(e) => error!(error = %e, "failed to refresh trips"),
                }
            }
        });
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "metro planner listening");
    axum::serve(listener, app).await?;

    Ok(())
}
