use std::sync::Arc;

use campus_club_hub_backend::error::AppError;
use campus_club_hub_backend::{migrate, run_server, seed, AppState};
use campus_club_hub_config::get_config;
use campus_club_hub_database::Store;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = get_config()?;

    let store = Store::open(&config.database_path).await?;
    migrate::backfill_event_ids(&store).await?;
    seed::initialize_sample_data(&store).await?;

    let state = Arc::new(AppState::new(store, &config));
    let (_local_addr, server) = run_server(&config.listen_addr, state).await?;
    server.await
}
