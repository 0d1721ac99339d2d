use music_battle_core::archiver::HistoryArchiver;
use music_battle_core::config::Config;
use music_battle_core::registry::MatchRegistry;
use music_battle_core::router::catalog::CatalogClient;
use music_battle_core::router::{self, AppState};
use music_battle_core::storage::MatchStorage;
use music_battle_core::{logger, Result};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger();

    let config = Config::from_env();
    tracing::info!(bind_addr = %config.bind_addr, "starting music_battle_core");

    let storage = MatchStorage::open(&config.storage_path)?;
    let archiver = HistoryArchiver::connect(&config.database_url).await?;
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let catalog = CatalogClient::new(config.song_catalog_base_url.clone());
    let registry = MatchRegistry::new(storage, archiver);
    let state = AppState::new(registry, db, catalog);

    let app = router::build(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.map_err(|err| {
        music_battle_core::Error::Validation(format!("failed to bind {}: {err}", config.bind_addr))
    })?;

    tracing::info!("listening");
    axum::serve(listener, app).await.map_err(|err| {
        music_battle_core::Error::Validation(format!("server error: {err}"))
    })?;

    Ok(())
}
