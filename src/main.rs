use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taste_bot::{
    config::Config,
    db::JsonFileStore,
    routes::{create_router, AppState},
    services::TasteDiveProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taste_bot=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(JsonFileStore::new(config.preferences_file.clone()));
    let provider = Arc::new(TasteDiveProvider::new(
        config.tastedive_api_key.clone(),
        config.tastedive_api_url.clone(),
        config.recommendation_timeout(),
    )?);

    tracing::info!(
        preferences_file = %store.path().display(),
        timeout_secs = config.recommendation_timeout_secs,
        "Preference store and TasteDive provider configured"
    );

    let app = create_router(AppState::new(store, provider));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
