//! Book catalog server. Reads settings from the environment (and `.env`).

use book_catalog::{
    apply_migrations, build_router, ensure_database_exists, AppState, MemoryStore, PgStore, Settings,
    StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("book_catalog=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "settings loaded");

    let state = match settings.store {
        StoreKind::Postgres => {
            let options = settings.database.connect_options();
            ensure_database_exists(&options).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .connect_with(options)
                .await?;
            apply_migrations(&pool).await?;
            AppState::new(Arc::new(PgStore::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            AppState::new(Arc::new(MemoryStore::new()))
        }
    };

    let app = build_router(state, settings.server.body_limit);
    let listener = TcpListener::bind(settings.server.addr()?).await?;
    tracing::info!("Book catalog listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
