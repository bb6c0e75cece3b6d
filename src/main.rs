use anyhow::Context;
use tracing_subscriber::EnvFilter;

use todo_items_api::auth::TokenHandler;
use todo_items_api::config::Settings;
use todo_items_api::database::{Connector, PgUnitOfWork};
use todo_items_api::handlers::{self, AppState};
use todo_items_api::services::ItemService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_* and JWT_* settings.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // No external vault client is wired in; selecting the vault credential
    // source fails loudly here.
    let settings = Settings::load(None).context("loading configuration")?;

    let connector = Connector::new(&settings.database)?;
    let uow = PgUnitOfWork::new(connector, settings.database.table_name.clone());
    let state = AppState {
        service: ItemService::new(uow),
        tokens: TokenHandler::new(&settings.jwt)?,
    };

    let app = handlers::router(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo Items API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
