use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;
use service::{
    inventory::HttpInventory,
    notify::NotificationLog,
    runtime,
    storage::{JsonFileStorage, PersistenceSlot},
    CartStore,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire the session cart from configuration: file storage, HTTP inventory
/// and the notification log.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    runtime::ensure_data_dir(&cfg.storage.path).await?;
    let storage = JsonFileStorage::new(&cfg.storage.path).await?;
    let slot = PersistenceSlot::new(storage, cfg.storage.cart_key.clone());

    let inventory = Arc::new(HttpInventory::new(
        cfg.inventory.base_url.clone(),
        cfg.inventory.request_timeout(),
    )?);
    let notifications = Arc::new(NotificationLog::default());
    let cart = Arc::new(CartStore::open(inventory, Arc::clone(&notifications), slot).await);

    Ok(ServerState { cart, notifications })
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    info!(
        inventory = %cfg.inventory.base_url,
        storage = %cfg.storage.path,
        items = state.cart.cart().len(),
        "session cart ready"
    );

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting storefront cart server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
