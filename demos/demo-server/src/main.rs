use allo_controller::prelude::*;
use allo_controller::ConfigService;
use axum::routing::get;
use tower_http::trace::TraceLayer;

mod controllers;

use controllers::{Catalog, HomepageController, ProductController};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting demo server...");

    let mut manager = ControllerManager::new();
    manager
        .register::<HomepageController>()?
        .register::<ProductController>()?
        .add_dependency("catalog", Catalog::sample())?;

    let router = RouterList::new(Arc::new(manager))
        .add("/health", get(|| async { "OK" }))
        .add_controller("/", "Homepage:default")?
        .add_controller("/product/show/{id}", "Product:show")?
        .add_controller("/{action}", "Homepage:default")?
        .add_controller("/{controller}/{action}", "Homepage:default")?
        .into_router()
        .layer(TraceLayer::new_for_http());

    let config = ConfigService::new();
    let host = config.get_or("HOST", "0.0.0.0");
    let port = config.get_or("PORT", "3000");
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server running on http://127.0.0.1:{}", port);
    tracing::info!("Try /, /about, /menu, /product/list or /product/show/1");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
