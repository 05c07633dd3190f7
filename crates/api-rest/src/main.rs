//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the Eazydoc REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP surface (with OpenAPI/Swagger UI). The
//! workspace's main `eazydoc-run` binary serves the same router after loading `.env`; demo
//! data is seeded separately with `eazydoc seed`.

use api_rest::{router, AppState, RestConfig};
use eazydoc_core::Database;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("eazydoc_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RestConfig::from_env()?;
    let db = Arc::new(Database::open(&cfg.core)?);

    match cfg.core.data_dir() {
        Some(dir) => tracing::info!("++ Persisting to {}", dir.display()),
        None => tracing::info!("++ Running with an in-memory store"),
    }
    tracing::info!("++ Starting Eazydoc REST on {}", cfg.addr);

    let app = router(AppState::new(
        cfg.core.clone(),
        db,
        cfg.expose_internal_errors,
    ));

    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
