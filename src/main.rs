use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, RestConfig, router};
use eazydoc_core::Database;

/// Main entry point for the Eazydoc application
///
/// Loads `.env`, resolves configuration once, opens the record store and serves the REST
/// API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `EAZYDOC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `EAZYDOC_DATA_DIR`: Directory for the persisted store (default: "eazydoc_data")
/// - `EAZYDOC_IN_MEMORY`: Keep all records in memory only
/// - `EAZYDOC_EXPOSE_INTERNAL_ERRORS`: Include error detail in 500 responses (default: true)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, store or server startup fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eazydoc_run=info".parse()?)
                .add_directive("eazydoc_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RestConfig::from_env()?;
    let db = Arc::new(Database::open(&cfg.core)?);

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
