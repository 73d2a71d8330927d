use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_api_rest::{AppState, router};
use clinic_core::config::{database_path_from_env_value, recent_appointments_limit_from_env_value};
use clinic_core::{ClinicService, CoreConfig};

/// Main entry point for the clinic application
///
/// Resolves configuration once, opens (and migrates) the SQLite database and serves the
/// HTML pages and JSON API on a single listener.
///
/// # Environment Variables
/// - `CLINIC_DATABASE_PATH`: SQLite database file (default: "clinic.db")
/// - `CLINIC_REST_ADDR`: HTTP listen address (default: "0.0.0.0:3000")
/// - `CLINIC_RECENT_APPOINTMENTS`: appointments shown on the index page (default: 10, max 100)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?)
                .add_directive("clinic_core=info".parse()?)
                .add_directive("clinic_api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_path = database_path_from_env_value(std::env::var("CLINIC_DATABASE_PATH").ok());
    let recent_limit =
        recent_appointments_limit_from_env_value(std::env::var("CLINIC_RECENT_APPOINTMENTS").ok())?;
    let cfg = Arc::new(CoreConfig::new(database_path, recent_limit)?);

    let rest_addr: SocketAddr = std::env::var("CLINIC_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let clinic = ClinicService::open(cfg.clone())?;
    tracing::info!("++ Using database {}", cfg.database_path().display());
    tracing::info!("++ Starting clinic HTTP on {}", rest_addr);

    let app = router(AppState::new(clinic));
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
