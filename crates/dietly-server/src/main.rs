//! Dietly Server — application entry point.

use dietly_core::error::DietlyError;
use dietly_core::models::user::{CreateUser, UserRole};
use dietly_core::repository::UserRepository;
use dietly_db::DbManager;
use dietly_server::config::{BootstrapAdmin, ServerConfig};
use dietly_server::{AppState, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dietly=info".parse().unwrap()))
        .json()
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing::info!("Starting Dietly server...");

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    let db = manager.client().clone();
    dietly_db::run_migrations(&db).await?;

    let state = AppState::new(db, config.auth.clone());
    bootstrap_admin(&state, config.bootstrap_admin.as_ref()).await?;

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Dietly API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the configured SuperAdmin account if it does not exist yet.
/// Idempotent across restarts.
async fn bootstrap_admin(state: &AppState, admin: Option<&BootstrapAdmin>) -> anyhow::Result<()> {
    let Some(admin) = admin else {
        return Ok(());
    };

    match state.users.get_by_username(&admin.username).await {
        Ok(_) => Ok(()),
        Err(DietlyError::NotFound { .. }) => {
            state
                .users
                .create(CreateUser {
                    name: admin.name.clone(),
                    email: admin.email.clone(),
                    username: admin.username.clone(),
                    password: admin.password.clone(),
                    role: UserRole::SuperAdmin,
                    tenant_id: None,
                })
                .await?;
            tracing::info!(username = %admin.username, "Bootstrapped SuperAdmin account");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
