//!
//! SmartCity user-management REST service.
//! Reads configuration from TOML file (~/.config/smartcity-user-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use smartcity_users::application::dto::UserDto;
use smartcity_users::application::services::UserService;
use smartcity_users::auth::{hash_password, JwtConfig};
use smartcity_users::domain::RepositoryProvider;
use smartcity_users::infrastructure::database::migrator::Migrator;
use smartcity_users::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("USER_SERVICE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting SmartCity User Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "smartcity-users".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // Initialize repository provider and the user service
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let service = Arc::new(UserService::new(repos.clone()));

    // Create default admin user if no users exist
    create_default_admin(&service, &repos, &app_cfg).await;

    // Create REST API router
    let api_router = create_api_router(service, jwt_config, prometheus_handle);

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            } else {
                info!("🛑 Shutdown signal received");
            }
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 SmartCity User Service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(
    service: &UserService,
    repos: &Arc<dyn RepositoryProvider>,
    app_cfg: &AppConfig,
) {
    let existing = match service.find_all(1).await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to check for existing users: {}", e);
            return;
        }
    };

    if !existing.is_empty() {
        return;
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = UserDto {
        name: app_cfg.admin.name.clone(),
        surname: app_cfg.admin.surname.clone(),
        email: app_cfg.admin.email.clone(),
        password: Some(password_hash),
        ..Default::default()
    };

    let created = match service.create(admin).await {
        Ok(dto) => dto,
        Err(e) => {
            error!("Failed to create admin user: {}", e);
            return;
        }
    };

    // Grant the seeded ADMIN role
    let admin_role_ids: Vec<i64> = match repos.roles().find_all().await {
        Ok(roles) => roles
            .into_iter()
            .filter(|r| r.name == "ADMIN")
            .map(|r| r.id)
            .collect(),
        Err(e) => {
            error!("Failed to list roles: {}", e);
            return;
        }
    };

    if let Some(id) = created.id {
        if let Err(e) = service.set_roles(id, &admin_role_ids).await {
            error!("Failed to grant admin role: {}", e);
            return;
        }
    }

    info!("Default admin created: {}", app_cfg.admin.email);
    info!("⚠️  Please change the admin password immediately!");
}
