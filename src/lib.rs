//! # SmartCity User Service
//!
//! User-management backend: CRUD, activation lifecycle, role assignment and
//! organization lookups behind a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: models, data-access contracts and error types
//! - **application**: the user service (business rules) and transport DTOs
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **api**: REST API with Swagger documentation
//! - **auth**: bcrypt hashing, JWT issue/verify and the request middleware
//! - **config**: TOML application configuration

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use api::create_api_router;
