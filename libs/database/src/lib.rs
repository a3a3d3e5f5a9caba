//! PostgreSQL connection management for the catalog services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connector, migrations and health checks
//! - `config` - load [`postgres::PostgresConfig`] and [`common::RetryConfig`] via `core_config::FromEnv`
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "products_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
