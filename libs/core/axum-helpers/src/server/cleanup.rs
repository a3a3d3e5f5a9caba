//! Resource release run after the listener stops.

use tracing::{error, info};

/// Close a SeaORM pool, logging the outcome under `name`.
///
/// ```ignore
/// create_production_app(app, &config.server, async move {
///     close_postgres(db, "catalog").await;
/// })
/// .await?;
/// ```
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!(pool = name, "PostgreSQL connection pool closed"),
        Err(e) => error!(pool = name, "Error closing PostgreSQL connection pool: {}", e),
    }
}
