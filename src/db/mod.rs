use sea_orm::{ ConnectOptions, Database, DatabaseConnection };
use std::time::Duration;

use crate::error::Result;

pub mod entity;
pub use entity::*;

/// Open the pooled connection shared by every service.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(20)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Ok(db)
}
