pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use std::time::Duration;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use store::{PgIdentityStore, PgSlotStore};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str, max_connections: u32, timeout: Duration) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(timeout)
        .connect(database_url)
        .await?;

    Ok(pool)
}
