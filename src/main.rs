use color_eyre::eyre::Result;
use dotenv::dotenv;
use parkspot_api::config::ApiConfig;
use parkspot_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    parkspot_api::init_tracing(&config)?;

    // An unreachable store at startup is fatal
    let db_pool = create_pool(
        &config.database_url,
        config.database_max_connections,
        config.store_timeout(),
    )
    .await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    parkspot_api::start_server(config, db_pool).await?;

    Ok(())
}
