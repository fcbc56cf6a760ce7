use std::env;
use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use once_cell::sync::Lazy;

pub static MONGODB_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
});

pub static MONGODB_DATABASE: Lazy<String> = Lazy::new(|| {
    env::var("MONGODB_DATABASE").unwrap_or_else(|_| "product_management".to_string())
});

/// Connect using environment defaults (`MONGODB_URL`, `MONGODB_DATABASE`).
pub async fn connect() -> anyhow::Result<Database> {
    let client = Client::with_uri_str(MONGODB_URL.as_str()).await?;
    Ok(client.database(MONGODB_DATABASE.as_str()))
}

/// Connect with an explicit configuration, applying the connect timeout.
pub async fn connect_with_config(cfg: &configs::DatabaseConfig) -> anyhow::Result<Database> {
    let mut opts = ClientOptions::parse(&cfg.url).await?;
    opts.connect_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    opts.server_selection_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    let client = Client::with_options(opts)?;
    Ok(client.database(&cfg.name))
}
