use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use crate::config::AppConfig;

pub fn connect_options(config: &AppConfig) -> anyhow::Result<PgConnectOptions> {
    let options =
        PgConnectOptions::from_str(&config.database_url).context("parse DATABASE_URL")?;
    // Require encrypts without verifying the server certificate.
    if config.requires_tls() {
        return Ok(options.ssl_mode(PgSslMode::Require));
    }
    Ok(options)
}

/// Builds the pool without opening a connection. An unreachable database
/// surfaces per request (and in the schema check) instead of aborting startup.
pub fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let options = connect_options(config)?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(options);
    info!(
        max_connections = config.max_connections,
        tls = config.requires_tls(),
        "database pool configured"
    );
    Ok(pool)
}
