use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::connection::init_db;
use crate::interfaces::http::start_server;

pub async fn run() -> Result<()> {
    let config = AppConfig::load()?;

    let pool = init_db(std::path::Path::new(&config.database.path)).await?;
    tracing::info!(path = %config.database.path, "database ready");

    let server =
        start_server(&config, pool).map_err(|e| AppError::IoError(e.to_string()))?;
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "listening"
    );

    server.await.map_err(|e| AppError::IoError(e.to_string()))
}
