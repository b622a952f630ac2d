use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap::build_data;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, start_server, UPLOAD_PATH};

pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let state = build_data(config)?;
    let (host, port) = (state.config.host.clone(), state.config.port);

    info!(
        host = %host,
        port,
        upload_dir = %state.config.upload_dir.display(),
        "Starting upload intake server"
    );
    add_log(
        &state.logs,
        "INFO",
        "Server",
        &format!("Upload form at http://{}:{}{}", host, port, UPLOAD_PATH),
    );

    start_server(state)?.await?;

    info!("Upload intake server stopped");
    Ok(())
}
