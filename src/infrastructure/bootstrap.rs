use actix_web::web;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

use crate::application::{AdminAuthUseCase, UploadIntakeUseCase};
use crate::domain::error::{AppError, Result};
use crate::domain::upload::UploadStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::password::{hash_password, parse_hash};
use crate::infrastructure::security::session::SessionStore;
use crate::infrastructure::storage::{ensure_dir, LocalDirStore};
use crate::interfaces::http::{add_log, HttpState, LogEntry};

/// Prepares directories and credentials and assembles the shared HTTP state.
pub fn build_state(config: AppConfig) -> Result<HttpState> {
    let upload_dir = ensure_dir(&config.upload_dir).map_err(|err| {
        error!(
            error = %err,
            upload_dir = %config.upload_dir.display(),
            "Failed to create upload dir"
        );
        err
    })?;

    let image_dir = ensure_dir(&config.image_dir).map_err(|err| {
        error!(
            error = %err,
            image_dir = %config.image_dir.display(),
            "Failed to create image dir"
        );
        err
    })?;

    let password_hash = admin_password_hash(&config)?;
    if config.uses_default_password() {
        warn!(
            username = %config.admin.username,
            "Admin account uses the default password, set ARIMA_INTAKE_ADMIN__PASSWORD"
        );
    }

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    let uploads: Arc<dyn UploadStore> = Arc::new(LocalDirStore::new(upload_dir));
    let images: Arc<dyn UploadStore> = Arc::new(LocalDirStore::new(image_dir));

    let intake = UploadIntakeUseCase::new(
        uploads,
        config.allowed_extensions.clone(),
        config.max_upload_bytes,
    );
    let auth = AdminAuthUseCase::new(config.admin.username.clone(), password_hash);
    let sessions = SessionStore::new(config.session_ttl_minutes)?;

    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Upload intake ready (upload_dir={} allowed={})",
            config.upload_dir.display(),
            config.accept_filter()
        ),
    );

    Ok(HttpState {
        config,
        intake,
        auth,
        sessions,
        images,
        logs,
    })
}

pub fn build_data(config: AppConfig) -> Result<web::Data<HttpState>> {
    build_state(config).map(web::Data::new)
}

fn admin_password_hash(config: &AppConfig) -> Result<String> {
    match (&config.admin.password_hash, &config.admin.password) {
        (Some(hash), _) => {
            parse_hash(hash)
                .map_err(|e| AppError::ConfigError(format!("admin.password_hash: {}", e)))?;
            Ok(hash.clone())
        }
        (None, Some(password)) => Ok(hash_password(password)),
        (None, None) => Err(AppError::ConfigError(
            "admin.password or admin.password_hash must be set".to_string(),
        )),
    }
}
