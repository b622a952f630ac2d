pub mod multipart;
pub mod pages;

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Server;
use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, App, HttpMessage, HttpRequest, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use validator::Validate;

use crate::application::use_cases::filename::{extension_of, secure_filename};
use crate::application::{AdminAuthUseCase, UploadIntakeUseCase};
use crate::domain::admin::{AdminSession, LoginFailure};
use crate::domain::error::AppError;
use crate::domain::upload::UploadStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::session::{SessionStore, SESSION_COOKIE};

pub const LOGIN_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/admin/index";
pub const UPLOAD_PATH: &str = "/admin/Arima";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub config: AppConfig,
    pub intake: UploadIntakeUseCase,
    pub auth: AdminAuthUseCase,
    pub sessions: SessionStore,
    pub images: Arc<dyn UploadStore>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn current_admin(req: &HttpRequest, data: &HttpState) -> Option<AdminSession> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    data.sessions.resolve(cookie.value())
}

fn upload_form_page(data: &HttpState, message: Option<&str>) -> String {
    pages::upload_form(
        data.config.stylesheet_url(),
        &data.config.accept_filter(),
        message,
    )
}

#[get("/")]
async fn login_form(req: HttpRequest, data: web::Data<HttpState>) -> impl Responder {
    if current_admin(&req, &data).is_some() {
        return redirect(DASHBOARD_PATH);
    }
    html(
        StatusCode::OK,
        pages::login_page(data.config.stylesheet_url(), None),
    )
}

#[post("/")]
async fn login_submit(data: web::Data<HttpState>, form: web::Form<LoginForm>) -> impl Responder {
    let form = form.into_inner();
    let outcome = match form.validate() {
        Ok(()) => data.auth.execute(&form.username, &form.password),
        Err(_) if form.username.trim().is_empty() || form.password.is_empty() => {
            Err(LoginFailure::MissingFields)
        }
        Err(_) => Err(LoginFailure::TooLong),
    };

    match outcome {
        Ok(username) => {
            let session = match data.sessions.create(&username) {
                Ok(session) => session,
                Err(err) => {
                    add_log(
                        &data.logs,
                        "ERROR",
                        "Auth",
                        &format!("Failed to open session: {}", err),
                    );
                    return HttpResponse::InternalServerError().finish();
                }
            };
            add_log(
                &data.logs,
                "INFO",
                "Auth",
                &format!("Admin logged in (username={})", username),
            );
            HttpResponse::Found()
                .insert_header((LOCATION, DASHBOARD_PATH))
                .cookie(session_cookie(&session.token))
                .finish()
        }
        Err(failure) => {
            add_log(
                &data.logs,
                "WARN",
                "Auth",
                &format!(
                    "Login refused (username={:?} reason={:?})",
                    form.username, failure
                ),
            );
            let status = match failure {
                LoginFailure::MissingFields | LoginFailure::TooLong => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            };
            html(
                status,
                pages::login_page(data.config.stylesheet_url(), Some(failure.message())),
            )
        }
    }
}

#[get("/admin/index")]
async fn dashboard(req: HttpRequest, data: web::Data<HttpState>) -> impl Responder {
    let Some(session) = current_admin(&req, &data) else {
        return redirect(LOGIN_PATH);
    };
    html(
        StatusCode::OK,
        pages::dashboard_page(data.config.stylesheet_url(), &session.username, UPLOAD_PATH),
    )
}

#[get("/admin/Arima")]
async fn upload_form(req: HttpRequest, data: web::Data<HttpState>) -> impl Responder {
    if current_admin(&req, &data).is_none() {
        return redirect(LOGIN_PATH);
    }
    html(StatusCode::OK, upload_form_page(&data, None))
}

#[post("/admin/Arima")]
async fn upload_submit(
    req: HttpRequest,
    data: web::Data<HttpState>,
    payload: web::Payload,
) -> impl Responder {
    if current_admin(&req, &data).is_none() {
        return redirect(LOGIN_PATH);
    }

    // Browsers only send multipart here; anything else carries no file part.
    if !req.content_type().eq_ignore_ascii_case("multipart/form-data") {
        add_log(
            &data.logs,
            "INFO",
            "Intake",
            &format!(
                "Upload without multipart body (content_type={:?})",
                req.content_type()
            ),
        );
        return redirect(req.path());
    }

    let body = Multipart::new(req.headers(), payload);
    let result = match multipart::read_file_part(
        body,
        data.intake.allowed_extensions(),
        data.intake.max_upload_bytes(),
    )
    .await
    {
        Ok(Some(request)) => data.intake.execute(request).await,
        Ok(None) => Err(AppError::MissingFile),
        Err(err) => Err(err),
    };

    match result {
        Ok(stored) => {
            add_log(
                &data.logs,
                "INFO",
                "Intake",
                &format!(
                    "Upload stored (original={} stored={} bytes={} sha256={})",
                    stored.original_filename, stored.stored_filename, stored.size_bytes, stored.sha256
                ),
            );
            html(
                StatusCode::OK,
                pages::receipt_page(data.config.stylesheet_url(), &stored, UPLOAD_PATH),
            )
        }
        Err(AppError::MissingFile) => {
            add_log(&data.logs, "INFO", "Intake", "Upload without a file, redirecting");
            redirect(req.path())
        }
        Err(AppError::UnsupportedFileType(name)) => {
            add_log(
                &data.logs,
                "WARN",
                "Intake",
                &format!("Upload rejected, extension not allowed (filename={})", name),
            );
            let message = format!(
                "Tipe file tidak didukung: {}. Hanya {} yang diterima.",
                name,
                data.config.accept_filter()
            );
            html(StatusCode::BAD_REQUEST, upload_form_page(&data, Some(&message)))
        }
        Err(AppError::PayloadTooLarge(limit)) => {
            add_log(
                &data.logs,
                "WARN",
                "Intake",
                &format!("Upload rejected, larger than {} bytes", limit),
            );
            let message = format!("Ukuran file melebihi batas {} byte.", limit);
            html(
                StatusCode::PAYLOAD_TOO_LARGE,
                upload_form_page(&data, Some(&message)),
            )
        }
        Err(AppError::ValidationError(msg)) => {
            add_log(&data.logs, "WARN", "Intake", &msg);
            html(StatusCode::BAD_REQUEST, upload_form_page(&data, Some(&msg)))
        }
        Err(err) => {
            add_log(
                &data.logs,
                "ERROR",
                "Intake",
                &format!("Upload failed: {}", err),
            );
            HttpResponse::InternalServerError().body("Terjadi kesalahan saat menyimpan file")
        }
    }
}

fn image_content_type(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[get("/images/{filename}")]
async fn serve_image(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let filename = path.into_inner();
    if secure_filename(&filename) != filename {
        return HttpResponse::NotFound().finish();
    }

    match data.images.read(&filename).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(image_content_type(&filename))
            .body(bytes),
        Err(AppError::NotFound(_)) | Err(AppError::ValidationError(_)) => {
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            add_log(
                &data.logs,
                "ERROR",
                "Images",
                &format!("Failed to read image {}: {}", filename, err),
            );
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/logout")]
async fn logout(req: HttpRequest, data: web::Data<HttpState>) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if data.sessions.revoke(cookie.value()) {
            add_log(&data.logs, "INFO", "Auth", "Admin logged out");
        }
    }

    let mut removal = session_cookie("");
    removal.make_removal();
    HttpResponse::Found()
        .insert_header((LOCATION, LOGIN_PATH))
        .cookie(removal)
        .finish()
}

/// Activity log for the signed-in admin. Served same-origin only.
#[get("/logs")]
async fn get_logs(req: HttpRequest, data: web::Data<HttpState>) -> impl Responder {
    if current_admin(&req, &data).is_none() {
        return HttpResponse::Unauthorized().finish();
    }
    let logs = data.logs.lock().unwrap_or_else(PoisonError::into_inner);
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

/// Records an activity entry and mirrors it to `tracing` at the same level.
pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source = %source, "{}", message),
        "WARN" => tracing::warn!(source = %source, "{}", message),
        _ => tracing::info!(source = %source, "{}", message),
    }
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login_submit)
        .service(dashboard)
        .service(upload_form)
        .service(upload_submit)
        .service(serve_image)
        .service(logout)
        .service(
            web::scope("/api")
                .wrap(Cors::default())
                .service(get_logs),
        );
}

pub fn start_server(state: web::Data<HttpState>) -> std::io::Result<Server> {
    let host = state.config.host.clone();
    let port = state.config.port;

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host.as_str(), port))?
        .run();

    Ok(server)
}
