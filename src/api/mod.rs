pub mod actions;
pub mod console;
pub mod metrics;
pub mod processes;

pub use actions::{copy_to_clipboard, kill_process, open_path};
pub use console::{console_view, refresh_console, set_paused, set_refresh_interval};
pub use metrics::get_metrics;
pub use processes::{process_details, query_processes};

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::error::AppError;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            AppError::InvalidPid { .. } => StatusCode::BAD_REQUEST,
            AppError::OsError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/processes/query", web::post().to(query_processes))
        .route("/api/processes/{pid}", web::get().to(process_details))
        .route("/api/processes/{pid}/kill", web::post().to(kill_process))
        .route("/api/processes/{pid}/open", web::post().to(open_path))
        .route("/api/clipboard", web::post().to(copy_to_clipboard))
        .route("/api/settings/refresh-interval", web::put().to(set_refresh_interval))
        .route("/api/settings/paused", web::put().to(set_paused))
        .route("/api/console", web::get().to(console_view))
        .route("/api/console/refresh", web::post().to(refresh_console))
        .route("/metrics", web::get().to(get_metrics))
        .route("/health", web::get().to(health));
}
