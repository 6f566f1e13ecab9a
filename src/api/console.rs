use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::PoisonError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RefreshIntervalRequest {
    pub ms: u64,
}

#[derive(Deserialize)]
pub struct PausedRequest {
    pub paused: bool,
}

pub async fn console_view(data: web::Data<AppState>) -> HttpResponse {
    let console = data.console.lock().unwrap_or_else(PoisonError::into_inner);
    HttpResponse::Ok().json(console.view())
}

pub async fn refresh_console(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let count = data
        .console
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .refresh()?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "processes": count })))
}

pub async fn set_refresh_interval(
    data: web::Data<AppState>,
    req: web::Json<RefreshIntervalRequest>,
) -> Result<HttpResponse, AppError> {
    data.console
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set_refresh_interval(req.ms)?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_paused(
    data: web::Data<AppState>,
    req: web::Json<PausedRequest>,
) -> Result<HttpResponse, AppError> {
    data.console
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set_paused(req.paused)?;
    Ok(HttpResponse::NoContent().finish())
}
