use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::KillMode;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct KillRequest {
    pub mode: KillMode,
}

#[derive(Deserialize)]
pub struct ClipboardRequest {
    pub text: String,
}

fn accepted() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "success" }))
}

/// Runs an action on the blocking pool; signalling may wait on a sampling pass.
async fn run_blocking<F>(action: F) -> Result<HttpResponse, AppError>
where
    F: FnOnce() -> Result<(), AppError> + Send + 'static,
{
    web::block(action).await.map_err(AppError::os)??;
    Ok(accepted())
}

pub async fn kill_process(
    data: web::Data<AppState>,
    path: web::Path<u32>,
    req: web::Json<KillRequest>,
) -> Result<HttpResponse, AppError> {
    let state = data.get_ref().clone();
    let (pid, mode) = (path.into_inner(), req.mode);
    run_blocking(move || state.gateway.kill_process(pid, mode)).await
}

pub async fn open_path(
    data: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, AppError> {
    let state = data.get_ref().clone();
    let pid = path.into_inner();
    run_blocking(move || state.gateway.open_path(pid)).await
}

pub async fn copy_to_clipboard(
    data: web::Data<AppState>,
    req: web::Json<ClipboardRequest>,
) -> Result<HttpResponse, AppError> {
    let state = data.get_ref().clone();
    let text = req.into_inner().text;
    run_blocking(move || state.gateway.copy_to_clipboard(&text)).await
}
