use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{ProcessFilter, SortSpec};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct QueryRequest {
    #[serde(default)]
    pub filter: Option<ProcessFilter>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

pub async fn query_processes(
    data: web::Data<AppState>,
    req: web::Json<QueryRequest>,
) -> Result<HttpResponse, AppError> {
    let records = data.source.list(req.filter.as_ref(), req.sort.as_ref())?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn process_details(
    data: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, AppError> {
    let details = data.source.details(path.into_inner())?;
    Ok(HttpResponse::Ok().json(details))
}
