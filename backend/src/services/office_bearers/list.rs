use actix_web::{web, Responder};
use common::model::office_bearer::StoredOfficeBearer;
use common::responses::{ErrorResponse, ListResponse};

use super::store;
use crate::config::AppConfig;
use crate::db;

/// Actix handler for `GET /api/office_bearers`: every stored record, newest
/// first, with no filtering or paging.
pub(crate) async fn process(config: web::Data<AppConfig>) -> impl Responder {
    match list_office_bearers(&config).await {
        Ok(data) => actix_web::HttpResponse::Ok().json(ListResponse {
            success: true,
            count: data.len(),
            data,
        }),
        Err(e) => actix_web::HttpResponse::InternalServerError().json(ErrorResponse {
            success: false,
            error: "server_error".to_string(),
            message: e,
            errors: None,
        }),
    }
}

async fn list_office_bearers(config: &AppConfig) -> Result<Vec<StoredOfficeBearer>, String> {
    let conn = db::open(&config.database).map_err(|e| e.to_string())?;
    store::find_all(&conn).map_err(|e| e.to_string())
}
