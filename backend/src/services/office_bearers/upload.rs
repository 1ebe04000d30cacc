use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::office_bearer::StoredOfficeBearer;
use common::model::validation::ValidationError;
use common::responses::{ErrorResponse, UploadResponse};
use futures_util::StreamExt;
use log::info;

use super::store::{self, CommitError};
use super::validate;
use crate::config::AppConfig;
use crate::db;

/// Hard cap on the uploaded spreadsheet, in bytes.
const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// The multipart field the spreadsheet must arrive under.
const FILE_FIELD: &str = "file";
const ALLOWED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

enum UploadError {
    /// The request itself is malformed (wrong field, wrong extension,
    /// oversized or empty file).
    BadRequest(String),
    /// The file parsed but its content was rejected, or it conflicts with
    /// stored emails.
    Validation(Vec<ValidationError>),
    /// The insert failed and the batch was rolled back.
    Creation(ValidationError),
    Server(String),
}

/// Actix handler for `POST /api/office_bearers/upload`.
///
/// Converts the outcome of `upload_batch` into the response contract:
/// `201` with the stored records, `400` with the full error report for
/// anything the uploader can fix, `500` for storage failures.
pub(crate) async fn process(config: web::Data<AppConfig>, payload: Multipart) -> impl Responder {
    match upload_batch(&config, payload).await {
        Ok(stored) => HttpResponse::Created().json(UploadResponse {
            success: true,
            message: format!("{} office bearer(s) created", stored.len()),
            count: stored.len(),
            data: stored,
        }),
        Err(UploadError::BadRequest(message)) => HttpResponse::BadRequest().json(ErrorResponse {
            success: false,
            error: "invalid_upload".to_string(),
            message,
            errors: None,
        }),
        Err(UploadError::Validation(errors)) => HttpResponse::BadRequest().json(ErrorResponse {
            success: false,
            error: "validation_failed".to_string(),
            message: format!("Upload rejected with {} error(s)", errors.len()),
            errors: Some(errors),
        }),
        Err(UploadError::Creation(error)) => {
            HttpResponse::InternalServerError().json(ErrorResponse {
                success: false,
                error: "creation_failed".to_string(),
                message: "The batch could not be stored and was rolled back".to_string(),
                errors: Some(vec![error]),
            })
        }
        Err(UploadError::Server(message)) => {
            HttpResponse::InternalServerError().json(ErrorResponse {
                success: false,
                error: "server_error".to_string(),
                message,
                errors: None,
            })
        }
    }
}

/// Reads the spreadsheet out of the multipart body, validates it and commits
/// the batch. One logical unit: any failure leaves the store untouched.
async fn upload_batch(
    config: &AppConfig,
    payload: Multipart,
) -> Result<Vec<StoredOfficeBearer>, UploadError> {
    let bytes = read_spreadsheet_field(payload).await?;
    let records = validate::validate(&bytes).map_err(UploadError::Validation)?;

    let mut conn = db::open(&config.database).map_err(|e| UploadError::Server(e.to_string()))?;
    let stored = store::commit(&mut conn, &records).map_err(|e| match e {
        CommitError::Duplicates(errors) => UploadError::Validation(errors),
        CommitError::Creation(error) => UploadError::Creation(error),
        CommitError::Db(e) => UploadError::Server(e.to_string()),
    })?;

    info!("stored {} office bearer(s) from one upload", stored.len());
    Ok(stored)
}

/// Streams the `file` multipart field into memory, enforcing the extension
/// whitelist and the size cap chunk by chunk. Other fields are ignored.
async fn read_spreadsheet_field(mut payload: Multipart) -> Result<Vec<u8>, UploadError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::BadRequest(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        check_extension(&filename).map_err(UploadError::BadRequest)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > MAX_FILE_BYTES {
                return Err(UploadError::BadRequest(format!(
                    "The file exceeds the {}MB limit",
                    MAX_FILE_BYTES / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(UploadError::BadRequest(
                "The uploaded file is empty".to_string(),
            ));
        }
        return Ok(bytes);
    }

    Err(UploadError::BadRequest(format!(
        "Missing '{}' field in the multipart form",
        FILE_FIELD
    )))
}

fn check_extension(filename: &str) -> Result<(), String> {
    let lower = filename.to_lowercase();
    if ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err("The file must end with .xlsx or .xls".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_accepts_xlsx_and_xls_case_insensitively() {
        assert!(check_extension("bearers.xlsx").is_ok());
        assert!(check_extension("bearers.xls").is_ok());
        assert!(check_extension("BEARERS.XLSX").is_ok());
    }

    #[test]
    fn extension_check_rejects_everything_else() {
        assert!(check_extension("bearers.csv").is_err());
        assert!(check_extension("bearers.xlsx.exe").is_err());
        assert!(check_extension("").is_err());
    }

    #[test]
    fn created_response_carries_count_and_data() {
        let body = UploadResponse {
            success: true,
            message: "1 office bearer(s) created".to_string(),
            count: 1,
            data: vec![StoredOfficeBearer {
                id: "id-1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                position: None,
                department: None,
                address: None,
                created_at: "2026-08-23 10:00:00".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["email"], "ada@example.com");
    }
}
