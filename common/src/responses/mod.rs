//! JSON envelopes shared between the backend handlers and API clients.

use serde::{Deserialize, Serialize};

use crate::model::office_bearer::StoredOfficeBearer;
use crate::model::validation::ValidationError;

/// Body of a successful `POST /api/office_bearers/upload` (201).
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub data: Vec<StoredOfficeBearer>,
}

/// Body of a successful `GET /api/office_bearers` (200).
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<StoredOfficeBearer>,
}

/// Body of every non-2xx response. `errors` is present only when there is a
/// per-cell report to show (validation and duplicate failures).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub errors: Option<Vec<ValidationError>>,
}
