//! Office bearer import endpoints.
//!
//! One spreadsheet upload is one atomic batch: the file is validated in full
//! (structure, required columns, per-row fields, email format), checked for
//! duplicate emails within itself and against the store, and then inserted in
//! a single transaction. Any failure at any stage rejects the whole batch and
//! returns the complete error report.
//!
//! The provided routes are:
//! - `POST /api/office_bearers/upload`: multipart upload of one `.xlsx`/`.xls`
//!   file (≤10MB) under the `file` field. Returns `201` with the stored
//!   records, or `400`/`500` with a structured list of `ValidationError`s.
//!
//! - `GET /api/office_bearers`: all stored office bearers, ordered by
//!   creation time descending.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod list;
mod store;
mod upload;
mod validate;

const API_PATH: &str = "/api/office_bearers";

/// Configures and returns the Actix scope for office bearer routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Route to upload and import a spreadsheet batch.
        .route("/upload", post().to(upload::process))
        // Route to list every stored office bearer.
        .route("", get().to(list::process))
}
