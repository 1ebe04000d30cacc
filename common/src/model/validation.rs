//! Structured error reports produced while validating an uploaded batch.
//!
//! Every rejection the uploader can fix themselves (a missing column, a blank
//! cell, a malformed or duplicated email) is reported as a `ValidationError`
//! with enough context to pinpoint the offending cell. The backend collects
//! these into a list and returns the whole list at once, so the user can fix
//! their spreadsheet in a single pass instead of re-uploading per error.

use serde::{Deserialize, Serialize};

/// The tag identifying what went wrong. Serialized in snake_case as the
/// `type` field of each error object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    ParsingError,
    EmptyFile,
    MissingColumn,
    EmptyField,
    InvalidFormat,
    DuplicateEmailsInFile,
    DuplicateEmailsInDatabase,
    CreationFailed,
}

/// One entry in the error report for a rejected upload.
///
/// The context fields are populated per kind and omitted from the JSON when
/// absent: `column` for missing columns, `row`/`field` for empty cells,
/// `row`/`value` for malformed emails, `row`/`email` for duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

impl ValidationError {
    fn bare(kind: ValidationErrorKind, message: String) -> Self {
        ValidationError {
            kind,
            message,
            column: None,
            field: None,
            row: None,
            value: None,
            email: None,
        }
    }

    pub fn parsing(detail: &str) -> Self {
        Self::bare(
            ValidationErrorKind::ParsingError,
            format!("Could not read the file as a spreadsheet: {}", detail),
        )
    }

    pub fn empty_file() -> Self {
        Self::bare(
            ValidationErrorKind::EmptyFile,
            "The uploaded file contains no data rows".to_string(),
        )
    }

    pub fn missing_column(column: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::MissingColumn,
            format!("Required column '{}' was not found", column),
        );
        e.column = Some(column.to_string());
        e
    }

    pub fn empty_field(row: usize, field: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::EmptyField,
            format!("Row {}: required field '{}' is empty", row, field),
        );
        e.row = Some(row);
        e.field = Some(field.to_string());
        e
    }

    pub fn invalid_format(row: usize, value: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::InvalidFormat,
            format!("Row {}: '{}' is not a valid email address", row, value),
        );
        e.row = Some(row);
        e.value = Some(value.to_string());
        e
    }

    pub fn duplicate_in_file(row: usize, email: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::DuplicateEmailsInFile,
            format!("Row {}: email '{}' appears earlier in the file", row, email),
        );
        e.row = Some(row);
        e.email = Some(email.to_string());
        e
    }

    pub fn duplicate_in_database(row: usize, email: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::DuplicateEmailsInDatabase,
            format!("Row {}: email '{}' already exists", row, email),
        );
        e.row = Some(row);
        e.email = Some(email.to_string());
        e
    }

    pub fn creation_failed(email: &str, detail: &str) -> Self {
        let mut e = Self::bare(
            ValidationErrorKind::CreationFailed,
            format!("Could not create the record for '{}': {}", email, detail),
        );
        e.email = Some(email.to_string());
        e
    }
}
