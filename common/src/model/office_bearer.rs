use serde::{Deserialize, Serialize};

/// A validated spreadsheet row, ready to be persisted.
///
/// `row` is the 1-based row number shown to the uploader (the header line is
/// row 1, so the first data row is row 2). It is carried along so that
/// duplicate-email errors discovered after validation can still point at the
/// offending line in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeBearerRecord {
    pub row: usize,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub address: Option<String>,
}

/// An office bearer as it exists in the database, returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredOfficeBearer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}
