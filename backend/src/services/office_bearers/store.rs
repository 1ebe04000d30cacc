//! Persistence for validated office bearer batches.
//!
//! A batch is one unit of work: both duplicate scans must pass and every
//! insert must succeed inside a single transaction, otherwise nothing is
//! stored. The unique index on `lower(email)` backs up the pre-insert scan
//! when two uploads race on the same address.

use std::collections::HashSet;

use common::model::office_bearer::{OfficeBearerRecord, StoredOfficeBearer};
use common::model::validation::ValidationError;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

/// Why a batch failed to commit.
#[derive(Debug)]
pub enum CommitError {
    /// Duplicate emails, within the file or against stored records; one
    /// entry per conflicting input record.
    Duplicates(Vec<ValidationError>),
    /// An insert failed and the transaction was rolled back.
    Creation(ValidationError),
    Db(rusqlite::Error),
}

impl From<rusqlite::Error> for CommitError {
    fn from(e: rusqlite::Error) -> Self {
        CommitError::Db(e)
    }
}

/// Persists a validated batch all-or-nothing.
pub fn commit(
    conn: &mut Connection,
    records: &[OfficeBearerRecord],
) -> Result<Vec<StoredOfficeBearer>, CommitError> {
    // In-file scan: every repeat occurrence is flagged, the first one is not.
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = Vec::new();
    for record in records {
        if !seen.insert(record.email.to_lowercase()) {
            duplicates.push(ValidationError::duplicate_in_file(record.row, &record.email));
        }
    }
    if !duplicates.is_empty() {
        return Err(CommitError::Duplicates(duplicates));
    }

    let emails: Vec<String> = records.iter().map(|r| r.email.to_lowercase()).collect();
    let existing = find_by_emails(conn, &emails)?;
    if !existing.is_empty() {
        let taken: HashSet<String> =
            existing.iter().map(|r| r.email.to_lowercase()).collect();
        let conflicts = records
            .iter()
            .filter(|r| taken.contains(&r.email.to_lowercase()))
            .map(|r| ValidationError::duplicate_in_database(r.row, &r.email))
            .collect();
        return Err(CommitError::Duplicates(conflicts));
    }

    insert_all(conn, records)
}

/// Inserts the whole batch inside one transaction, failing fast on the first
/// bad insert. The transaction only commits after every row went in; any
/// early return drops it, which rolls everything back.
fn insert_all(
    conn: &mut Connection,
    records: &[OfficeBearerRecord],
) -> Result<Vec<StoredOfficeBearer>, CommitError> {
    let tx = conn.transaction()?;
    let mut stored = Vec::with_capacity(records.len());

    for record in records {
        let id = Uuid::new_v4().to_string();
        let result = tx
            .execute(
                "INSERT INTO office_bearers
                     (id, name, email, phone, position, department, address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    record.name,
                    record.email,
                    record.phone,
                    record.position,
                    record.department,
                    record.address
                ],
            )
            .and_then(|_| {
                tx.query_row(
                    "SELECT id, name, email, phone, position, department, address, created_at
                     FROM office_bearers WHERE id = ?1",
                    params![id],
                    stored_from_row,
                )
            });

        match result {
            Ok(row) => stored.push(row),
            Err(e) => {
                return Err(CommitError::Creation(ValidationError::creation_failed(
                    &record.email,
                    &e.to_string(),
                )));
            }
        }
    }

    tx.commit()?;
    Ok(stored)
}

/// Stored records whose email matches any of `emails` case-insensitively.
/// The given emails must already be lowercased.
pub fn find_by_emails(
    conn: &Connection,
    emails: &[String],
) -> rusqlite::Result<Vec<StoredOfficeBearer>> {
    if emails.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; emails.len()].join(", ");
    let sql = format!(
        "SELECT id, name, email, phone, position, department, address, created_at
         FROM office_bearers WHERE lower(email) IN ({})",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(emails), stored_from_row)?;
    rows.collect()
}

/// Every stored record, newest first. `created_at` has second resolution, so
/// rowid breaks ties for records inserted within the same second.
pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<StoredOfficeBearer>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, position, department, address, created_at
         FROM office_bearers ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], stored_from_row)?;
    rows.collect()
}

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredOfficeBearer> {
    Ok(StoredOfficeBearer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        position: row.get(4)?,
        department: row.get(5)?,
        address: row.get(6)?,
        created_at: row.get(7)?,
    })
}
