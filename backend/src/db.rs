use rusqlite::Connection;

/// Schema applied on every open; statements are idempotent. The unique index
/// on `lower(email)` is the final authority on email uniqueness: a duplicate
/// that slips past the pre-insert checks (e.g. two concurrent uploads) fails
/// here and rolls the batch back.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS office_bearers (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT,
    position    TEXT,
    department  TEXT,
    address     TEXT,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_office_bearers_email
    ON office_bearers (lower(email));
";

/// Opens the database file and makes sure the schema exists.
pub fn open(path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

#[cfg(test)]
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
