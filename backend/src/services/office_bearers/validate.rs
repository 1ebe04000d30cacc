//! Spreadsheet validation for office bearer uploads.
//!
//! The pipeline is deliberately exhaustive-then-fail: instead of stopping at
//! the first bad cell, every row is checked and the full error list is
//! returned, so the uploader can fix the whole file in one pass. The only
//! short-circuits are structural: an unparseable or empty file, or a missing
//! required column, stops before any row is looked at.
//!
//! Parsing and row validation are separate steps. `parse_workbook` turns the
//! uploaded bytes into headers plus header-keyed rows; `validate_rows` is a
//! pure function over those, which keeps the column matching and field checks
//! testable without spreadsheet fixtures.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use common::model::office_bearer::OfficeBearerRecord;
use common::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Columns that must be present before any row is evaluated.
const REQUIRED_COLUMNS: [&str; 2] = ["Name", "Email"];

/// Optional record fields and the columns they are read from.
const OPTIONAL_COLUMNS: [&str; 4] = ["Phone", "Position", "Department", "Address"];

/// `local@domain.tld`: no whitespace or second `@` in any part, at least one
/// dot in the domain.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// One spreadsheet data row, keyed by the original header text.
pub type RawRow = HashMap<String, String>;

/// Validates uploaded spreadsheet bytes into a clean batch of records, or a
/// complete list of everything wrong with the file.
pub fn validate(bytes: &[u8]) -> Result<Vec<OfficeBearerRecord>, Vec<ValidationError>> {
    let (headers, rows) = parse_workbook(bytes).map_err(|e| vec![e])?;
    validate_rows(&headers, &rows)
}

/// Parses the first worksheet into headers (first row) and data rows.
///
/// Bytes that cannot be opened as a workbook yield `parsing_error`; a
/// workbook with no sheets or no rows at all has zero data rows and yields
/// `empty_file`.
fn parse_workbook(bytes: &[u8]) -> Result<(Vec<String>, Vec<RawRow>), ValidationError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| ValidationError::parsing(&e.to_string()))?;

    let first_sheet = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => return Err(ValidationError::empty_file()),
    };

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| ValidationError::parsing(&e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Err(ValidationError::empty_file()),
    };

    // Zip truncates at the shorter side: short rows simply lack the trailing
    // keys, surplus cells beyond the header width are dropped.
    let data_rows: Vec<RawRow> = rows
        .map(|row| {
            headers
                .iter()
                .cloned()
                .zip(row.iter().map(cell_to_string))
                .collect()
        })
        .collect();

    Ok((headers, data_rows))
}

/// Renders a cell as the string the uploader typed. Whole floats drop the
/// `.0` so numeric phone cells come out intact.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Maps normalized header text (trimmed, lowercased) to the original header,
/// so cells can be fetched case-insensitively.
fn column_lookup(headers: &[String]) -> HashMap<String, String> {
    headers
        .iter()
        .map(|h| (h.trim().to_lowercase(), h.clone()))
        .collect()
}

/// Fetches a cell by logical column name; blank and whitespace-only cells
/// count as absent.
fn field_value<'a>(
    row: &'a RawRow,
    lookup: &HashMap<String, String>,
    column: &str,
) -> Option<&'a str> {
    let original = lookup.get(&column.to_lowercase())?;
    row.get(original)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn optional_value(row: &RawRow, lookup: &HashMap<String, String>, column: &str) -> Option<String> {
    field_value(row, lookup, column).map(|v| v.to_string())
}

/// Checks every row and either returns the full normalized batch or every
/// error found. Column errors are evaluated first and suppress row checks.
fn validate_rows(
    headers: &[String],
    rows: &[RawRow],
) -> Result<Vec<OfficeBearerRecord>, Vec<ValidationError>> {
    if rows.is_empty() {
        return Err(vec![ValidationError::empty_file()]);
    }

    let lookup = column_lookup(headers);

    let missing: Vec<ValidationError> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !lookup.contains_key(&column.to_lowercase()))
        .map(|column| ValidationError::missing_column(column))
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    let mut errors = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let display_row = i + 2; // header is row 1
        if field_value(row, &lookup, "Name").is_none() {
            errors.push(ValidationError::empty_field(display_row, "Name"));
        }
        match field_value(row, &lookup, "Email") {
            None => errors.push(ValidationError::empty_field(display_row, "Email")),
            Some(value) if !EMAIL_RE.is_match(value) => {
                errors.push(ValidationError::invalid_format(display_row, value));
            }
            Some(_) => {}
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let [phone, position, department, address] =
                OPTIONAL_COLUMNS.map(|column| optional_value(row, &lookup, column));
            OfficeBearerRecord {
                row: i + 2,
                name: field_value(row, &lookup, "Name").unwrap_or_default().to_string(),
                email: field_value(row, &lookup, "Email").unwrap_or_default().to_string(),
                phone,
                position,
                department,
                address,
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::validation::ValidationErrorKind;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn garbage_bytes_are_a_parsing_error() {
        let errors = validate(b"definitely not a spreadsheet").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ParsingError);
    }

    #[test]
    fn no_data_rows_is_an_empty_file() {
        let errors = validate_rows(&headers(&["Name", "Email"]), &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyFile);
    }

    #[test]
    fn missing_column_suppresses_row_checks() {
        // The row would also fail the Name check, but column errors win.
        let rows = vec![row(&[("Name", "")])];
        let errors = validate_rows(&headers(&["Name"]), &rows).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingColumn);
        assert_eq!(errors[0].column.as_deref(), Some("Email"));
    }

    #[test]
    fn headers_match_case_insensitively_and_trimmed() {
        let hs = headers(&["  name ", "EMAIL"]);
        let rows = vec![row(&[("  name ", "Ada"), ("EMAIL", "ada@example.com")])];
        let records = validate_rows(&hs, &rows).unwrap();
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].email, "ada@example.com");
    }

    #[test]
    fn blank_required_fields_are_reported_per_occurrence() {
        let hs = headers(&["Name", "Email"]);
        let rows = vec![
            row(&[("Name", "   "), ("Email", "a@b.co")]),
            row(&[("Name", "Bea"), ("Email", "")]),
            row(&[("Name", ""), ("Email", " ")]),
        ];
        let errors = validate_rows(&hs, &rows).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyField);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].field.as_deref(), Some("Name"));
        assert_eq!(errors[1].row, Some(3));
        assert_eq!(errors[1].field.as_deref(), Some("Email"));
        assert_eq!(errors[2].row, Some(4));
        assert_eq!(errors[3].row, Some(4));
    }

    #[test]
    fn email_format_is_enforced() {
        let hs = headers(&["Name", "Email"]);
        let rows = vec![
            row(&[("Name", "A"), ("Email", "not-an-email")]),
            row(&[("Name", "B"), ("Email", "a@b.co")]),
        ];
        let errors = validate_rows(&hs, &rows).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidFormat);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].value.as_deref(), Some("not-an-email"));
    }

    #[test]
    fn email_rejects_spaces_missing_dot_and_double_at() {
        for bad in ["a b@c.co", "a@b", "a@@b.co", "@b.co", "a@"] {
            assert!(!EMAIL_RE.is_match(bad), "{} should be rejected", bad);
        }
        for good in ["a@b.co", "first.last@sub.domain.org"] {
            assert!(EMAIL_RE.is_match(good), "{} should be accepted", good);
        }
    }

    #[test]
    fn all_row_errors_are_collected_before_returning() {
        let hs = headers(&["Name", "Email"]);
        let rows = vec![
            row(&[("Name", ""), ("Email", "a@b.co")]),
            row(&[("Name", "B"), ("Email", "nope")]),
        ];
        let errors = validate_rows(&hs, &rows).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn optional_fields_are_trimmed_or_absent() {
        let hs = headers(&["Name", "Email", "Phone", "Department", "Nickname"]);
        let rows = vec![row(&[
            ("Name", " Ada "),
            ("Email", " ada@example.com "),
            ("Phone", "  555-0100 "),
            ("Department", "   "),
            ("Nickname", "ignored"),
        ])];
        let records = validate_rows(&hs, &rows).unwrap();
        let record = &records[0];
        assert_eq!(record.row, 2);
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.phone.as_deref(), Some("555-0100"));
        assert_eq!(record.department, None);
        assert_eq!(record.position, None);
        assert_eq!(record.address, None);
    }

    #[test]
    fn whole_float_cells_render_without_decimal_point() {
        assert_eq!(cell_to_string(&Data::Float(5550100.0)), "5550100");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
