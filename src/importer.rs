use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::Result;
#[cfg(feature = "xlsx")]
use crate::error::LensError;
use crate::models::Table;

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Lenient numeric parse. Anything that is not a finite number becomes 0.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    let parsed = if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        inner.trim().parse::<f64>().map(|v| -v)
    } else {
        s.parse::<f64>()
    };
    match parsed {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Two-digit-year patterns come before their four-digit twins: `%Y` would
// happily read "24" as the year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a calendar date, trying `preferred` first and then the built-in
/// formats (month-first for slash dates).
pub fn parse_date(raw: &str, preferred: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(fmt) = preferred {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(chrono::Duration::try_days(serial.trunc() as i64)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load a ledger file into a string table. Workbooks go through calamine
/// (feature `xlsx`); everything else is read as CSV with a header row.
pub fn load_table(file_path: &Path) -> Result<Table> {
    #[cfg(feature = "xlsx")]
    if is_workbook(file_path) {
        return load_workbook(file_path);
    }
    load_csv(file_path)
}

pub fn load_csv(file_path: &Path) -> Result<Table> {
    let file = std::fs::File::open(file_path)?;
    read_csv(std::io::BufReader::new(file))
}

pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(columns = headers.len(), rows = rows.len(), "read csv ledger");
    Ok(Table::new(headers, rows))
}

#[cfg(feature = "xlsx")]
fn is_workbook(file_path: &Path) -> bool {
    file_path.extension().map_or(false, |e| {
        ["xlsx", "xlsm", "xls", "ods"]
            .iter()
            .any(|ext| e.eq_ignore_ascii_case(ext))
    })
}

#[cfg(feature = "xlsx")]
fn load_workbook(file_path: &Path) -> Result<Table> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(file_path)
        .map_err(|e| LensError::Xlsx(format!("Failed to open workbook: {e}")))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Table::default());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LensError::Xlsx(format!("Failed to read sheet {sheet}: {e}")))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();
    let date_idx = headers.iter().position(|h| h.trim() == crate::models::COL_DATE);

    let body: Vec<Vec<String>> = rows
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if Some(i) == date_idx {
                        date_cell_text(cell)
                    } else {
                        cell_text(cell)
                    }
                })
                .collect()
        })
        .collect();
    debug!(sheet = %sheet, rows = body.len(), "read workbook ledger");
    Ok(Table::new(headers, body))
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Date cells may arrive as Excel serial numbers rather than text.
#[cfg(feature = "xlsx")]
fn date_cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Float(f) => excel_serial_to_date(*f).unwrap_or_else(|| f.to_string()),
        Data::Int(i) => excel_serial_to_date(*i as f64).unwrap_or_else(|| i.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).unwrap_or_else(|| cell_text(cell)),
        other => {
            let text = cell_text(other);
            // "NaN"/"inf" parse as f64 but are not serials; leave them for the date parser to reject.
            match text.parse::<f64>() {
                Ok(serial) if serial.is_finite() => excel_serial_to_date(serial).unwrap_or(text),
                _ => text,
            }
        }
    }
}
