use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Unparseable date {value:?} on row {row}")]
    DateParse { row: usize, value: String },

    #[error("Missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[cfg(feature = "xlsx")]
    #[error("Workbook error: {0}")]
    Xlsx(String),
}

impl LensError {
    /// Stable tag used in structured failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DateParse { .. } => "DateParseError",
            Self::Schema { .. } => "SchemaError",
            Self::Csv(_) => "CsvError",
            Self::Io(_) => "IoError",
            Self::Settings(_) => "SettingsError",
            #[cfg(feature = "xlsx")]
            Self::Xlsx(_) => "WorkbookError",
        }
    }
}

/// A failed report, flattened to kind + message for callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub kind: String,
    pub message: String,
}

impl From<&LensError> for Failure {
    fn from(e: &LensError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
