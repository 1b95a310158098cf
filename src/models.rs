use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Column headers the engine requires in every ledger.
pub const COL_DATE: &str = "Date";
pub const COL_CREDIT: &str = "Credit";
pub const COL_DEBIT: &str = "Debit";
pub const COL_BALANCE: &str = "Balance";
pub const COL_DETAIL: &str = "Transaction Detail";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SUBCATEGORY: &str = "Subcategory";

pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_DATE,
    COL_CREDIT,
    COL_DEBIT,
    COL_BALANCE,
    COL_DETAIL,
    COL_CATEGORY,
    COL_SUBCATEGORY,
];

/// Raw tabular input as handed over by a loader: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// Year-month bucket. Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A normalized ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Zero-based position in the source table; secondary sort key.
    pub row: usize,
    pub date: NaiveDate,
    pub month: MonthKey,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    #[allow(dead_code)]
    pub credit: f64,
    #[allow(dead_code)]
    pub debit: f64,
    pub balance: f64,
    pub inflow: f64,
    pub outflow: f64,
    /// Signed net: credit - debit.
    pub amount: f64,
}
