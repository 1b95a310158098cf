//! Transaction analytics engine.
//!
//! One ledger snapshot in, one [`Report`] out. The pipeline is pure and
//! synchronous: normalize, then monthly and category rollups, recurrence
//! detection with month-over-month trends, large-transaction flags, and a
//! narrative summary built from all of them.

pub mod aggregate;
pub mod anomaly;
pub mod ingest;
pub mod recurrence;
pub mod summary;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Failure, Result};
use crate::models::Table;
use crate::render;

pub use aggregate::{CategoryRow, MonthlyRow};
pub use anomaly::LargeTxnRow;
pub use recurrence::TrendRow;
pub use summary::Summary;

/// A description recurs when it appears in more than this many distinct months.
pub const RECURRING_MIN_MONTHS: usize = 2;
/// Share of a group's absolute total one transaction must reach to be flagged.
pub const LARGE_TXN_RATIO: f64 = 0.5;
/// Absolute month-over-month percentage counted as significant.
pub const SIGNIFICANT_CHANGE_PCT: f64 = 50.0;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub recurring_min_months: usize,
    pub large_txn_ratio: f64,
    pub significant_change_pct: f64,
    /// Row cap for rendered tables and top-mover lists.
    pub top_n: usize,
    /// chrono format tried before the built-in date formats.
    pub date_format: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recurring_min_months: RECURRING_MIN_MONTHS,
            large_txn_ratio: LARGE_TXN_RATIO,
            significant_change_pct: SIGNIFICANT_CHANGE_PCT,
            top_n: DEFAULT_TOP_N,
            date_format: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub transaction_count: usize,
    /// Hex SHA-256 of the input table.
    pub source_checksum: String,
    pub monthly: Vec<MonthlyRow>,
    pub categories: Vec<CategoryRow>,
    pub recurring: Vec<String>,
    pub trends: Vec<TrendRow>,
    pub large_transactions: Vec<LargeTxnRow>,
    pub summary: Summary,
}

/// Result of a report request as seen by callers: never a raw error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success { report: Report, rendered: String },
    Failure(Failure),
}

pub fn table_checksum(table: &Table) -> String {
    let mut hasher = Sha256::new();
    for row in std::iter::once(&table.headers).chain(table.rows.iter()) {
        for cell in row {
            hasher.update(cell.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}

pub fn analyze(table: &Table, config: &AnalysisConfig) -> Result<Report> {
    let txns = ingest::normalize(table, config.date_format.as_deref())?;

    let monthly = aggregate::monthly(&txns);
    let groups = aggregate::category_totals(&txns);
    let categories = aggregate::by_category(&groups);
    let large_transactions = anomaly::flag_large_transactions(&groups, config.large_txn_ratio);

    let recurring = recurrence::detect_recurring(&txns, config.recurring_min_months);
    let trends = recurrence::trends(&txns, &recurring);

    let summary = summary::summarize(&recurring, &trends, &large_transactions, config);
    debug!(
        transactions = txns.len(),
        months = monthly.len(),
        recurring = recurring.len(),
        "report computed"
    );

    Ok(Report {
        transaction_count: txns.len(),
        source_checksum: table_checksum(table),
        monthly,
        categories,
        recurring: recurring.into_iter().collect(),
        trends,
        large_transactions,
        summary,
    })
}

/// Analyze and render, folding any failure into [`Outcome::Failure`].
pub fn run_report(table: &Table, config: &AnalysisConfig) -> Outcome {
    match analyze(table, config) {
        Ok(report) => {
            let rendered = render::render_report(&report, config.top_n);
            Outcome::Success { report, rendered }
        }
        Err(e) => {
            debug!(kind = e.kind(), error = %e, "report failed");
            Outcome::Failure(Failure::from(&e))
        }
    }
}
