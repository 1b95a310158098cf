use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::aggregate::{CategoryKey, Totals};
use crate::models::MonthKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeTxnRow {
    pub month: MonthKey,
    pub category: String,
    pub subcategory: String,
    /// Largest |amount| over the group's total |amount|; 0 for a zero total.
    pub ratio: f64,
    pub flagged: bool,
}

impl LargeTxnRow {
    /// `"{month} - {category}/{subcategory}"`
    pub fn label(&self) -> String {
        format!("{} - {}/{}", self.month, self.category, self.subcategory)
    }
}

pub fn largest_txn_ratio(max_abs: f64, total_abs: f64) -> f64 {
    if total_abs == 0.0 {
        0.0
    } else {
        max_abs / total_abs
    }
}

/// One row per `(month, category, subcategory)`, flagged when a single
/// transaction makes up at least `threshold` of the group.
pub fn flag_large_transactions(
    groups: &BTreeMap<CategoryKey, Totals>,
    threshold: f64,
) -> Vec<LargeTxnRow> {
    let rows: Vec<LargeTxnRow> = groups
        .iter()
        .map(|((month, category, subcategory), tot)| {
            let ratio = largest_txn_ratio(tot.max_abs_amount, tot.abs_amount);
            LargeTxnRow {
                month: *month,
                category: category.clone(),
                subcategory: subcategory.clone(),
                ratio,
                flagged: tot.abs_amount != 0.0 && ratio >= threshold,
            }
        })
        .collect();
    debug!(
        groups = rows.len(),
        flagged = rows.iter().filter(|r| r.flagged).count(),
        "large transaction check"
    );
    rows
}
