use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{MonthKey, Transaction};

/// Running totals for one group of transactions.
#[derive(Debug, Clone, Default)]
pub(crate) struct Totals {
    pub last_balance: f64,
    pub count: usize,
    pub abs_amount: f64,
    pub max_abs_amount: f64,
    pub inflow: f64,
    pub outflow: f64,
}

impl Totals {
    pub fn add(&mut self, t: &Transaction) {
        let abs = t.amount.abs();
        self.last_balance = t.balance;
        self.count += 1;
        self.abs_amount += abs;
        self.max_abs_amount = self.max_abs_amount.max(abs);
        self.inflow += t.inflow;
        self.outflow += t.outflow;
    }
}

pub(crate) type CategoryKey = (MonthKey, String, String);

/// Group by `(month, category, subcategory)`. Empty category strings are
/// ordinary keys.
pub(crate) fn category_totals(txns: &[Transaction]) -> BTreeMap<CategoryKey, Totals> {
    let mut groups: BTreeMap<CategoryKey, Totals> = BTreeMap::new();
    for t in txns {
        groups
            .entry((t.month, t.category.clone(), t.subcategory.clone()))
            .or_default()
            .add(t);
    }
    groups
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: MonthKey,
    pub last_balance: f64,
    pub txn_count: usize,
    pub abs_amount_sum: f64,
    pub inflow_sum: f64,
    pub outflow_sum: f64,
}

/// Per-month rollups, ascending by month. Transactions must already be in
/// chronological order so the last one seen carries the closing balance.
pub fn monthly(txns: &[Transaction]) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<MonthKey, Totals> = BTreeMap::new();
    for t in txns {
        groups.entry(t.month).or_default().add(t);
    }
    debug!(months = groups.len(), "monthly aggregates");
    groups
        .into_iter()
        .map(|(month, tot)| MonthlyRow {
            month,
            last_balance: tot.last_balance,
            txn_count: tot.count,
            abs_amount_sum: tot.abs_amount,
            inflow_sum: tot.inflow,
            outflow_sum: tot.outflow,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category / subcategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub month: MonthKey,
    pub category: String,
    pub subcategory: String,
    pub txn_count: usize,
    pub abs_amount_sum: f64,
    pub inflow_sum: f64,
    pub outflow_sum: f64,
}

pub fn by_category(groups: &BTreeMap<CategoryKey, Totals>) -> Vec<CategoryRow> {
    debug!(groups = groups.len(), "category aggregates");
    groups
        .iter()
        .map(|((month, category, subcategory), tot)| CategoryRow {
            month: *month,
            category: category.clone(),
            subcategory: subcategory.clone(),
            txn_count: tot.count,
            abs_amount_sum: tot.abs_amount,
            inflow_sum: tot.inflow,
            outflow_sum: tot.outflow,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ingest::normalize;
    use crate::analysis::test_support::ledger;

    fn txns(rows: &[(&str, &str, &str, &str, &str, &str, &str)]) -> Vec<Transaction> {
        normalize(&ledger(rows), None).unwrap()
    }

    #[test]
    fn test_monthly_rollup() {
        let t = txns(&[
            ("2024-01-02", "500", "", "1500", "PAY", "Income", "Wages"),
            ("2024-01-10", "", "200", "1300", "RENT", "Housing", "Rent"),
            ("2024-02-01", "", "50", "1250", "GAS", "Auto", "Fuel"),
        ]);
        let rows = monthly(&t);
        assert_eq!(rows.len(), 2);
        let jan = &rows[0];
        assert_eq!(jan.month.to_string(), "2024-01");
        assert_eq!(jan.txn_count, 2);
        assert_eq!(jan.abs_amount_sum, 700.0);
        assert_eq!(jan.inflow_sum, 500.0);
        assert_eq!(jan.outflow_sum, 200.0);
        assert_eq!(jan.last_balance, 1300.0);
        assert_eq!(rows[1].last_balance, 1250.0);
    }

    #[test]
    fn test_monthly_last_balance_uses_date_not_row_order() {
        let t = txns(&[
            ("2024-01-31", "", "10", "90", "LATE", "C", "S"),
            ("2024-01-01", "", "10", "100", "EARLY", "C", "S"),
        ]);
        let rows = monthly(&t);
        assert_eq!(rows[0].last_balance, 90.0);
    }

    #[test]
    fn test_monthly_sorted_across_years() {
        let t = txns(&[
            ("2024-01-05", "1", "", "", "A", "C", "S"),
            ("2023-12-05", "1", "", "", "A", "C", "S"),
        ]);
        let months: Vec<String> = monthly(&t).iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn test_category_groups_keep_empty_keys() {
        let t = txns(&[
            ("2024-03-01", "", "10", "", "A", "Food", "Dining"),
            ("2024-03-02", "", "15", "", "B", "Food", "Dining"),
            ("2024-03-03", "", "7", "", "C", "", ""),
            ("2024-04-03", "", "7", "", "C", "Food", "Dining"),
        ]);
        let rows = by_category(&category_totals(&t));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "");
        assert_eq!(rows[0].subcategory, "");
        assert_eq!(rows[0].txn_count, 1);
        assert_eq!(rows[1].category, "Food");
        assert_eq!(rows[1].txn_count, 2);
        assert_eq!(rows[1].abs_amount_sum, 25.0);
        assert_eq!(rows[1].outflow_sum, 25.0);
        assert_eq!(rows[2].month.to_string(), "2024-04");
    }

    #[test]
    fn test_empty_input() {
        assert!(monthly(&[]).is_empty());
        assert!(by_category(&category_totals(&[])).is_empty());
    }
}
