use tracing::debug;

use crate::error::{LensError, Result};
use crate::importer::{parse_amount, parse_date};
use crate::models::{
    MonthKey, Table, Transaction, COL_BALANCE, COL_CATEGORY, COL_CREDIT, COL_DATE, COL_DEBIT,
    COL_DETAIL, COL_SUBCATEGORY, REQUIRED_COLUMNS,
};

struct Columns {
    date: usize,
    credit: usize,
    debit: usize,
    balance: usize,
    detail: usize,
    category: usize,
    subcategory: usize,
}

fn resolve_columns(table: &Table) -> Result<Columns> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LensError::Schema { missing });
    }
    // Every lookup below succeeds after the check above.
    let idx = |name: &str| table.column(name).unwrap_or_default();
    Ok(Columns {
        date: idx(COL_DATE),
        credit: idx(COL_CREDIT),
        debit: idx(COL_DEBIT),
        balance: idx(COL_BALANCE),
        detail: idx(COL_DETAIL),
        category: idx(COL_CATEGORY),
        subcategory: idx(COL_SUBCATEGORY),
    })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Turn raw rows into typed transactions, sorted chronologically.
///
/// A single unparseable date fails the whole ledger. Unparseable money cells
/// are coerced to 0. Rows sharing a date keep their source order.
pub fn normalize(table: &Table, date_format: Option<&str>) -> Result<Vec<Transaction>> {
    let cols = resolve_columns(table)?;

    let mut txns = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let raw_date = cell(row, cols.date);
        let date = parse_date(raw_date, date_format).ok_or_else(|| LensError::DateParse {
            row: i + 1,
            value: raw_date.to_string(),
        })?;
        let credit = parse_amount(cell(row, cols.credit));
        let debit = parse_amount(cell(row, cols.debit));
        txns.push(Transaction {
            row: i,
            date,
            month: MonthKey::of(date),
            description: cell(row, cols.detail).to_string(),
            category: cell(row, cols.category).to_string(),
            subcategory: cell(row, cols.subcategory).to_string(),
            credit,
            debit,
            balance: parse_amount(cell(row, cols.balance)),
            inflow: credit,
            outflow: debit,
            amount: credit - debit,
        });
    }

    // Same-day rows keep source order.
    txns.sort_by_key(|t| (t.date, t.row));
    debug!(transactions = txns.len(), "normalized ledger");
    Ok(txns)
}
