use comfy_table::{Cell, Table};

use crate::analysis::{CategoryRow, LargeTxnRow, MonthlyRow, Report, TrendRow};
use crate::fmt::{money, pct, ratio_pct};

/// Plain so the report text is identical whether or not a terminal is attached.
fn heading(title: &str) -> String {
    format!("=== {title} ===")
}

// ---------------------------------------------------------------------------
// Tables (report rows → grid, capped at top_n)
// ---------------------------------------------------------------------------

pub fn format_monthly(rows: &[MonthlyRow], top_n: usize) -> String {
    if rows.is_empty() {
        return "No transactions.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Month", "Last Balance", "Count", "Abs Amount", "Inflow", "Outflow"]);
    for r in rows.iter().take(top_n) {
        table.add_row(vec![
            Cell::new(r.month),
            Cell::new(money(r.last_balance)),
            Cell::new(r.txn_count),
            Cell::new(money(r.abs_amount_sum)),
            Cell::new(money(r.inflow_sum)),
            Cell::new(money(r.outflow_sum)),
        ]);
    }
    table.to_string()
}

pub fn format_categories(rows: &[CategoryRow], top_n: usize) -> String {
    if rows.is_empty() {
        return "No transactions.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec![
        "Month",
        "Category",
        "Subcategory",
        "Count",
        "Abs Amount",
        "Inflow",
        "Outflow",
    ]);
    for r in rows.iter().take(top_n) {
        table.add_row(vec![
            Cell::new(r.month),
            Cell::new(&r.category),
            Cell::new(&r.subcategory),
            Cell::new(r.txn_count),
            Cell::new(money(r.abs_amount_sum)),
            Cell::new(money(r.inflow_sum)),
            Cell::new(money(r.outflow_sum)),
        ]);
    }
    table.to_string()
}

pub fn format_trends(rows: &[TrendRow], top_n: usize, empty_msg: &str) -> String {
    if rows.is_empty() {
        return empty_msg.to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Description", "Month", "Count", "Prev Count", "% Change", "Change"]);
    for r in rows.iter().take(top_n) {
        table.add_row(vec![
            Cell::new(&r.description),
            Cell::new(r.month),
            Cell::new(r.count),
            Cell::new(r.prev_count.map(|c| c.to_string()).unwrap_or_default()),
            Cell::new(r.pct_change.map(pct).unwrap_or_default()),
            Cell::new(&r.change_label),
        ]);
    }
    table.to_string()
}

pub fn format_large_transactions(rows: &[LargeTxnRow], top_n: usize) -> String {
    if rows.is_empty() {
        return "No transaction groups.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Month", "Category", "Subcategory", "Largest Share", "Flagged"]);
    for r in rows.iter().take(top_n) {
        table.add_row(vec![
            Cell::new(r.month),
            Cell::new(&r.category),
            Cell::new(&r.subcategory),
            Cell::new(ratio_pct(r.ratio)),
            Cell::new(if r.flagged { "yes" } else { "no" }),
        ]);
    }
    table.to_string()
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

/// Reference text rendering, one blank-line separated section per table.
pub fn render_report(report: &Report, top_n: usize) -> String {
    let sections = [
        format!(
            "{}\n{}",
            heading(&format!("MONTHLY AGGREGATES (Overall) [Top {top_n} Rows]")),
            format_monthly(&report.monthly, top_n)
        ),
        format!(
            "{}\n{}",
            heading(&format!("MONTHLY CATEGORY/SUBCATEGORY AGGREGATES [Top {top_n} Rows]")),
            format_categories(&report.categories, top_n)
        ),
        report.summary.recurring_notice.clone(),
        format!(
            "{}\n{}",
            heading("RECURRING TRANSACTIONS MONTH-TO-MONTH INCREASES (Exact % Change)"),
            format_trends(
                &report.summary.top_increases,
                top_n,
                "No increasing recurring transactions."
            )
        ),
        format!(
            "{}\n{}",
            heading("RECURRING TRANSACTIONS MONTH-TO-MONTH DECREASES (Exact % Change)"),
            format_trends(
                &report.summary.top_decreases,
                top_n,
                "No decreasing recurring transactions."
            )
        ),
        format!(
            "{}\n{}",
            heading(&format!("LARGE SINGLE TRANSACTIONS (Share of Group Total) [Top {top_n} Rows]")),
            format_large_transactions(&report.large_transactions, top_n)
        ),
        format!("{}\n{}", heading("SUMMARY"), report.summary.text),
    ];
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::ledger;
    use crate::analysis::{analyze, AnalysisConfig};

    fn report(rows: &[(&str, &str, &str, &str, &str, &str, &str)]) -> Report {
        analyze(&ledger(rows), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let r = report(&[("2024-01-01", "10", "", "10", "A", "C", "S")]);
        let text = render_report(&r, 5);
        let order = [
            "MONTHLY AGGREGATES (Overall)",
            "MONTHLY CATEGORY/SUBCATEGORY AGGREGATES",
            "No recurring transaction details found",
            "MONTH-TO-MONTH INCREASES",
            "MONTH-TO-MONTH DECREASES",
            "LARGE SINGLE TRANSACTIONS",
            "SUMMARY",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(text.contains("No increasing recurring transactions."));
        assert!(text.contains("No decreasing recurring transactions."));
    }

    #[test]
    fn test_tables_capped_at_top_n() {
        let rows: Vec<(String, String)> = (1..=8)
            .map(|m| (format!("2024-{m:02}-01"), format!("VENDOR{m}")))
            .collect();
        let borrowed: Vec<(&str, &str, &str, &str, &str, &str, &str)> = rows
            .iter()
            .map(|(d, v)| (d.as_str(), "", "5", "", v.as_str(), "C", "S"))
            .collect();
        let r = report(&borrowed);
        let text = format_monthly(&r.monthly, 3);
        assert!(text.contains("2024-03"));
        assert!(!text.contains("2024-04"));
        let text = format_large_transactions(&r.large_transactions, 2);
        assert!(text.contains("2024-02"));
        assert!(!text.contains("2024-03"));
    }

    #[test]
    fn test_money_and_percent_formatting_in_tables() {
        let r = report(&[
            ("2024-01-01", "1234.5", "", "1234.5", "A", "C", "S"),
            ("2024-01-02", "", "100", "1134.5", "B", "C", "S"),
        ]);
        let text = format_monthly(&r.monthly, 5);
        assert!(text.contains("$1,134.50"));
        assert!(text.contains("$1,334.50"));
        let text = format_large_transactions(&r.large_transactions, 5);
        assert!(text.contains("92.51%"), "{text}");
        assert!(text.contains("yes"));
    }

    #[test]
    fn test_empty_report_renders_sentinel() {
        let r = report(&[]);
        let text = render_report(&r, 5);
        assert!(text.contains("No transactions."));
        assert!(text.trim_end().ends_with("No significant patterns found."));
    }
}
