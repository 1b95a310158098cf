use std::collections::BTreeSet;

use serde::Serialize;

use super::anomaly::LargeTxnRow;
use super::recurrence::TrendRow;
use super::AnalysisConfig;

pub const NO_PATTERNS: &str = "No significant patterns found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub recurring_notice: String,
    pub top_increases: Vec<TrendRow>,
    pub top_decreases: Vec<TrendRow>,
    pub significant_increases: Vec<String>,
    pub significant_decreases: Vec<String>,
    pub large_transaction_groups: Vec<String>,
    pub text: String,
}

/// `{'A', 'B'}`
fn set_notation<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{}'", s.as_ref())).collect();
    format!("{{{}}}", quoted.join(", "))
}

fn movers_sentence(kind: &str, rows: &[TrendRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let items: Vec<String> = rows
        .iter()
        .map(|r| format!("'{}' in {} ({})", r.description, r.month, r.change_label))
        .collect();
    Some(format!(
        "Largest month-over-month {kind} among recurring details: {}.",
        items.join(", ")
    ))
}

/// Ranked by magnitude of the unrounded change, then by `(description, month)`.
fn top_movers(trends: &[TrendRow], increasing: bool, top_n: usize) -> Vec<TrendRow> {
    let mut rows: Vec<&TrendRow> = trends
        .iter()
        .filter(|r| match r.pct_change {
            Some(p) if increasing => p > 0.0,
            Some(p) => p < 0.0,
            None => false,
        })
        .collect();
    rows.sort_by(|a, b| {
        let (a, b) = (a.raw_pct.unwrap_or(0.0).abs(), b.raw_pct.unwrap_or(0.0).abs());
        b.total_cmp(&a)
    });
    rows.into_iter().take(top_n).cloned().collect()
}

/// Significance is judged on the unrounded change so display rounding never
/// moves a value across the threshold.
fn significant(trends: &[TrendRow], threshold: f64, increasing: bool) -> Vec<String> {
    trends
        .iter()
        .filter_map(|r| {
            let p = r.raw_pct?;
            let hit = p.abs() >= threshold && if increasing { p > 0.0 } else { p < 0.0 };
            hit.then(|| r.description.clone())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn summarize(
    recurring: &BTreeSet<String>,
    trends: &[TrendRow],
    large: &[LargeTxnRow],
    config: &AnalysisConfig,
) -> Summary {
    let recurring: Vec<&String> = recurring.iter().collect();
    let top_increases = top_movers(trends, true, config.top_n);
    let top_decreases = top_movers(trends, false, config.top_n);
    let significant_increases = significant(trends, config.significant_change_pct, true);
    let significant_decreases = significant(trends, config.significant_change_pct, false);
    let large_transaction_groups: Vec<String> =
        large.iter().filter(|r| r.flagged).map(LargeTxnRow::label).collect();

    let recurring_notice = if recurring.is_empty() {
        format!(
            "No recurring transaction details found (more than {} distinct months).",
            config.recurring_min_months
        )
    } else {
        format!(
            "Recurring Transaction Details (Set Notation): {}",
            set_notation(&recurring)
        )
    };

    let sig = format!("\u{2265}{}%", config.significant_change_pct);
    let mut parts: Vec<String> = Vec::new();
    if !recurring.is_empty() {
        parts.push(format!(
            "Recurring transactions found for details: {}.",
            set_notation(&recurring)
        ));
    }
    parts.extend(movers_sentence("increases", &top_increases));
    parts.extend(movers_sentence("decreases", &top_decreases));
    if !significant_increases.is_empty() {
        parts.push(format!(
            "Significant ({sig}) increases for recurring details: {}.",
            set_notation(&significant_increases)
        ));
    }
    if !significant_decreases.is_empty() {
        parts.push(format!(
            "Significant ({sig}) decreases for recurring details: {}.",
            set_notation(&significant_decreases)
        ));
    }
    if !large_transaction_groups.is_empty() {
        parts.push(format!(
            "Large single txn (\u{2265}{}% of group total) found in:\n{}",
            config.large_txn_ratio * 100.0,
            large_transaction_groups.join(", ")
        ));
    }

    let text = if parts.is_empty() {
        NO_PATTERNS.to_string()
    } else {
        parts.join("\n")
    };

    Summary {
        recurring_notice,
        top_increases,
        top_decreases,
        significant_increases,
        significant_decreases,
        large_transaction_groups,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::recurrence::{change_label, round2};
    use crate::models::MonthKey;

    fn trend(desc: &str, month: u32, raw: Option<f64>) -> TrendRow {
        let rounded = raw.map(round2);
        TrendRow {
            description: desc.to_string(),
            month: MonthKey { year: 2024, month },
            count: 1,
            prev_count: raw.map(|_| 1),
            pct_change: rounded,
            change_label: change_label(rounded),
            raw_pct: raw,
        }
    }

    fn flag(category: &str, flagged: bool) -> LargeTxnRow {
        LargeTxnRow {
            month: MonthKey { year: 2024, month: 2 },
            category: category.to_string(),
            subcategory: "Sub".to_string(),
            ratio: if flagged { 0.9 } else { 0.2 },
            flagged,
        }
    }

    #[test]
    fn test_empty_inputs_yield_sentinel() {
        let s = summarize(&BTreeSet::new(), &[], &[], &AnalysisConfig::default());
        assert_eq!(s.text, NO_PATTERNS);
        assert!(s.top_increases.is_empty());
        assert!(s.top_decreases.is_empty());
        assert!(s.large_transaction_groups.is_empty());
        assert!(s.recurring_notice.starts_with("No recurring transaction details found"));
    }

    #[test]
    fn test_top_movers_ranked_and_truncated() {
        let trends = vec![
            trend("A", 2, Some(20.0)),
            trend("B", 2, Some(300.0)),
            trend("C", 2, Some(75.0)),
            trend("D", 2, Some(-10.0)),
            trend("E", 2, Some(-80.0)),
            trend("F", 1, None),
        ];
        let config = AnalysisConfig {
            top_n: 2,
            ..AnalysisConfig::default()
        };
        let s = summarize(&BTreeSet::new(), &trends, &[], &config);
        let inc: Vec<&str> = s.top_increases.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(inc, vec!["B", "C"]);
        let dec: Vec<&str> = s.top_decreases.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(dec, vec!["E", "D"]);
    }

    #[test]
    fn test_significance_uses_unrounded_value() {
        // 49.996 displays as 50.0 but stays below the threshold.
        let trends = vec![trend("EDGE", 2, Some(49.996)), trend("REAL", 2, Some(-50.0))];
        let s = summarize(&BTreeSet::new(), &trends, &[], &AnalysisConfig::default());
        assert_eq!(s.top_increases[0].pct_change, Some(50.0));
        assert!(s.significant_increases.is_empty());
        assert_eq!(s.significant_decreases, vec!["REAL"]);
    }

    #[test]
    fn test_significant_descriptions_are_deduplicated() {
        let trends = vec![
            trend("GYM", 2, Some(100.0)),
            trend("GYM", 3, Some(200.0)),
            trend("GYM", 4, Some(-75.0)),
        ];
        let s = summarize(&BTreeSet::new(), &trends, &[], &AnalysisConfig::default());
        assert_eq!(s.significant_increases, vec!["GYM"]);
        assert_eq!(s.significant_decreases, vec!["GYM"]);
    }

    #[test]
    fn test_large_groups_rendered() {
        let large = vec![flag("Travel", true), flag("Food", false)];
        let s = summarize(&BTreeSet::new(), &[], &large, &AnalysisConfig::default());
        assert_eq!(s.large_transaction_groups, vec!["2024-02 - Travel/Sub"]);
        assert!(s.text.contains("Large single txn"));
        assert!(s.text.ends_with("2024-02 - Travel/Sub"));
    }

    #[test]
    fn test_text_concatenates_fragments_in_order() {
        let recurring: BTreeSet<String> = ["RENT".to_string()].into_iter().collect();
        let trends = vec![trend("RENT", 2, Some(100.0))];
        let large = vec![flag("Housing", true)];
        let s = summarize(&recurring, &trends, &large, &AnalysisConfig::default());
        let lines: Vec<&str> = s.text.lines().collect();
        assert_eq!(lines[0], "Recurring transactions found for details: {'RENT'}.");
        assert!(lines[1].starts_with("Largest month-over-month increases"));
        assert!(lines[1].contains("'RENT' in 2024-02 (100.0% inc)"));
        assert_eq!(
            lines[2],
            "Significant (\u{2265}50%) increases for recurring details: {'RENT'}."
        );
        assert!(lines[3].starts_with("Large single txn (\u{2265}50% of group total)"));
        assert_eq!(lines[4], "2024-02 - Housing/Sub");
        assert_eq!(
            s.recurring_notice,
            "Recurring Transaction Details (Set Notation): {'RENT'}"
        );
    }
}
