use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::models::{MonthKey, Transaction};

// ---------------------------------------------------------------------------
// Recurrence detection
// ---------------------------------------------------------------------------

/// Descriptions seen in strictly more than `min_months` distinct months.
pub fn detect_recurring(txns: &[Transaction], min_months: usize) -> BTreeSet<String> {
    let mut months_by_desc: BTreeMap<&str, BTreeSet<MonthKey>> = BTreeMap::new();
    for t in txns {
        months_by_desc
            .entry(t.description.as_str())
            .or_default()
            .insert(t.month);
    }
    let recurring: BTreeSet<String> = months_by_desc
        .into_iter()
        .filter(|(_, months)| months.len() > min_months)
        .map(|(desc, _)| desc.to_string())
        .collect();
    debug!(recurring = recurring.len(), "recurring descriptions");
    recurring
}

// ---------------------------------------------------------------------------
// Month-over-month trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub description: String,
    pub month: MonthKey,
    pub count: usize,
    pub prev_count: Option<usize>,
    /// Rounded to two decimals; `None` for a first month or a zero base.
    pub pct_change: Option<f64>,
    pub change_label: String,
    #[serde(skip)]
    pub(crate) raw_pct: Option<f64>,
}

/// Round half away from zero to two decimals. Negative zero folds to zero.
pub fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

pub fn pct_change(count: usize, prev: Option<usize>) -> Option<f64> {
    match prev {
        Some(p) if p != 0 => Some((count as f64 - p as f64) / p as f64 * 100.0),
        _ => None,
    }
}

pub fn change_label(pct: Option<f64>) -> String {
    match pct {
        None => String::new(),
        Some(p) if p > 0.0 => format!("{p:?}% inc"),
        Some(p) if p < 0.0 => format!("{:?}% dec", p.abs()),
        Some(_) => "0%".to_string(),
    }
}

/// Per-month occurrence counts for recurring descriptions, ordered by
/// `(description, month)`, each compared with the description's previous
/// month in its own series.
pub fn trends(txns: &[Transaction], recurring: &BTreeSet<String>) -> Vec<TrendRow> {
    let mut counts: BTreeMap<(&str, MonthKey), usize> = BTreeMap::new();
    for t in txns.iter().filter(|t| recurring.contains(&t.description)) {
        *counts.entry((t.description.as_str(), t.month)).or_default() += 1;
    }

    let mut rows = Vec::with_capacity(counts.len());
    let mut prev: Option<(&str, usize)> = None;
    for ((desc, month), count) in counts {
        let prev_count = match prev {
            Some((d, c)) if d == desc => Some(c),
            _ => None,
        };
        let raw = pct_change(count, prev_count);
        let rounded = raw.map(round2);
        rows.push(TrendRow {
            description: desc.to_string(),
            month,
            count,
            prev_count,
            pct_change: rounded,
            change_label: change_label(rounded),
            raw_pct: raw,
        });
        prev = Some((desc, count));
    }
    debug!(rows = rows.len(), "recurring trend rows");
    rows
}
