//! Canonical ordering of provider output.

use chrono::NaiveDate;

use crate::domain::Bar;

/// Sort by date, drop bars outside `[start, end]`, and keep only the last
/// record seen for any repeated date.
pub fn canonicalize(mut bars: Vec<Bar>, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    bars.retain(|b| b.date >= start && b.date <= end);
    // Stable sort keeps source order within a date, so "last" means last delivered.
    bars.sort_by_key(|b| b.date);

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}
