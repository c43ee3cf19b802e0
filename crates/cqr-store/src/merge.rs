//! Key-based upsert and bulk merge over an ordered report list.
//!
//! Order convention: index 0 is the most recently added entry.
use cqr_core::Report;
use std::collections::HashMap;

/// Replace the entry with the same key in place, or insert at the front.
pub fn upsert(reports: &mut Vec<Report>, report: Report) {
    match reports
        .iter()
        .position(|r| r.unique_ref_no == report.unique_ref_no)
    {
        Some(i) => reports[i] = report,
        None => reports.insert(0, report),
    }
}

/// Overlay `incoming` onto `existing` by key.
///
/// Existing keys are replaced in place. New keys go in front, in the order
/// they first appear in `incoming`. Within `incoming` the last duplicate wins.
pub fn merge(existing: Vec<Report>, incoming: Vec<Report>) -> Vec<Report> {
    let mut latest: HashMap<String, Report> = HashMap::new();
    let mut new_keys: Vec<String> = Vec::new();
    let known: std::collections::HashSet<&str> =
        existing.iter().map(|r| r.unique_ref_no.as_str()).collect();

    for report in incoming {
        if !known.contains(report.unique_ref_no.as_str()) && !latest.contains_key(&report.unique_ref_no) {
            new_keys.push(report.unique_ref_no.clone());
        }
        latest.insert(report.unique_ref_no.clone(), report);
    }

    let mut merged: Vec<Report> = new_keys
        .iter()
        .filter_map(|key| latest.remove(key))
        .collect();
    merged.extend(
        existing
            .into_iter()
            .map(|r| latest.remove(&r.unique_ref_no).unwrap_or(r)),
    );
    merged
}
