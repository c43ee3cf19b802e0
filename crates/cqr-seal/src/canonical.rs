//! Canonical form used for hashing
//!
//! Volatile metadata and binary attachments are dropped, keys are ordered by
//! code point at every nesting level, and the result is compact JSON.
use cqr_core::Report;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fields never covered by the fingerprint
pub fn is_excluded_field(name: &str) -> bool {
    name == "hash"
        || name == "timestamp"
        || name == "signedReportPdf"
        || name.ends_with("Blob")
        || name.ends_with("Media")
}

/// Canonical string of a field mapping. Never fails.
pub fn canonical_string(fields: &Map<String, Value>) -> String {
    // serde_json's Map may preserve insertion order depending on features,
    // so ordering is rebuilt here rather than inherited.
    let sorted: BTreeMap<&str, Sorted<'_>> = fields
        .iter()
        .filter(|(k, _)| !is_excluded_field(k))
        .map(|(k, v)| (k.as_str(), Sorted(v)))
        .collect();
    serde_json::to_string(&sorted).unwrap_or_default()
}

/// Canonical string of a report's flat form fields.
pub fn canonical_report_string(report: &Report) -> String {
    canonical_string(&report.form_fields())
}

struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let sorted: BTreeMap<&str, Sorted<'_>> =
                    map.iter().map(|(k, v)| (k.as_str(), Sorted(v))).collect();
                sorted.serialize(serializer)
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(Sorted)),
            other => other.serialize(serializer),
        }
    }
}
