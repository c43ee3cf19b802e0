//! Header alias tables.
//!
//! Headers are matched after trimming and lowercasing. For each field the
//! first alias whose cell holds a value wins, so spreadsheets produced by
//! differently-versioned tools with renamed columns still import.

use cqr_core::Period;

pub const UNIQUE_REF: &[&str] = &[
    "unique ref. no.",
    "unique reference no.",
    "ticket / docket no.",
    "ticket no.",
    "docket no.",
    "ref no",
    "id",
];

pub const CLIENT_NAME: &[&str] = &["client name", "client"];
pub const SITE_OR_PLANT: &[&str] = &["site / plant", "site/plant"];
pub const DATE_OF_CASTING: &[&str] = &["date of casting", "casting date"];
pub const GRADE: &[&str] = &["grade"];
pub const MIX_CODE: &[&str] = &["mix code"];
pub const FT_NAME: &[&str] = &[
    "ft name",
    "ftname",
    "field technician",
    "technician name",
    "technician",
];
pub const MIX_TYPE: &[&str] = &["mix type"];
pub const CUBE_SIZE: &[&str] = &["cube size (mm)", "cube size"];
pub const OPC: &[&str] = &["opc (kg)", "opc"];
pub const FLYASH: &[&str] = &["flyash (kg)", "flyash"];
pub const PPC: &[&str] = &["ppc (kg)", "ppc"];
pub const OBSERVATIONS: &[&str] = &["observations"];

pub const GENERATED_AT: &[&str] = &["generated at"];
pub const VERIFICATION_HASH: &[&str] = &["verification hash"];
pub const QUALITY_SCORE: &[&str] = &["overall quality score"];
pub const SUMMARY: &[&str] = &["summary"];
pub const ISSUES: &[&str] = &["issues"];
pub const RECOMMENDATIONS: &[&str] = &["recommendations"];

/// `7-day weight 1` .. `28-day load 3`
pub fn measurement(period: Period, kind: &str, index: usize) -> [String; 1] {
    [format!("{} {} {}", period.label().to_lowercase(), kind, index + 1)]
}

pub fn average_strength(period: Period) -> [String; 2] {
    let label = period.label().to_lowercase();
    [
        format!("{label} avg strength (n/mm²)"),
        format!("{label} avg strength"),
    ]
}

pub fn status(period: Period) -> [String; 1] {
    [format!("{} status", period.label().to_lowercase())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_aliases_match_export_labels() {
        assert_eq!(measurement(Period::SevenDays, "load", 0), ["7-day load 1"]);
        assert_eq!(measurement(Period::TwentyEightDays, "weight", 2), ["28-day weight 3"]);
        assert_eq!(average_strength(Period::SevenDays)[0], "7-day avg strength (n/mm²)");
        assert_eq!(status(Period::TwentyEightDays), ["28-day status"]);
    }

    #[test]
    fn test_aliases_are_normalized() {
        for table in [UNIQUE_REF, CLIENT_NAME, FT_NAME, CUBE_SIZE, GENERATED_AT] {
            for alias in table {
                assert_eq!(*alias, alias.trim().to_lowercase());
            }
        }
    }
}
