//! List-view rows and display ordering
use serde::{Deserialize, Serialize};

use crate::data_model::{Period, Report};

/// One row of the report list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub unique_ref_no: String,
    pub client_name: String,
    pub date_of_casting: String,
    pub grade: String,
    pub seven_day_strength: f64,
    pub twenty_eight_day_strength: f64,
    pub quality_score: Option<i64>,
    pub sealed: bool,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            unique_ref_no: report.unique_ref_no.clone(),
            client_name: report.client_name.clone(),
            date_of_casting: report.date_of_casting.clone(),
            grade: report.grade.clone(),
            seven_day_strength: report.average_strength(Period::SevenDays),
            twenty_eight_day_strength: report.average_strength(Period::TwentyEightDays),
            quality_score: report.analysis.as_ref().map(|a| a.quality_score),
            sealed: report.is_sealed(),
        }
    }
}

/// Newest `timestamp` first; unsealed reports sink to the bottom in their
/// existing relative order.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
