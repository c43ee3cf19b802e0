//! Pass/fail aggregates over stored reports
//!
//! Only reports that carry an analysis count towards score and pass rate;
//! `total` counts everything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data_model::{Report, TestStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: usize,
    pub analyzed: usize,
    /// Mean quality score of analysed reports
    pub average_score: f64,
    /// Share of analysed reports whose 28-day status is Pass, in percent
    pub pass_rate: f64,
    pub passed: usize,
    pub failed: usize,
    /// Mean quality score per client name
    pub client_scores: BTreeMap<String, f64>,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut stats = ReportStats {
            total: reports.len(),
            ..Self::default()
        };

        // Imported scores are not range-checked, so sums stay in f64.
        let mut score_sum = 0f64;
        let mut per_client: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for report in reports {
            let Some(analysis) = &report.analysis else {
                continue;
            };
            stats.analyzed += 1;
            score_sum += analysis.quality_score as f64;

            match analysis.twenty_eight_days_results.status {
                TestStatus::Pass => stats.passed += 1,
                TestStatus::Fail => stats.failed += 1,
                TestStatus::NotAvailable => {}
            }

            if !report.client_name.is_empty() && analysis.quality_score != 0 {
                let entry = per_client.entry(report.client_name.as_str()).or_default();
                entry.0 += analysis.quality_score as f64;
                entry.1 += 1;
            }
        }

        if stats.analyzed > 0 {
            stats.average_score = score_sum / stats.analyzed as f64;
            stats.pass_rate = stats.passed as f64 / stats.analyzed as f64 * 100.0;
        }
        stats.client_scores = per_client
            .into_iter()
            .map(|(client, (sum, n))| (client.to_string(), sum / n as f64))
            .collect();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{ReportAnalysis, TestResults};

    fn analysed(client: &str, score: i64, status: TestStatus) -> Report {
        let mut r = Report::new(format!("{client}-{score}"));
        r.client_name = client.to_string();
        r.analysis = Some(ReportAnalysis {
            quality_score: score,
            twenty_eight_days_results: TestResults {
                strengths: vec![],
                average_strength: 31.0,
                status,
            },
            ..ReportAnalysis::default()
        });
        r
    }

    #[test]
    fn test_empty() {
        let stats = ReportStats::from_reports(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pass_rate, 0.0);
    }

    #[test]
    fn test_aggregates() {
        let reports = vec![
            analysed("Acme", 90, TestStatus::Pass),
            analysed("Acme", 70, TestStatus::Fail),
            analysed("Build Co", 80, TestStatus::Pass),
            Report::new("draft"),
        ];
        let stats = ReportStats::from_reports(&reports);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.analyzed, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert!((stats.average_score - 80.0).abs() < 1e-9);
        assert!((stats.pass_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.client_scores["Acme"], 80.0);
        assert_eq!(stats.client_scores["Build Co"], 80.0);
    }

    #[test]
    fn test_saturated_scores_do_not_overflow() {
        let huge = (1e30f64).round() as i64;
        let reports = vec![
            analysed("Acme", huge, TestStatus::Pass),
            analysed("Acme", huge, TestStatus::Pass),
        ];
        let stats = ReportStats::from_reports(&reports);

        assert_eq!(stats.analyzed, 2);
        assert!(stats.average_score.is_finite());
        assert!((stats.average_score - i64::MAX as f64).abs() <= 1.0e4);
        assert_eq!(stats.client_scores["Acme"], stats.average_score);
    }
}
