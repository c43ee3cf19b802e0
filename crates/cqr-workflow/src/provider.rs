//! Analysis collaborator seam
use async_trait::async_trait;
use cqr_core::{Report, ReportAnalysis};

use crate::AnalysisError;

/// Produces the structured analysis text for a report's raw form fields.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// JSON text expected to match the `ReportAnalysis` shape.
    async fn generate_report(&self, report: &Report) -> Result<String, AnalysisError>;

    fn name(&self) -> &str;
}

/// Stand-in when no collaborator is configured: every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

#[async_trait]
impl AnalysisProvider for DisabledProvider {
    async fn generate_report(&self, _report: &Report) -> Result<String, AnalysisError> {
        Err(AnalysisError::MissingApiKey)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Parse collaborator output; anything that is not the expected shape fails.
pub fn parse_analysis(text: &str) -> Result<ReportAnalysis, AnalysisError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqr_core::TestStatus;

    #[test]
    fn test_parse_full_analysis() {
        let text = r#"{
            "summary": "Meets M30 at 7 days.",
            "qualityScore": 86,
            "sevenDaysResults": {"strengths": [20.0, 20.67, 20.22], "averageStrength": 20.3, "status": "Pass"},
            "twentyEightDaysResults": {"strengths": [0, 0, 0], "averageStrength": 0, "status": "N/A"},
            "issues": [],
            "recommendations": ["Test 28-day cubes on schedule"]
        }"#;
        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.quality_score, 86);
        assert_eq!(analysis.seven_days_results.status, TestStatus::Pass);
        assert_eq!(analysis.twenty_eight_days_results.status, TestStatus::NotAvailable);
        assert_eq!(analysis.recommendations.len(), 1);
    }

    #[test]
    fn test_schema_violations_rejected() {
        assert!(matches!(parse_analysis("  "), Err(AnalysisError::EmptyResponse)));
        assert!(matches!(
            parse_analysis("Sure! Here is your report."),
            Err(AnalysisError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"summary": "x", "qualityScore": "high"}"#),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }
}
