//! REST client for the Gemini `generateContent` endpoint.
//!
//! Sends the rendered prompt with a system instruction and a JSON response
//! schema, and returns the concatenated text parts of the first candidate.

use async_trait::async_trait;
use cqr_core::Report;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::prompt::PromptRenderer;
use crate::provider::AnalysisProvider;
use crate::AnalysisError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for one Gemini model.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    prompts: PromptRenderer,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiProvider {
    /// * `api_url` - Base URL without path, e.g. `https://generativelanguage.googleapis.com`.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, AnalysisError> {
        Self::with_client(reqwest::Client::new(), api_url, api_key, model)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, AnalysisError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            prompts: PromptRenderer::new()?,
        })
    }

    /// Request body for one report.
    pub fn request_body(&self, report: &Report) -> Result<Value, AnalysisError> {
        let prompt = self.prompts.analysis_prompt(&report.form_fields())?;
        let system = self.prompts.system_instruction(report.cube_size.as_str())?;
        Ok(json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": report_schema(),
            },
        }))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_url, self.model)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn generate_report(&self, report: &Report) -> Result<String, AnalysisError> {
        let body = self.request_body(report)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        tracing::debug!(unique_ref = %report.unique_ref_no, model = %self.model, len = text.len(), "analysis received");
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn test_results_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": {
                "type": "ARRAY",
                "description": "The calculated compressive strength for each of the 3 cubes in N/mm2.",
                "items": { "type": "NUMBER" },
            },
            "averageStrength": {
                "type": "NUMBER",
                "description": "The average of the three calculated strengths.",
            },
            "status": {
                "type": "STRING",
                "description": "The pass/fail status of the test based on the concrete grade requirements. Either \"Pass\" or \"Fail\".",
            },
        },
        "required": ["strengths", "averageStrength", "status"],
    })
}

/// Response schema mirroring `ReportAnalysis`.
pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A brief, one or two-sentence summary of the overall quality assessment of the concrete based on the tests.",
            },
            "qualityScore": {
                "type": "INTEGER",
                "description": "An overall quality score from 1 (very poor) to 100 (perfect), considering both 7 and 28-day results.",
            },
            "sevenDaysResults": test_results_schema(),
            "twentyEightDaysResults": test_results_schema(),
            "issues": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of specific issues, defects, or deviations found. If none, return an empty array.",
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of actionable recommendations for improvement or correction. If none, return an empty array.",
            },
        },
        "required": ["summary", "qualityScore", "sevenDaysResults", "twentyEightDaysResults", "issues", "recommendations"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            "http://localhost:9/".into(),
            "test-key".into(),
            DEFAULT_MODEL.into(),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = GeminiProvider::new(DEFAULT_BASE_URL.into(), " ".into(), DEFAULT_MODEL.into());
        assert!(matches!(err, Err(AnalysisError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            provider().endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let mut report = Report::new("R-1");
        report.grade = "M25".into();
        let body = provider().request_body(&report).unwrap();

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            6
        );
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Concrete Grade: M25"));
        let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.contains("150mm x 150mm"));
    }
}
