//! Prompt rendering for the analysis collaborator.
//!
//! Templates are Handlebars over the flat form-field map of a report, so the
//! model sees exactly what the operator typed. One helper is registered:
//! - or_default: value, or the fallback when null or blank
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::Value;

use crate::AnalysisError;

const ANALYSIS_PROMPT: &str = r#"Analyze the following concrete cube test data and generate a structured JSON response.

## Project Information
- Client Name: {{clientName}}
- Site/Plant: {{siteOrPlant}}
- Unique Reference No: {{uniqueRefNo}}
- Date of Casting: {{dateOfCasting}}

## Casting Details
- Concrete Grade: {{grade}}
- Mix Code: {{mixCode}}
- FT Name: {{ftName}}
- Mix Type: {{mixType}}
- Cube Size: {{cubeSize}} mm
- Mix Details: OPC={{or_default opc "0"}} kg, Flyash={{or_default flyash "0"}} kg, PPC={{or_default ppc "0"}} kg

## 7-Day Test Results
- Test Date: {{or_default sevenDaysTestDate "Not Provided"}}
- Cube 1: Weight={{or_default sevenDaysWeight1 "0"}} kg, Load={{or_default sevenDaysLoad1 "0"}} kN
- Cube 2: Weight={{or_default sevenDaysWeight2 "0"}} kg, Load={{or_default sevenDaysLoad2 "0"}} kN
- Cube 3: Weight={{or_default sevenDaysWeight3 "0"}} kg, Load={{or_default sevenDaysLoad3 "0"}} kN

## 28-Day Test Results
- Test Date: {{or_default twentyEightDaysTestDate "Not Provided"}}
- Cube 1: Weight={{or_default twentyEightDaysWeight1 "0"}} kg, Load={{or_default twentyEightDaysLoad1 "0"}} kN
- Cube 2: Weight={{or_default twentyEightDaysWeight2 "0"}} kg, Load={{or_default twentyEightDaysLoad2 "0"}} kN
- Cube 3: Weight={{or_default twentyEightDaysWeight3 "0"}} kg, Load={{or_default twentyEightDaysLoad3 "0"}} kN

## Additional Observations
{{or_default observations "None"}}
"#;

const SYSTEM_INSTRUCTION: &str = "You are an expert Civil Engineer specializing in concrete quality control. \
Your task is to analyze the provided concrete cube testing data. \
Assume a cube size of {{size}}mm x {{size}}mm. \
Calculate the compressive strength for each cube using the formula: Strength (N/mm²) = (Load (kN) * 1000) / ({{size}} * {{size}}). \
Calculate the average strength for both 7-day and 28-day tests. \
If test data (load) for a period is not provided or is zero, return zero for strengths and average, and 'N/A' for status. \
Determine if the concrete passes, based on standard criteria for the specified grade \
(e.g., for 7-day test, strength should be at least 67% of characteristic strength; \
for 28-day, it should meet or exceed the characteristic strength, which is the number in the grade, e.g., 25 N/mm² for M25). \
Also consider the provided mix details in your analysis for any recommendations. \
Provide a professional analysis including a summary, a quality score out of 100, the detailed test results, \
identified issues (if any), and actionable recommendations. \
The tone should be objective and formal. Generate the response in the specified JSON format.";

handlebars_helper!(or_default: |value: Json, fallback: str| {
    match value {
        Value::Null => fallback.to_string(),
        Value::String(s) if s.trim().is_empty() => fallback.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
});

/// Compiled analysis templates
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, AnalysisError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("or_default", Box::new(or_default));
        handlebars
            .register_template_string("analysis_prompt", ANALYSIS_PROMPT)
            .map_err(|e| AnalysisError::Prompt(e.to_string()))?;
        handlebars
            .register_template_string("system_instruction", SYSTEM_INSTRUCTION)
            .map_err(|e| AnalysisError::Prompt(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// User prompt over the raw form fields.
    pub fn analysis_prompt(&self, fields: &serde_json::Map<String, Value>) -> Result<String, AnalysisError> {
        self.handlebars
            .render("analysis_prompt", fields)
            .map_err(|e| AnalysisError::Prompt(e.to_string()))
    }

    /// System instruction for a given cube edge (empty means 150).
    pub fn system_instruction(&self, cube_size: &str) -> Result<String, AnalysisError> {
        let size = if cube_size.trim().is_empty() { "150" } else { cube_size.trim() };
        self.handlebars
            .render("system_instruction", &serde_json::json!({ "size": size }))
            .map_err(|e| AnalysisError::Prompt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqr_core::Report;

    #[test]
    fn test_prompt_uses_form_values_and_fallbacks() {
        let mut report = Report::new("2024-08-01-1");
        report.client_name = "Future Homes LLC".into();
        report.grade = "M30".into();
        report.seven_days.loads[0] = "450".into();

        let prompt = PromptRenderer::new()
            .unwrap()
            .analysis_prompt(&report.form_fields())
            .unwrap();

        assert!(prompt.contains("- Client Name: Future Homes LLC"));
        assert!(prompt.contains("- Cube Size: 150 mm"));
        assert!(prompt.contains("Cube 1: Weight=0 kg, Load=450 kN"));
        assert!(prompt.contains("- Test Date: Not Provided"));
        assert!(prompt.trim_end().ends_with("None"));
    }

    #[test]
    fn test_prompt_is_not_html_escaped() {
        let mut report = Report::new("R-1");
        report.observations = "Slump < 75mm & bleeding".into();
        let prompt = PromptRenderer::new()
            .unwrap()
            .analysis_prompt(&report.form_fields())
            .unwrap();
        assert!(prompt.contains("Slump < 75mm & bleeding"));
    }

    #[test]
    fn test_system_instruction_cube_size() {
        let renderer = PromptRenderer::new().unwrap();
        assert!(renderer.system_instruction("100").unwrap().contains("(100 * 100)"));
        assert!(renderer.system_instruction("").unwrap().contains("150mm x 150mm"));
    }
}
