//! Export column set.
//!
//! Headers double as import aliases once lowercased, so a full export
//! re-imports without losing business fields or the analysis block.

use cqr_core::data_model::iso_instant;
use cqr_core::{Period, Report, TestResults};

/// One exported cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellOut {
    Text(String),
    Number(f64),
}

impl CellOut {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Display length used for column auto-sizing.
    pub fn display_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Number(n) => n.to_string().len(),
        }
    }
}

const NOT_AVAILABLE: &str = "N/A";
const NO_SUMMARY: &str = "No analysis available.";
const NO_ITEMS: &str = "None";

/// Header labels in export order.
pub fn headers() -> Vec<String> {
    let mut h: Vec<String> = [
        "Unique Ref. No.",
        "Client Name",
        "Site / Plant",
        "Date of Casting",
        "Grade",
        "Mix Code",
        "FT Name",
        "Mix Type",
        "Cube Size (mm)",
        "OPC (kg)",
        "Flyash (kg)",
        "PPC (kg)",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for period in Period::ALL {
        let label = period.label();
        for kind in ["Weight", "Load"] {
            for i in 1..=3 {
                h.push(format!("{label} {kind} {i}"));
            }
        }
    }

    h.push("Observations".into());
    h.push("Overall Quality Score".into());
    for period in Period::ALL {
        h.push(format!("{} Avg Strength (N/mm²)", period.label()));
        h.push(format!("{} Status", period.label()));
    }
    h.extend(
        ["Summary", "Issues", "Recommendations", "Generated At", "Verification Hash"]
            .iter()
            .map(|s| s.to_string()),
    );
    h
}

/// One report flattened in [`headers`] order.
pub fn row(report: &Report) -> Vec<CellOut> {
    let mut cells = vec![
        CellOut::text(&report.unique_ref_no),
        CellOut::text(&report.client_name),
        CellOut::text(report.site_or_plant.as_str()),
        CellOut::text(&report.date_of_casting),
        CellOut::text(&report.grade),
        CellOut::text(&report.mix_code),
        CellOut::text(&report.ft_name),
        CellOut::text(report.mix_type.as_str()),
        CellOut::text(report.cube_size.as_str()),
        CellOut::text(&report.opc),
        CellOut::text(&report.flyash),
        CellOut::text(&report.ppc),
    ];

    for period in Period::ALL {
        let batch = report.batch(period);
        cells.extend(batch.weights.iter().map(CellOut::text));
        cells.extend(batch.loads.iter().map(CellOut::text));
    }

    cells.push(CellOut::text(&report.observations));

    let analysis = report.analysis.as_ref();
    cells.push(match analysis {
        Some(a) => CellOut::Number(a.quality_score as f64),
        None => CellOut::text(NOT_AVAILABLE),
    });
    for period in Period::ALL {
        let results = analysis.map(|a| a.results(period));
        cells.push(CellOut::text(
            results.map(format_strength).unwrap_or_else(|| NOT_AVAILABLE.into()),
        ));
        cells.push(CellOut::text(
            results.map(|r| r.status.as_str()).unwrap_or(NOT_AVAILABLE),
        ));
    }

    cells.push(CellOut::text(
        analysis.map(|a| a.summary.as_str()).unwrap_or(NO_SUMMARY),
    ));
    cells.push(CellOut::text(join_items(analysis.map(|a| a.issues.as_slice()))));
    cells.push(CellOut::text(join_items(
        analysis.map(|a| a.recommendations.as_slice()),
    )));
    cells.push(CellOut::text(
        report.timestamp.as_ref().map(iso_instant).unwrap_or_default(),
    ));
    cells.push(CellOut::text(report.hash.clone().unwrap_or_default()));
    cells
}

fn format_strength(results: &TestResults) -> String {
    format!("{:.2}", results.average_strength)
}

fn join_items(items: Option<&[String]>) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join("; "),
        _ => NO_ITEMS.to_string(),
    }
}
