//! Row → Report coercion
use cqr_core::{
    parse_number_or_zero, CubeSize, MixType, Period, Report, ReportAnalysis, SiteOrPlant,
    TestResults, TestStatus,
};
use cqr_seal::{fingerprint, HashAlgorithm};
use std::fmt;

use crate::aliases;
use crate::normalizer::{cell_date, cell_instant, CellValue};
use crate::sheet::SheetRow;

/// Why a non-blank row produced no report
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    MissingKey { row: usize },
    Invalid { row: usize, message: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingKey { row } => write!(
                f,
                "Skipping row {row}: Missing a unique identifier column (e.g., 'Unique Ref. No.', 'Ticket No.', 'ID')."
            ),
            Self::Invalid { row, message } => write!(f, "Error processing row {row}: {message}"),
        }
    }
}

/// Build a report from one non-blank row.
pub fn report_from_row(row: &SheetRow, algorithm: HashAlgorithm) -> Result<Report, RowError> {
    let unique_ref_no = row.text(aliases::UNIQUE_REF);
    if unique_ref_no.is_empty() {
        return Err(RowError::MissingKey { row: row.number });
    }
    let invalid = |message: String| RowError::Invalid {
        row: row.number,
        message,
    };

    let mut report = Report::new(unique_ref_no);
    report.client_name = row.text(aliases::CLIENT_NAME);
    report.site_or_plant = SiteOrPlant::parse_lenient(&row.text(aliases::SITE_OR_PLANT));
    report.grade = row.text(aliases::GRADE);
    report.mix_code = row.text(aliases::MIX_CODE);
    report.ft_name = row.text(aliases::FT_NAME);
    report.mix_type = MixType::parse_lenient(&row.text(aliases::MIX_TYPE));
    report.cube_size = row
        .text(aliases::CUBE_SIZE)
        .parse::<CubeSize>()
        .map_err(invalid)?;
    report.opc = row.text(aliases::OPC);
    report.flyash = row.text(aliases::FLYASH);
    report.ppc = row.text(aliases::PPC);
    report.observations = row.text(aliases::OBSERVATIONS);

    for period in Period::ALL {
        let batch = report.batch_mut(period);
        for i in 0..3 {
            batch.weights[i] = row.text(&aliases::measurement(period, "weight", i));
            batch.loads[i] = row.text(&aliases::measurement(period, "load", i));
        }
    }

    // Target test dates always follow the casting date, never a sheet column.
    if let Some(casting) = row.lookup(aliases::DATE_OF_CASTING).and_then(cell_date) {
        report.set_casting_date(casting);
    }

    report.analysis = analysis_from_row(row);

    let timestamp = row.lookup(aliases::GENERATED_AT).and_then(cell_instant);
    let hash = row
        .lookup(aliases::VERIFICATION_HASH)
        .map(CellValue::trimmed)
        .filter(|h| is_hex_digest(h))
        .map(|h| h.to_lowercase());

    match (timestamp, hash) {
        (Some(ts), Some(hash)) => {
            report.timestamp = Some(ts);
            report.hash = Some(hash);
        }
        (Some(ts), None) => {
            report.timestamp = Some(ts);
            report.hash = Some(fingerprint(&report, algorithm));
            tracing::debug!(row = row.number, unique_ref = %report.unique_ref_no, "fingerprint computed for unhashed row");
        }
        (None, Some(_)) => {
            tracing::warn!(row = row.number, unique_ref = %report.unique_ref_no, "hash without generated-at instant dropped");
        }
        (None, None) => {}
    }

    Ok(report)
}

/// Rebuild the flattened analysis columns, if the row carries a score.
fn analysis_from_row(row: &SheetRow) -> Option<ReportAnalysis> {
    let score = row.lookup(aliases::QUALITY_SCORE)?;
    if score.trimmed().eq_ignore_ascii_case("n/a") {
        return None;
    }

    let results = |period: Period| TestResults {
        strengths: Vec::new(),
        average_strength: row
            .lookup(&aliases::average_strength(period))
            .map(number_of)
            .unwrap_or(0.0),
        status: TestStatus::normalize(&row.text(&aliases::status(period))),
    };

    Some(ReportAnalysis {
        summary: row.text(aliases::SUMMARY),
        quality_score: number_of(score).round() as i64,
        seven_days_results: results(Period::SevenDays),
        twenty_eight_days_results: results(Period::TwentyEightDays),
        issues: split_list(&row.text(aliases::ISSUES)),
        recommendations: split_list(&row.text(aliases::RECOMMENDATIONS)),
    })
}

fn number_of(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        other => parse_number_or_zero(&other.as_text()),
    }
}

/// `"; "`-joined list; the exporter's `None` placeholder reads back as empty.
fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() || raw == "None" {
        return Vec::new();
    }
    raw.split("; ").map(str::to_string).collect()
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}
