//! Data Model: Report, TestBatch, ReportAnalysis, TestResults
use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::strength::{average_positive, compressive_strength};

/// Where the cubes were cast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteOrPlant {
    #[default]
    Site,
    Plant,
}

impl SiteOrPlant {
    /// `Plant` only for an explicit "plant"; everything else is `Site`.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("plant") {
            Self::Plant
        } else {
            Self::Site
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Plant => "Plant",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixType {
    #[default]
    Standard,
    Customer,
}

impl MixType {
    /// `Customer` only for an explicit "customer"; everything else is `Standard`.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("customer") {
            Self::Customer
        } else {
            Self::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Customer => "Customer",
        }
    }
}

/// Cube edge length in millimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CubeSize {
    #[serde(rename = "100")]
    Mm100,
    #[default]
    #[serde(rename = "150")]
    Mm150,
}

impl CubeSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mm100 => "100",
            Self::Mm150 => "150",
        }
    }

    pub fn edge_mm(&self) -> f64 {
        match self {
            Self::Mm100 => 100.0,
            Self::Mm150 => 150.0,
        }
    }
}

impl fmt::Display for CubeSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CubeSize {
    type Err = String;

    /// Accepts `100`, `150` (also as `150.0` from numeric cells); empty means 150.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Mm150);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v == 100.0 => Ok(Self::Mm100),
            Ok(v) if v == 150.0 => Ok(Self::Mm150),
            _ => Err(format!("unsupported cube size '{}' (expected 100 or 150)", trimmed)),
        }
    }
}

/// Curing period of a test batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    SevenDays,
    TwentyEightDays,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::SevenDays, Period::TwentyEightDays];

    pub fn days(&self) -> u64 {
        match self {
            Self::SevenDays => 7,
            Self::TwentyEightDays => 28,
        }
    }

    /// Prefix of the flat form-field names (`sevenDaysLoad1`, ...)
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Self::SevenDays => "sevenDays",
            Self::TwentyEightDays => "twentyEightDays",
        }
    }

    /// Human label used in spreadsheet headers (`7-Day Load 1`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::SevenDays => "7-Day",
            Self::TwentyEightDays => "28-Day",
        }
    }

    /// Target test date for a casting date.
    pub fn target_date(&self, casting: NaiveDate) -> Option<NaiveDate> {
        casting.checked_add_days(Days::new(self.days()))
    }
}

/// Opaque binary attachment (CTM photo/video, signed PDF)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBlob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    fn descriptor(&self) -> Value {
        json!({ "mime": self.mime, "size": self.bytes.len() })
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Three (weight, load) pairs for one curing period.
///
/// Values are kept as typed by the operator; weights in kg, loads in kN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestBatch {
    #[serde(default)]
    pub test_date: String,
    #[serde(default)]
    pub weights: [String; 3],
    #[serde(default)]
    pub loads: [String; 3],
    /// Persisted through the store's blob codec, never inline.
    #[serde(skip)]
    pub media: Option<MediaBlob>,
}

impl TestBatch {
    pub fn strengths(&self, cube_size: CubeSize) -> [f64; 3] {
        let edge = cube_size.as_str();
        [
            compressive_strength(&self.loads[0], edge),
            compressive_strength(&self.loads[1], edge),
            compressive_strength(&self.loads[2], edge),
        ]
    }

    pub fn average_strength(&self, cube_size: CubeSize) -> f64 {
        average_positive(&self.strengths(cube_size))
    }

    /// Results derived purely from the raw loads. Status is left `N/A`:
    /// pass/fail depends on grade criteria only the analysis applies.
    pub fn derived_results(&self, cube_size: CubeSize) -> TestResults {
        let strengths = self.strengths(cube_size);
        TestResults {
            strengths: strengths.to_vec(),
            average_strength: average_positive(&strengths),
            status: TestStatus::NotAvailable,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Pass,
    Fail,
    #[default]
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl TestStatus {
    /// Case-insensitive `pass`/`fail`; anything else is `N/A`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            _ => Self::NotAvailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::NotAvailable => "N/A",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    #[serde(default)]
    pub strengths: Vec<f64>,
    pub average_strength: f64,
    pub status: TestStatus,
}

/// Structured assessment returned by the AI collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    pub summary: String,
    pub quality_score: i64,
    pub seven_days_results: TestResults,
    pub twenty_eight_days_results: TestResults,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ReportAnalysis {
    pub fn results(&self, period: Period) -> &TestResults {
        match period {
            Period::SevenDays => &self.seven_days_results,
            Period::TwentyEightDays => &self.twenty_eight_days_results,
        }
    }
}

/// One concrete-cube test report, keyed by `unique_ref_no`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub unique_ref_no: String,

    // Project
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub site_or_plant: SiteOrPlant,
    /// `YYYY-MM-DD` or empty
    #[serde(default)]
    pub date_of_casting: String,

    // Mix
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub mix_code: String,
    #[serde(default)]
    pub ft_name: String,
    #[serde(default)]
    pub mix_type: MixType,
    #[serde(default)]
    pub cube_size: CubeSize,
    #[serde(default)]
    pub opc: String,
    #[serde(default)]
    pub flyash: String,
    #[serde(default)]
    pub ppc: String,

    #[serde(default)]
    pub seven_days: TestBatch,
    #[serde(default)]
    pub twenty_eight_days: TestBatch,

    #[serde(default)]
    pub observations: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ReportAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(skip)]
    pub signed_report_pdf: Option<MediaBlob>,
}

impl Report {
    pub fn new(unique_ref_no: impl Into<String>) -> Self {
        Self {
            unique_ref_no: unique_ref_no.into(),
            ..Self::default()
        }
    }

    pub fn batch(&self, period: Period) -> &TestBatch {
        match period {
            Period::SevenDays => &self.seven_days,
            Period::TwentyEightDays => &self.twenty_eight_days,
        }
    }

    pub fn batch_mut(&mut self, period: Period) -> &mut TestBatch {
        match period {
            Period::SevenDays => &mut self.seven_days,
            Period::TwentyEightDays => &mut self.twenty_eight_days,
        }
    }

    /// Set the casting date and recompute both target test dates from it.
    pub fn set_casting_date(&mut self, casting: NaiveDate) {
        self.date_of_casting = casting.format("%Y-%m-%d").to_string();
        for period in Period::ALL {
            self.batch_mut(period).test_date = period
                .target_date(casting)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
        }
    }

    pub fn casting_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_of_casting.trim(), "%Y-%m-%d").ok()
    }

    /// Average strength for display: the analysis figure when present,
    /// otherwise recomputed from the raw loads.
    pub fn average_strength(&self, period: Period) -> f64 {
        match &self.analysis {
            Some(analysis) => analysis.results(period).average_strength,
            None => self.batch(period).average_strength(self.cube_size),
        }
    }

    /// `timestamp` and `hash` are attached together or not at all.
    pub fn is_sealed(&self) -> bool {
        self.timestamp.is_some() && self.hash.is_some()
    }

    /// Drop the seal so the report can be resubmitted.
    pub fn clear_seal(&mut self) {
        self.timestamp = None;
        self.hash = None;
    }

    /// Flat field-name → value mapping of the report, the shape the form,
    /// the canonicalizer and the AI prompt all work with.
    ///
    /// Attachments appear as `{mime, size}` descriptors under their `*Blob`
    /// names; absent optionals are omitted.
    pub fn form_fields(&self) -> Map<String, Value> {
        let mut m = Map::new();
        let mut put = |k: &str, v: Value| {
            m.insert(k.to_string(), v);
        };

        put("uniqueRefNo", json!(self.unique_ref_no));
        put("clientName", json!(self.client_name));
        put("siteOrPlant", json!(self.site_or_plant.as_str()));
        put("dateOfCasting", json!(self.date_of_casting));
        put("grade", json!(self.grade));
        put("mixCode", json!(self.mix_code));
        put("ftName", json!(self.ft_name));
        put("mixType", json!(self.mix_type.as_str()));
        put("cubeSize", json!(self.cube_size.as_str()));
        put("opc", json!(self.opc));
        put("flyash", json!(self.flyash));
        put("ppc", json!(self.ppc));

        for period in Period::ALL {
            let batch = self.batch(period);
            let prefix = period.field_prefix();
            put(&format!("{prefix}TestDate"), json!(batch.test_date));
            for i in 0..3 {
                put(&format!("{prefix}Weight{}", i + 1), json!(batch.weights[i]));
                put(&format!("{prefix}Load{}", i + 1), json!(batch.loads[i]));
            }
            if let Some(media) = &batch.media {
                put(&format!("{prefix}CtmMediaBlob"), media.descriptor());
            }
        }

        put("observations", json!(self.observations));

        if let Some(analysis) = &self.analysis {
            put("analysis", serde_json::to_value(analysis).unwrap_or(Value::Null));
        }
        if let Some(ts) = &self.timestamp {
            put("timestamp", json!(iso_instant(ts)));
        }
        if let Some(hash) = &self.hash {
            put("hash", json!(hash));
        }
        if let Some(pdf) = &self.signed_report_pdf {
            put("signedReportPdfBlob", pdf.descriptor());
        }
        m
    }
}

/// ISO-8601 instant with millisecond precision and `Z` suffix.
pub fn iso_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
