//! Compressive strength of a concrete cube.
//!
//! `strength = load (kN) * 1000 / edge (mm)^2`, in N/mm². Both inputs arrive as
//! raw form text. Anything that cannot be computed yields `0.0`, which callers
//! treat as "not computed" rather than a physical result.
//!
//! Numbers are read the way spreadsheet users type them: the leading numeric
//! part counts (`"450 kN"` is 450), anything without one is not a number.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
}

/// Strength for a single cube, or `0.0` when it cannot be computed.
pub fn compressive_strength(load: &str, edge_length: &str) -> f64 {
    let (Some(load), Some(edge)) = (parse_number(load), parse_number(edge_length)) else {
        return 0.0;
    };
    if load == 0.0 || edge == 0.0 {
        return 0.0;
    }
    (load * 1000.0) / (edge * edge)
}

/// Mean of the strictly positive strengths; `0.0` if there are none.
pub fn average_positive(strengths: &[f64]) -> f64 {
    let valid: Vec<f64> = strengths.iter().copied().filter(|s| *s > 0.0).collect();
    if valid.is_empty() {
        return 0.0;
    }
    valid.iter().sum::<f64>() / valid.len() as f64
}

/// Leading numeric part of `raw`, if any.
pub fn parse_number(raw: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(raw.trim())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`parse_number`] with `0.0` for non-numbers.
pub fn parse_number_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}
