// crates/core/src/shape.rs
//! Rounding, defaulting and formatting rules applied to raw aggregates
//! before they reach the dashboard.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Label used for any missing classification.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Confidence at or above which a conversation is `HIGH` severity.
pub const HIGH_SEVERITY_CONFIDENCE: f64 = 0.7;
/// Confidence at or above which a conversation is at least `MEDIUM`.
pub const MEDIUM_SEVERITY_CONFIDENCE: f64 = 0.4;

/// Severity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_SEVERITY_CONFIDENCE {
            Severity::High
        } else if confidence >= MEDIUM_SEVERITY_CONFIDENCE {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Parse a stored label; anything unrecognized is `LOW`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

pub fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Round an optional average, defaulting to 0.
pub fn avg(value: Option<f64>, places: u32) -> f64 {
    round_to(or_zero(value), places)
}

pub fn label_or_unknown(label: Option<String>) -> String {
    match label {
        Some(l) if !l.trim().is_empty() => l,
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// `numerator / denominator` as a one-decimal percentage, 0 for an empty
/// denominator.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    round_to(numerator as f64 / denominator as f64 * 100.0, 1)
}

/// `"66.7%"` style label.
pub fn percent_label(numerator: i64, denominator: i64) -> String {
    format!("{:.1}%", percentage(numerator, denominator))
}

/// Fixed-decimal text, e.g. `decimal_label(0.333, 2) == "0.33"`.
pub fn decimal_label(value: f64, places: usize) -> String {
    let s = format!("{:.*}", places, value);
    // "-0.00" reads oddly on a tile.
    if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        s.trim_start_matches('-').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_confidence(0.7), Severity::High);
        assert_eq!(Severity::from_confidence(0.95), Severity::High);
        assert_eq!(Severity::from_confidence(0.69), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.4), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.39), Severity::Low);
        assert_eq!(Severity::from_confidence(0.0), Severity::Low);
    }

    #[test]
    fn test_severity_label_parse() {
        assert_eq!(Severity::from_label("high"), Severity::High);
        assert_eq!(Severity::from_label("MEDIUM"), Severity::Medium);
        assert_eq!(Severity::from_label("??"), Severity::Low);
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(2, 3), "66.7%");
        assert_eq!(percent_label(0, 0), "0.0%");
        assert_eq!(percent_label(5, 5), "100.0%");
    }

    #[test]
    fn test_decimal_label() {
        assert_eq!(decimal_label(1.0 / 3.0, 2), "0.33");
        assert_eq!(decimal_label(42.0, 1), "42.0");
        assert_eq!(decimal_label(-0.001, 2), "0.00");
        assert_eq!(decimal_label(-0.5, 2), "-0.50");
    }

    #[test]
    fn test_avg_defaults_to_zero() {
        assert_eq!(avg(None, 2), 0.0);
        assert_eq!(avg(Some(f64::NAN), 2), 0.0);
        assert_eq!(avg(Some(0.12345), 2), 0.12);
    }

    #[test]
    fn test_label_or_unknown() {
        assert_eq!(label_or_unknown(None), "Unknown");
        assert_eq!(label_or_unknown(Some(" ".into())), "Unknown");
        assert_eq!(label_or_unknown(Some("Resolved".into())), "Resolved");
    }
}
