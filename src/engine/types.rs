//! Payloads exchanged with the prediction engine.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Risk category derived from the engine's free-form label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Any other label, kept verbatim.
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Classify a label by its first word, ignoring case.
    ///
    /// `"High Risk"` is `High`; `"Highly unlikely"` and `"Lower"` are not.
    pub fn from_label(label: &str) -> Self {
        match label.split_whitespace().next() {
            Some(word) if word.eq_ignore_ascii_case("high") => RiskLevel::High,
            Some(word) if word.eq_ignore_ascii_case("medium") => RiskLevel::Medium,
            Some(word) if word.eq_ignore_ascii_case("low") => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("Low"),
            RiskLevel::Medium => f.write_str("Medium"),
            RiskLevel::High => f.write_str("High"),
            RiskLevel::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Response body of `POST /predict`.
///
/// Decoding is lenient: missing fields take their defaults and unknown keys
/// are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub prediction: i64,
    #[serde(default)]
    pub probability: f64,
    /// Label exactly as the engine sent it.
    #[serde(default)]
    pub risk_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<IndexMap<String, f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionResult {
    /// True when the engine flagged the patient as diabetic.
    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }

    /// Category used for theming; the label itself is left untouched.
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_label(&self.risk_level)
    }
}

/// Liveness document served at the engine root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}
