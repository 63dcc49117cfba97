//! Result screen presentation: theme, probability gauge and factor bars.

use std::{cmp::Ordering, f64::consts::PI, fmt::Write as _};

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::{PredictionResult, RiskLevel};

/// Radius of the SVG probability ring.
pub const GAUGE_RADIUS: f64 = 90.0;
const TEXT_BAR_WIDTH: usize = 30;

const ADVICE_POSITIVE: &str = "The model suggests a high probability of diabetes. It is recommended to consult a healthcare professional for further diagnosis.";
const ADVICE_NEGATIVE: &str = "The model suggests a low probability of diabetes. Maintain a healthy lifestyle to keep your risk low.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeIcon {
    Warning,
    Info,
    Check,
}

impl ThemeIcon {
    /// Single glyph used by the HTML and terminal renderings.
    pub fn glyph(self) -> &'static str {
        match self {
            ThemeIcon::Warning => "⚠",
            ThemeIcon::Info => "ℹ",
            ThemeIcon::Check => "✔",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: ThemeIcon,
}

impl Theme {
    pub fn for_risk(level: &RiskLevel) -> Self {
        match level {
            RiskLevel::High => Theme {
                name: "High",
                color: "#ef4444",
                icon: ThemeIcon::Warning,
            },
            RiskLevel::Medium => Theme {
                name: "Medium",
                color: "#f59e0b",
                icon: ThemeIcon::Info,
            },
            RiskLevel::Low | RiskLevel::Unknown => Theme {
                name: "Low",
                color: "#10b981",
                icon: ThemeIcon::Check,
            },
        }
    }
}

/// Circular probability gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub percent: f64,
    pub label: String,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl Gauge {
    pub fn from_probability(probability: f64) -> Self {
        let percent = probability * 100.0;
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        let filled = (percent / 100.0).clamp(0.0, 1.0);
        Self {
            percent,
            label: format!("{percent:.1}%"),
            circumference,
            dash_offset: circumference - filled * circumference,
        }
    }

    /// Fraction of the ring that is filled, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// One row of the contributing-factors chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorBar {
    pub name: String,
    pub weight: f64,
    /// Bar length relative to the heaviest factor, in `[0, 100]`.
    pub fill_percent: f64,
    pub label: String,
}

/// Sort importance weights descending and scale bars against the largest.
pub fn factor_bars(importance: Option<&IndexMap<String, f64>>) -> Vec<FactorBar> {
    let Some(importance) = importance else {
        return Vec::new();
    };
    let mut entries: Vec<(&String, f64)> = importance.iter().map(|(k, v)| (k, *v)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let max = entries.first().map(|(_, w)| *w).unwrap_or(0.0);
    entries
        .into_iter()
        .map(|(name, weight)| {
            let fill_percent = if max > 0.0 {
                (weight / max * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };
            FactorBar {
                name: name.clone(),
                weight,
                fill_percent,
                label: format!("{:.1}%", weight * 100.0),
            }
        })
        .collect()
}

/// Everything the result screen shows, derived from one [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub theme: Theme,
    pub gauge: Gauge,
    pub risk_label: String,
    pub headline: String,
    pub advice: &'static str,
    pub factors: Vec<FactorBar>,
}

impl ResultView {
    pub fn new(result: &PredictionResult) -> Self {
        let risk = result.risk();
        // "High Risk" would otherwise read "High Risk Risk Level".
        let risk_label = match &risk {
            RiskLevel::Unknown => result.risk_level.clone(),
            known => known.to_string(),
        };
        Self {
            theme: Theme::for_risk(&risk),
            gauge: Gauge::from_probability(result.probability),
            headline: format!("{risk_label} Risk Level"),
            risk_label,
            advice: if result.is_positive() {
                ADVICE_POSITIVE
            } else {
                ADVICE_NEGATIVE
            },
            factors: factor_bars(result.feature_importance.as_ref()),
        }
    }

    pub fn has_factors(&self) -> bool {
        !self.factors.is_empty()
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} Assessment Complete", self.theme.icon.glyph());
        let _ = writeln!(out);
        let _ = writeln!(out, "  Probability: {}", self.gauge.label);
        let _ = writeln!(out, "  {}", self.headline);
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", self.advice);

        if self.has_factors() {
            let name_width = self
                .factors
                .iter()
                .map(|f| f.name.chars().count())
                .max()
                .unwrap_or(0);
            let _ = writeln!(out);
            let _ = writeln!(out, "  Key Contributing Factors");
            for factor in &self.factors {
                let cells = (factor.fill_percent / 100.0 * TEXT_BAR_WIDTH as f64).round() as usize;
                let _ = writeln!(
                    out,
                    "  {:<name_width$}  {}{}  {:>6}",
                    factor.name,
                    "█".repeat(cells),
                    "░".repeat(TEXT_BAR_WIDTH - cells.min(TEXT_BAR_WIDTH)),
                    factor.label,
                );
            }
        }
        out
    }
}
