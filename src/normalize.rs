use crate::table::Cell;
use serde::{Deserialize, Serialize};

/// A normalized metric value: either a usable number or an explicit marker
/// that the source cell held nothing parseable.
///
/// "Unavailable" is deliberately distinct from zero; downstream ratio math
/// treats the two very differently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Available(f64),
    Unavailable,
}

impl MetricValue {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Available(v) => Some(*v),
            Self::Unavailable => None,
        }
    }

    pub fn unwrap_or(&self, default: f64) -> f64 {
        self.as_f64().unwrap_or(default)
    }
}

/// Converts a raw table cell into a typed numeric value.
///
/// Text values may carry thousands separators and parenthesis negation
/// (`"(1,234.50)"` reads as -1234.50). Anything that fails to parse, and any
/// blank or NaN cell, becomes [`MetricValue::Unavailable`] rather than an
/// error or a silent zero.
pub fn normalize(cell: &Cell) -> MetricValue {
    match cell {
        Cell::Number(n) if n.is_nan() => MetricValue::Unavailable,
        Cell::Number(n) => MetricValue::Available(*n),
        Cell::Text(text) => normalize_text(text),
        Cell::Blank => MetricValue::Unavailable,
    }
}

fn normalize_text(text: &str) -> MetricValue {
    let mut cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return MetricValue::Unavailable;
    }

    let mut negate = false;
    if cleaned.starts_with('(') && cleaned.ends_with(')') {
        negate = true;
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            MetricValue::Available(if negate { -value } else { value })
        }
        _ => MetricValue::Unavailable,
    }
}
