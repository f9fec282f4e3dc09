//! Result interpretation: from a raw prediction payload to a diagnosis.
//!
//! Everything here is a pure function of the response. The view is derived
//! again on every render and never mutated.

pub mod labels;

use serde::Serialize;
use std::cmp::Ordering;

use crate::prediction::{Confidence, Prediction, PredictionResponse};

pub use labels::{
    describe, format_label, format_percent, primary_confidence_text, secondary_confidence_text,
    secondary_meter_percent,
};

/// Name used when the service returned no candidates
pub const UNKNOWN_NAME: &str = "Unknown";

/// Description used when the service returned no candidates
pub const UNKNOWN_DESCRIPTION: &str = "Unable to determine the condition of the leaf.";

/// Primary diagnosis plus the remaining candidates, best first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisView {
    pub primary: Prediction,
    pub others: Vec<Prediction>,
}

impl DiagnosisView {
    fn unknown() -> Self {
        Self {
            primary: Prediction::new(UNKNOWN_NAME, Confidence::Score(0.0))
                .with_description(UNKNOWN_DESCRIPTION),
            others: Vec::new(),
        }
    }

    pub fn primary_label(&self) -> String {
        format_label(&self.primary.name)
    }

    pub fn primary_description(&self) -> String {
        describe(&self.primary)
    }

    /// Percentage text of the primary diagnosis, e.g. `92.00`
    pub fn primary_confidence(&self) -> String {
        primary_confidence_text(&self.primary.confidence)
    }
}

/// Sort key; values that cannot be read as numbers sort last
fn rank(prediction: &Prediction) -> f64 {
    prediction
        .confidence
        .as_score()
        .filter(|score| !score.is_nan())
        .unwrap_or(f64::NEG_INFINITY)
}

/// Derive the diagnosis from a response.
///
/// Candidates are stably sorted by confidence, highest first; ties keep
/// their original order. An absent response or empty list yields the
/// "Unknown" placeholder.
pub fn interpret(response: Option<&PredictionResponse>) -> DiagnosisView {
    let Some(response) = response.filter(|r| !r.predictions.is_empty()) else {
        return DiagnosisView::unknown();
    };

    let mut sorted = response.predictions.clone();
    sorted.sort_by(|a, b| rank(b).partial_cmp(&rank(a)).unwrap_or(Ordering::Equal));

    let mut ranked = sorted.into_iter();
    match ranked.next() {
        Some(primary) => DiagnosisView {
            primary,
            others: ranked.collect(),
        },
        None => DiagnosisView::unknown(),
    }
}
