use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Confidence score as delivered by the service.
///
/// Well-formed payloads carry a number in `[0, 1]`; anything else is kept
/// verbatim so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Score(f64),
    Raw(Value),
}

impl Default for Confidence {
    fn default() -> Self {
        Self::Raw(Value::Null)
    }
}

impl From<f64> for Confidence {
    fn from(score: f64) -> Self {
        Self::Score(score)
    }
}

impl Confidence {
    /// Numeric value, coercing numeric strings
    pub fn as_score(&self) -> Option<f64> {
        match self {
            Self::Score(score) => Some(*score),
            Self::Raw(Value::String(s)) => s.trim().parse().ok(),
            Self::Raw(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Score(_))
    }

    /// The value as it would be shown without any formatting
    pub fn raw_text(&self) -> String {
        match self {
            Self::Score(score) => score.to_string(),
            Self::Raw(Value::Null) => String::new(),
            Self::Raw(Value::String(s)) => s.clone(),
            Self::Raw(other) => other.to_string(),
        }
    }
}

/// One ranked candidate returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display class name, when the service sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Prediction {
    pub fn new(name: impl Into<String>, confidence: impl Into<Confidence>) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.into(),
            description: None,
            class: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Top-1 summary some service versions include next to the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub class: String,
    pub confidence: f64,
}

/// Successful response body of the prediction endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionSummary>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl PredictionResponse {
    pub fn from_predictions(predictions: Vec<Prediction>) -> Self {
        Self {
            predictions,
            ..Self::default()
        }
    }
}

/// Error body of the prediction endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorBody {
    /// Server-provided message, if it is a non-empty string
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }
}
