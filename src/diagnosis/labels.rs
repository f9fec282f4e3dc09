use crate::prediction::{Confidence, Prediction};

/// Canned description for a known disease identifier
fn known_description(name: &str) -> Option<&'static str> {
    let description = match name.to_lowercase().as_str() {
        "healthy" => "Your tea leaf appears to be healthy with no signs of disease.",
        "red_leaf_spot" => {
            "Red leaf spot is a fungal disease that causes small red or brown spots on the leaves."
        }
        "brown_blight" => {
            "Brown blight causes irregular brown patches on the leaves and can affect plant health."
        }
        "algal_leaf_spot" => "Algal leaf spot appears as small, raised spots with a velvety texture.",
        "anthracnose" => "Anthracnose causes dark, sunken lesions on leaves and stems.",
        _ => return None,
    };
    Some(description)
}

/// Human-readable description of a disease.
///
/// Prefers the service's own description, then the canned sentence for the
/// identifier, then a generic sentence naming the identifier.
pub fn describe(disease: &Prediction) -> String {
    if let Some(description) = disease.description.as_deref().filter(|d| !d.is_empty()) {
        return description.to_string();
    }

    known_description(&disease.name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("This appears to be a case of {}.", disease.name))
}

/// `red_leaf_spot` -> `Red Leaf Spot`
pub fn format_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score in `[0, 1]` as a percentage with two decimals, e.g. `92.00`
pub fn format_percent(score: f64) -> String {
    fixed_two(score * 100.0)
}

/// Two-decimal formatting where an exact tie rounds away from zero.
///
/// `{:.2}` breaks exact binary ties to even, so `0.125` would print as
/// `0.12`. A tie at the second decimal is only representable when the
/// value is an odd multiple of 1/8.
fn fixed_two(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 && magnitude < 1e15 {
        let hundredths = (magnitude * 100.0).ceil() as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }

    format!("{:.2}", value)
}

/// Primary confidence: always numeric, `NaN` when the payload is not
pub fn primary_confidence_text(confidence: &Confidence) -> String {
    format_percent(confidence.as_score().unwrap_or(f64::NAN))
}

/// Secondary confidence: numeric scores get the percentage format, any
/// other value is shown as received.
pub fn secondary_confidence_text(confidence: &Confidence) -> String {
    match confidence {
        Confidence::Score(score) => format!("{}%", format_percent(*score)),
        other => other.raw_text(),
    }
}

/// Width (in percent) of a secondary candidate's progress bar.
///
/// Uses the raw value as the percentage, unlike the primary meter.
pub fn secondary_meter_percent(confidence: &Confidence) -> f64 {
    confidence.as_score().unwrap_or(0.0)
}
