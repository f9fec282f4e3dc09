//! Terminal rendering of the application's views.

use std::fmt::Write;
use std::path::Path;

use crate::capture::CaptureView;
use crate::diagnosis::{
    format_label, secondary_confidence_text, secondary_meter_percent, DiagnosisView,
};
use crate::navigation::Route;

const METER_WIDTH: usize = 40;

const RECOMMENDATIONS: [&str; 4] = [
    "Monitor the plant for any changes in the coming days",
    "Ensure proper watering and drainage",
    "Maintain good air circulation around the plants",
    "Consider applying organic fungicide as a preventive measure",
];

const NEXT_STEPS: [&str; 3] = [
    "Recheck the plant in 3-5 days",
    "Take photos to monitor progression",
    "Consult with an agricultural expert if condition worsens",
];

/// Text bar filled to `percent` of its width
fn meter(percent: f64) -> String {
    let fraction = if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * METER_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(METER_WIDTH - filled))
}

fn bullets(out: &mut String, items: &[&str]) {
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

/// The results view for a diagnosis; `image` is the path shown as the
/// analysed image
pub fn results_page(view: &DiagnosisView, image: Option<&Path>) -> String {
    let mut out = String::new();
    let confidence = view.primary_confidence();

    let _ = writeln!(out, "Analysis Results");
    let _ = writeln!(out, "================\n");
    if let Some(image) = image {
        let _ = writeln!(out, "Image: {}", image.display());
    }
    let _ = writeln!(out, "{}% Confidence\n", confidence);

    let _ = writeln!(out, "Diagnosis: {}", view.primary_label());
    let _ = writeln!(out, "{}", view.primary_description());
    let primary_percent = view
        .primary
        .confidence
        .as_score()
        .map_or(f64::NAN, |score| score * 100.0);
    let _ = writeln!(out, "{} Low..High", meter(primary_percent));

    let _ = writeln!(out, "\nRecommendations");
    bullets(&mut out, &RECOMMENDATIONS);

    if !view.others.is_empty() {
        let _ = writeln!(out, "\nOther Possibilities");
        for disease in &view.others {
            let _ = writeln!(
                out,
                "  {:<24} {:>8}  {}",
                format_label(&disease.name),
                secondary_confidence_text(&disease.confidence),
                meter(secondary_meter_percent(&disease.confidence))
            );
        }
    }

    let _ = writeln!(out, "\nAbout {}", view.primary.name);
    let _ = writeln!(
        out,
        "{} is a common condition that affects tea plants. It's important to monitor \
         your plants regularly and take preventive measures to ensure healthy growth \
         and maximum yield.",
        view.primary.name
    );

    let _ = writeln!(out, "\nNext Steps");
    bullets(&mut out, &NEXT_STEPS);

    out
}

/// The capture view: intro, current selection and controls
pub fn capture_page(capture: &CaptureView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome to Tea Leaf Disease Detection");
    let _ = writeln!(
        out,
        "Upload an image of a tea leaf to detect potential diseases and get recommendations.\n"
    );

    match capture.selection() {
        Some(selection) => {
            let _ = writeln!(
                out,
                "Selected: {} ({})",
                selection.file_name(),
                selection.preview().path().display()
            );
        }
        None => {
            let _ = writeln!(out, "No image selected.");
        }
    }
    let _ = writeln!(
        out,
        "[{}] [{}{}]\n",
        capture.select_button_label(),
        capture.submit_button_label(),
        if capture.can_submit() { "" } else { " (disabled)" }
    );

    let _ = writeln!(out, "How It Works");
    let _ = writeln!(
        out,
        "  1. Upload Image: Take a clear photo of a tea leaf and upload it to our system."
    );
    let _ = writeln!(
        out,
        "  2. AI Analysis: Our advanced AI analyzes the image for signs of diseases."
    );
    let _ = writeln!(
        out,
        "  3. Get Results: Receive instant diagnosis and treatment recommendations."
    );
    out
}

pub fn about_page() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "About Tea Leaf Disease Detection\n");
    let _ = writeln!(out, "Our Mission");
    let _ = writeln!(
        out,
        "Our goal is to help tea farmers quickly identify and respond to potential diseases \
         affecting their crops through advanced image recognition technology.\n"
    );
    let _ = writeln!(out, "How It Works");
    let _ = writeln!(out, "  1. Upload a clear photo of a tea leaf");
    let _ = writeln!(
        out,
        "  2. Our AI analyzes the image for signs of common tea plant diseases"
    );
    let _ = writeln!(
        out,
        "  3. Receive instant results with disease identification and treatment recommendations"
    );
    out
}

pub fn contact_page() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Contact Us\n");
    let _ = writeln!(out, "Get in Touch");
    let _ = writeln!(out, "Have questions or feedback? We'd love to hear from you!");
    let _ = writeln!(out, "  Email: contact@tealeafdetection.com");
    let _ = writeln!(out, "  Phone: +1 (555) 123-4567\n");
    let _ = writeln!(
        out,
        "Send a message with: tealeaf-scan contact --name <NAME> --email <EMAIL> --message <TEXT>"
    );
    out
}

pub fn not_found_page(path: &str) -> String {
    format!("404 - Page Not Found\nNothing lives at {}. Go back to /.\n", path)
}

/// Static page for a route; the results route has no static page
pub fn static_page(route: &Route, capture: &CaptureView) -> Option<String> {
    match route {
        Route::Capture => Some(capture_page(capture)),
        Route::About => Some(about_page()),
        Route::Contact => Some(contact_page()),
        Route::NotFound(path) => Some(not_found_page(path)),
        Route::Results => None,
    }
}
