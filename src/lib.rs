//! Tea leaf disease detection client.
//!
//! Pick an image, send it to the prediction service, show the diagnosis.

pub mod app;
pub mod capture;
pub mod config;
pub mod contact;
pub mod diagnosis;
pub mod navigation;
pub mod prediction;
pub mod render;


pub use app::{App, ResultsScreen, SubmitOutcome};
pub use config::Config;
