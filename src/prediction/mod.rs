pub mod cancel;
pub mod client;
pub mod types;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use client::{
    PredictionClient, PredictionError, CANCELLED_MESSAGE, GENERIC_FAILURE_MESSAGE,
    NO_RESPONSE_MESSAGE,
};
pub use types::{Confidence, Prediction, PredictionResponse, PredictionSummary};
