//! HTTP client for the prediction endpoint.
//!
//! Sends a single multipart request carrying the selected image and maps the
//! outcome onto [`PredictionError`]. There are no retries: a failed request
//! is reported and the user resubmits manually. Every request is bounded by
//! the configured timeout and can be cancelled through a [`CancelToken`].

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::cancel::CancelToken;
use super::types::{ErrorBody, PredictionResponse};
use crate::capture::UploadSelection;
use crate::config::Config;

/// Shown when the server fails without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Error processing image. Please try again.";

/// Shown when the request got no response at all
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check if the backend is running.";

/// Shown when the user cancelled the request
pub const CANCELLED_MESSAGE: &str = "Request cancelled.";

/// Failure modes of a prediction request
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The server answered with a non-success status
    #[error("Prediction server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },

    /// The request was sent but nothing came back (unreachable, timed out)
    #[error("No response from prediction server: {0}")]
    NoResponse(String),

    /// The request could not be built or sent; the detail is only logged
    #[error("{0}")]
    RequestSetup(String),

    #[error("Prediction request cancelled")]
    Cancelled,
}

impl PredictionError {
    /// The single readable message surfaced to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            Self::NoResponse(_) => NO_RESPONSE_MESSAGE.to_string(),
            Self::RequestSetup(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Cancelled => CANCELLED_MESSAGE.to_string(),
        }
    }
}

/// Map a transport error onto the failure taxonomy
fn classify_transport_error(err: reqwest::Error) -> PredictionError {
    if err.is_builder() {
        PredictionError::RequestSetup(err.to_string())
    } else {
        PredictionError::NoResponse(err.to_string())
    }
}

/// Remote prediction service client
#[derive(Debug)]
pub struct PredictionClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    image_field: String,
}

impl PredictionClient {
    /// Create a client with URL validation
    pub fn new(
        endpoint: &str,
        image_field: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, PredictionError> {
        let endpoint = reqwest::Url::parse(endpoint.trim()).map_err(|e| {
            PredictionError::RequestSetup(format!(
                "Invalid prediction endpoint '{}': {}",
                endpoint, e
            ))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(PredictionError::RequestSetup(format!(
                "Prediction endpoint must use http or https scheme, got: {}",
                endpoint.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                PredictionError::RequestSetup(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "PredictionClient created for {} (timeout {:?})",
            endpoint, request_timeout
        );

        Ok(Self {
            client,
            endpoint,
            image_field: image_field.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PredictionError> {
        Self::new(
            &config.endpoint_url,
            &config.image_field,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Multipart form with exactly one part, the image
    fn build_form(
        &self,
        selection: &UploadSelection,
    ) -> Result<reqwest::multipart::Form, PredictionError> {
        if self.image_field.is_empty() || self.image_field.contains(['"', '\r', '\n']) {
            return Err(PredictionError::RequestSetup(format!(
                "Invalid image field name '{}'",
                self.image_field.escape_debug()
            )));
        }

        let part = reqwest::multipart::Part::bytes(selection.bytes().to_vec())
            .file_name(selection.file_name().to_string())
            .mime_str(selection.media_type())
            .map_err(|e| {
                PredictionError::RequestSetup(format!("Failed to create image part: {}", e))
            })?;
        Ok(reqwest::multipart::Form::new().part(self.image_field.clone(), part))
    }

    /// Upload the selected image and wait for the service's verdict.
    ///
    /// `Ok(None)` means the service answered with a success status but an
    /// empty or falsy body, so there is no result to show.
    pub async fn submit(
        &self,
        selection: &UploadSelection,
        cancel: &CancelToken,
    ) -> Result<Option<PredictionResponse>, PredictionError> {
        let request_id = Uuid::new_v4();
        let form = self.build_form(selection)?;

        info!(
            %request_id,
            "Sending {} ({} bytes) to {}",
            selection.file_name(),
            selection.bytes().len(),
            self.endpoint
        );

        let send = self.client.post(self.endpoint.clone()).multipart(form).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(%request_id, "Prediction request cancelled before response");
                return Err(PredictionError::Cancelled);
            }
            result = send => result.map_err(|e| {
                error!(%request_id, "Prediction request failed: {}", e);
                classify_transport_error(e)
            })?,
        };

        let status = response.status();
        debug!(%request_id, "Prediction server responded with {}", status);

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(%request_id, "Prediction request cancelled while reading body");
                return Err(PredictionError::Cancelled);
            }
            result = response.bytes() => result.map_err(|e| {
                error!(%request_id, "Failed to read prediction response: {}", e);
                classify_transport_error(e)
            })?,
        };

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message().map(str::to_string));
            error!(
                %request_id,
                "Prediction server error: {} - {}",
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(PredictionError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parse_success_body(&body);
        match &parsed {
            Some(response) => info!(
                %request_id,
                "Prediction received: {} candidates",
                response.predictions.len()
            ),
            None => warn!(%request_id, "Prediction response carried no result"),
        }
        Ok(parsed)
    }
}

/// Interpret a success body.
///
/// Empty bodies and the JSON values `null`, `false`, `0` and `""` carry no
/// result. Any other body is a result; when it is not a prediction object
/// it is treated as an empty one.
fn parse_success_body(body: &[u8]) -> Option<PredictionResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Prediction response is not JSON ({}), treating as empty", e);
            return Some(PredictionResponse::default());
        }
    };

    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if falsy {
        return None;
    }

    match serde_json::from_value::<PredictionResponse>(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(
                "Prediction response is not a valid payload ({}), treating as empty",
                e
            );
            Some(PredictionResponse::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::selection::tests::png_bytes;

    fn client(endpoint: &str) -> Result<PredictionClient, PredictionError> {
        PredictionClient::new(
            endpoint,
            "image",
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_client_new() {
        let client = client("http://localhost:5000/predict").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/predict");

        let from_config = PredictionClient::from_config(&Config::default()).unwrap();
        assert_eq!(from_config.endpoint(), "http://localhost:5000/predict");
    }

    #[test]
    fn test_client_new_invalid_endpoint() {
        let err = client("not-a-valid-url").unwrap_err();
        assert!(matches!(err, PredictionError::RequestSetup(_)));
        assert!(err.to_string().contains("Invalid prediction endpoint"));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = client("ftp://localhost:5000/predict").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_build_form_rejects_bad_field_name() {
        let selection = UploadSelection::from_bytes(png_bytes(), "leaf.png").unwrap();

        for field in ["", "im\"age", "image\r\n"] {
            let client = PredictionClient::new(
                "http://localhost:5000/predict",
                field,
                Duration::from_secs(5),
                Duration::from_secs(1),
            )
            .unwrap();
            let err = client.build_form(&selection).unwrap_err();
            assert!(matches!(err, PredictionError::RequestSetup(_)));
        }

        let ok = client("http://localhost:5000/predict").unwrap();
        assert!(ok.build_form(&selection).is_ok());
    }

    #[test]
    fn test_parse_success_body_without_result() {
        for body in ["", "  \n", "null", "false", "0", "\"\""] {
            assert!(
                parse_success_body(body.as_bytes()).is_none(),
                "body {:?} should carry no result",
                body
            );
        }
    }

    #[test]
    fn test_parse_success_body_with_result() {
        let parsed = parse_success_body(
            br#"{"predictions": [{"name": "healthy", "confidence": 0.9}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.predictions[0].name, "healthy");

        for body in ["{}", "<html>oops</html>", "[1, 2]", "\"text\"", "true"] {
            let parsed = parse_success_body(body.as_bytes()).unwrap();
            assert!(parsed.predictions.is_empty(), "body {:?}", body);
        }
    }

    #[test]
    fn test_user_messages() {
        let server = PredictionError::Server {
            status: 500,
            message: Some("bad image".to_string()),
        };
        assert_eq!(server.user_message(), "bad image");

        let bare = PredictionError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(bare.user_message(), GENERIC_FAILURE_MESSAGE);

        let silent = PredictionError::NoResponse("connection refused".to_string());
        assert_eq!(silent.user_message(), NO_RESPONSE_MESSAGE);

        let setup = PredictionError::RequestSetup("builder error".to_string());
        assert_eq!(setup.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(setup.to_string(), "builder error");

        assert_eq!(PredictionError::Cancelled.user_message(), CANCELLED_MESSAGE);
    }

    #[test]
    fn test_error_display_includes_status() {
        let err = PredictionError::Server {
            status: 400,
            message: Some("No selected file".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Prediction server returned 400: No selected file"
        );
    }
}
