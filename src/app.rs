//! Wires the capture view, prediction client and navigator into one flow.

use tracing::{debug, error, info};

use crate::capture::{CaptureView, PreviewRef};
use crate::config::Config;
use crate::diagnosis::{interpret, DiagnosisView};
use crate::navigation::{NavigationPayload, Navigator, ResultsEntry, Route};
use crate::prediction::{CancelToken, PredictionClient, PredictionError};

/// What happened to a submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing selected or a request already outstanding; nothing sent
    Skipped,
    /// The request failed; `message` is what the user is shown
    Failed { message: String },
    /// The result was handed to the results view
    Navigated,
}

/// What the results view shows
#[derive(Debug, Clone)]
pub enum ResultsScreen {
    Diagnosis {
        view: DiagnosisView,
        preview: Option<PreviewRef>,
    },
    Redirected(Route),
}

pub struct App {
    client: PredictionClient,
    capture: CaptureView,
    navigator: Navigator,
}

impl App {
    pub fn new(config: &Config) -> Result<Self, PredictionError> {
        Ok(Self::with_client(PredictionClient::from_config(config)?))
    }

    pub fn with_client(client: PredictionClient) -> Self {
        Self {
            client,
            capture: CaptureView::new(),
            navigator: Navigator::new(),
        }
    }

    pub fn capture(&self) -> &CaptureView {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut CaptureView {
        &mut self.capture
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Submit the current selection.
    ///
    /// Failures are converted into the user-facing message and leave the
    /// capture view in place with the loading flag cleared. On success the
    /// response and preview move to the results view and the selection is
    /// released; a response without a result still navigates, and the
    /// results view then redirects.
    pub async fn submit(&mut self, cancel: &CancelToken) -> SubmitOutcome {
        let Some(guard) = self.capture.begin_submit() else {
            debug!("Submit ignored: no selection or request outstanding");
            return SubmitOutcome::Skipped;
        };
        let Some(selection) = self.capture.selection() else {
            return SubmitOutcome::Skipped;
        };

        let result = self.client.submit(selection, cancel).await;
        let preview = selection.preview().clone();
        drop(guard);

        match result {
            Ok(response) => {
                self.navigator
                    .go_to_results(NavigationPayload::new(response, Some(preview)));
                self.capture.clear();
                SubmitOutcome::Navigated
            }
            Err(e) => {
                error!("Error uploading image: {}", e);
                SubmitOutcome::Failed {
                    message: e.user_message(),
                }
            }
        }
    }

    /// Enter the results view and derive what it shows
    pub fn results(&mut self) -> ResultsScreen {
        match self.navigator.enter_results_view() {
            ResultsEntry::Render {
                result,
                image_preview,
                ..
            } => {
                let view = interpret(Some(&result));
                info!(
                    "Diagnosis: {} ({}%)",
                    view.primary_label(),
                    view.primary_confidence()
                );
                ResultsScreen::Diagnosis {
                    view,
                    preview: image_preview,
                }
            }
            ResultsEntry::Redirect(route) => ResultsScreen::Redirected(route),
        }
    }

    /// "Analyze Another Image"
    pub fn go_home(&mut self) {
        self.navigator.go_home();
    }
}
