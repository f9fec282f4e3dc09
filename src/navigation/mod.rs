//! Client-side routing between the capture view and the results view.
//!
//! A transition to the results view carries its payload with it; nothing is
//! stored anywhere else. Entering the results view without a payload, or
//! with a payload whose result is empty, sends the user back to the capture
//! view instead of rendering.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::capture::PreviewRef;
use crate::prediction::PredictionResponse;

/// Known application routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Capture,
    About,
    Contact,
    Results,
    NotFound(String),
}

impl Route {
    /// Resolve a path; anything unrecognised maps to `NotFound`
    pub fn parse(path: &str) -> Self {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match trimmed {
            "/" => Self::Capture,
            "/about" => Self::About,
            "/contact" => Self::Contact,
            "/results" => Self::Results,
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Capture => "/",
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Results => "/results",
            Self::NotFound(path) => path,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// State handed from the capture view to the results view
#[derive(Debug, Clone)]
pub struct NavigationPayload {
    pub transition_id: Uuid,
    /// `None` when the service answered without a result
    pub result: Option<PredictionResponse>,
    pub image_preview: Option<PreviewRef>,
    pub received_at: DateTime<Utc>,
}

impl NavigationPayload {
    pub fn new(result: Option<PredictionResponse>, image_preview: Option<PreviewRef>) -> Self {
        Self {
            transition_id: Uuid::new_v4(),
            result,
            image_preview,
            received_at: Utc::now(),
        }
    }
}

/// Outcome of entering the results view
#[derive(Debug, Clone)]
pub enum ResultsEntry {
    Render {
        transition_id: Uuid,
        result: PredictionResponse,
        image_preview: Option<PreviewRef>,
    },
    Redirect(Route),
}

/// Tracks the current route and the state attached to the last transition
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    state: Option<NavigationPayload>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Route::Capture,
            state: None,
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn state(&self) -> Option<&NavigationPayload> {
        self.state.as_ref()
    }

    /// Plain navigation; no state travels with it
    pub fn navigate(&mut self, route: Route) {
        debug!("Navigating to {}", route);
        self.current = route;
        self.state = None;
    }

    /// Navigate to the results view carrying `payload`
    pub fn go_to_results(&mut self, payload: NavigationPayload) {
        info!(
            "Navigating to results (transition {})",
            payload.transition_id
        );
        self.current = Route::Results;
        self.state = Some(payload);
    }

    /// Back to the capture view, discarding any result state
    pub fn go_home(&mut self) {
        if self.state.take().is_some() {
            debug!("Discarding result state");
        }
        self.current = Route::Capture;
    }

    /// Guard for the results view.
    ///
    /// Renders only when the incoming transition carries a result; otherwise
    /// the navigator moves back to the capture view. The decision depends on
    /// nothing but the attached state, so entering again with the same state
    /// gives the same answer.
    pub fn enter_results_view(&mut self) -> ResultsEntry {
        let renderable = self
            .state
            .as_ref()
            .and_then(|p| p.result.as_ref().map(|result| (p, result)));

        match renderable {
            Some((payload, result)) => {
                let entry = ResultsEntry::Render {
                    transition_id: payload.transition_id,
                    result: result.clone(),
                    image_preview: payload.image_preview.clone(),
                };
                self.current = Route::Results;
                entry
            }
            None => {
                info!("No result to show, redirecting to capture view");
                self.state = None;
                self.current = Route::Capture;
                ResultsEntry::Redirect(Route::Capture)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::Prediction;

    fn payload() -> NavigationPayload {
        NavigationPayload::new(
            Some(PredictionResponse::from_predictions(vec![
                Prediction::new("healthy", 0.9),
            ])),
            None,
        )
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Capture);
        assert_eq!(Route::parse(""), Route::Capture);
        assert_eq!(Route::parse("/about"), Route::About);
        assert_eq!(Route::parse("/about/"), Route::About);
        assert_eq!(Route::parse("/contact"), Route::Contact);
        assert_eq!(Route::parse("/results"), Route::Results);
        assert_eq!(
            Route::parse("/About"),
            Route::NotFound("/About".to_string())
        );
        assert_eq!(
            Route::parse("/nowhere"),
            Route::NotFound("/nowhere".to_string())
        );
    }

    #[test]
    fn test_route_path_roundtrip() {
        for route in [Route::Capture, Route::About, Route::Contact, Route::Results] {
            assert_eq!(Route::parse(route.path()), route);
        }
        assert_eq!(Route::NotFound("/x".to_string()).to_string(), "/x");
    }

    #[test]
    fn test_starts_on_capture() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), &Route::Capture);
        assert!(nav.state().is_none());
    }

    #[test]
    fn test_results_without_payload_redirects() {
        let mut nav = Navigator::new();
        nav.navigate(Route::Results);

        match nav.enter_results_view() {
            ResultsEntry::Redirect(route) => assert_eq!(route, Route::Capture),
            ResultsEntry::Render { .. } => panic!("must not render without a payload"),
        }
        assert_eq!(nav.current(), &Route::Capture);
    }

    #[test]
    fn test_results_with_payload_renders() {
        let mut nav = Navigator::new();
        let sent = payload();
        let id = sent.transition_id;
        nav.go_to_results(sent);
        assert_eq!(nav.current(), &Route::Results);

        match nav.enter_results_view() {
            ResultsEntry::Render {
                transition_id,
                result,
                ..
            } => {
                assert_eq!(transition_id, id);
                assert_eq!(result.predictions[0].name, "healthy");
            }
            ResultsEntry::Redirect(_) => panic!("payload present, expected render"),
        }
    }

    #[test]
    fn test_payload_without_result_redirects() {
        let mut nav = Navigator::new();
        nav.go_to_results(NavigationPayload::new(None, None));
        assert_eq!(nav.current(), &Route::Results);

        assert!(matches!(
            nav.enter_results_view(),
            ResultsEntry::Redirect(Route::Capture)
        ));
        assert_eq!(nav.current(), &Route::Capture);
        assert!(nav.state().is_none());
    }

    #[test]
    fn test_reentry_gives_same_decision() {
        let mut nav = Navigator::new();
        let sent = payload();
        let id = sent.transition_id;
        nav.go_to_results(sent);

        for _ in 0..3 {
            match nav.enter_results_view() {
                ResultsEntry::Render { transition_id, .. } => assert_eq!(transition_id, id),
                ResultsEntry::Redirect(_) => panic!("same state, expected render"),
            }
        }

        nav.go_to_results(payload());
        match nav.enter_results_view() {
            ResultsEntry::Render { transition_id, .. } => assert_ne!(transition_id, id),
            ResultsEntry::Redirect(_) => panic!("new state, expected render"),
        }
    }

    #[test]
    fn test_go_home_discards_state() {
        let mut nav = Navigator::new();
        nav.go_to_results(payload());
        nav.go_home();

        assert_eq!(nav.current(), &Route::Capture);
        assert!(nav.state().is_none());
        assert!(matches!(nav.enter_results_view(), ResultsEntry::Redirect(_)));
    }

    #[test]
    fn test_plain_navigation_drops_state() {
        let mut nav = Navigator::new();
        nav.go_to_results(payload());
        nav.navigate(Route::About);
        nav.navigate(Route::Results);
        assert!(matches!(nav.enter_results_view(), ResultsEntry::Redirect(_)));
    }
}
