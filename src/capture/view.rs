use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::selection::{CaptureError, UploadSelection};

/// State of the capture view: the current selection and the loading flag
#[derive(Debug, Default)]
pub struct CaptureView {
    selection: Option<UploadSelection>,
    in_flight: Arc<AtomicBool>,
}

/// Marks a submission as outstanding; clears the loading flag when dropped
#[derive(Debug)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

impl CaptureView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an image file, replacing (and releasing) any prior selection.
    ///
    /// `None` means the picker was dismissed: the current state is kept.
    /// On error the current state is kept as well.
    pub fn select_image(&mut self, path: Option<&Path>) -> Result<(), CaptureError> {
        let Some(path) = path else {
            debug!("No file selected, keeping current selection");
            return Ok(());
        };

        let selection = UploadSelection::from_path(path)?;
        self.replace_selection(selection);
        Ok(())
    }

    /// Install an already-built selection
    pub fn replace_selection(&mut self, selection: UploadSelection) {
        info!(
            "Selected image {} ({}, {} bytes)",
            selection.file_name(),
            selection.media_type(),
            selection.bytes().len()
        );
        if let Some(previous) = self.selection.replace(selection) {
            debug!("Releasing previous preview {:?}", previous.preview().path());
        }
    }

    /// Drop the selection, e.g. when navigating away
    pub fn clear(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submission is enabled with a selection and no outstanding request
    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && !self.is_loading()
    }

    /// Claim the single submission slot.
    ///
    /// Returns `None` without side effects when nothing is selected or a
    /// submission is already outstanding.
    pub fn begin_submit(&self) -> Option<SubmitGuard> {
        if self.selection.is_none() {
            return None;
        }

        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmitGuard {
                in_flight: self.in_flight.clone(),
            })
    }

    pub fn select_button_label(&self) -> &'static str {
        if self.selection.is_some() {
            "Change Image"
        } else {
            "Select Image"
        }
    }

    pub fn submit_button_label(&self) -> &'static str {
        if self.is_loading() {
            "Analyzing..."
        } else {
            "Analyze Image"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::selection::tests::png_bytes;

    fn write_png(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, png_bytes()).unwrap();
        path
    }

    #[test]
    fn test_initial_state() {
        let view = CaptureView::new();
        assert!(view.selection().is_none());
        assert!(!view.is_loading());
        assert!(!view.can_submit());
        assert_eq!(view.select_button_label(), "Select Image");
        assert_eq!(view.submit_button_label(), "Analyze Image");
    }

    #[test]
    fn test_select_none_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = CaptureView::new();

        view.select_image(None).unwrap();
        assert!(view.selection().is_none());

        view.select_image(Some(&write_png(dir.path(), "a.png"))).unwrap();
        view.select_image(None).unwrap();
        assert_eq!(view.selection().unwrap().file_name(), "a.png");
    }

    #[test]
    fn test_select_replaces_and_releases_preview() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = CaptureView::new();

        view.select_image(Some(&write_png(dir.path(), "a.png"))).unwrap();
        let first_preview = view.selection().unwrap().preview().path().to_path_buf();
        assert!(first_preview.exists());

        view.select_image(Some(&write_png(dir.path(), "b.png"))).unwrap();
        assert_eq!(view.selection().unwrap().file_name(), "b.png");
        assert_eq!(view.select_button_label(), "Change Image");
        assert!(!first_preview.exists());
    }

    #[test]
    fn test_failed_select_keeps_prior_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = CaptureView::new();
        view.select_image(Some(&write_png(dir.path(), "a.png"))).unwrap();

        let result = view.select_image(Some(&dir.path().join("missing.png")));
        assert!(result.is_err());
        assert_eq!(view.selection().unwrap().file_name(), "a.png");
    }

    #[test]
    fn test_begin_submit_requires_selection() {
        let view = CaptureView::new();
        assert!(view.begin_submit().is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_single_submission_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = CaptureView::new();
        view.select_image(Some(&write_png(dir.path(), "a.png"))).unwrap();

        let guard = view.begin_submit().expect("first submit should be accepted");
        assert!(view.is_loading());
        assert!(!view.can_submit());
        assert_eq!(view.submit_button_label(), "Analyzing...");
        assert!(view.begin_submit().is_none());

        drop(guard);
        assert!(!view.is_loading());
        assert!(view.can_submit());
        assert!(view.begin_submit().is_some());
    }

    #[test]
    fn test_clear_drops_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = CaptureView::new();
        view.select_image(Some(&write_png(dir.path(), "a.png"))).unwrap();
        let preview = view.selection().unwrap().preview().path().to_path_buf();

        view.clear();
        assert!(view.selection().is_none());
        assert!(!preview.exists());
    }
}
