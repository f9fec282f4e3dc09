//! Image capture: turning a user-selected file into an upload selection.
//!
//! The selection owns the raw image bytes that will be sent to the
//! prediction service, plus a preview reference (a temporary on-disk copy)
//! that is only ever used for display. The capture view holds at most one
//! selection at a time and tracks whether a submission is outstanding.

pub mod selection;
pub mod view;

pub use selection::{CaptureError, PreviewRef, UploadSelection};
pub use view::{CaptureView, SubmitGuard};
