use image::ImageFormat;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Errors raised while selecting an image
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an image file: {0:?}")]
    NotAnImage(PathBuf),

    #[error("Failed to create image preview: {0}")]
    Preview(#[source] std::io::Error),
}

/// Local, display-only handle to the selected image.
///
/// Backed by a temporary copy of the file. Clones share the same copy, which
/// is removed from disk once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct PreviewRef {
    file: Arc<NamedTempFile>,
}

impl PreviewRef {
    fn create(bytes: &[u8], extension: &str) -> Result<Self, CaptureError> {
        let suffix = format!(".{}", extension);
        let mut file = tempfile::Builder::new()
            .prefix("tealeaf-preview-")
            .suffix(&suffix)
            .tempfile()
            .map_err(CaptureError::Preview)?;
        file.write_all(bytes).map_err(CaptureError::Preview)?;
        file.flush().map_err(CaptureError::Preview)?;

        debug!("Created preview at {:?}", file.path());
        Ok(Self {
            file: Arc::new(file),
        })
    }

    /// Path of the preview copy
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Whether both handles refer to the same preview
    pub fn same_as(&self, other: &PreviewRef) -> bool {
        Arc::ptr_eq(&self.file, &other.file)
    }
}

/// An image picked by the user, ready to be submitted
#[derive(Debug, Clone)]
pub struct UploadSelection {
    bytes: Vec<u8>,
    file_name: String,
    media_type: &'static str,
    preview: PreviewRef,
}

impl UploadSelection {
    /// Read an image file from disk and create its preview
    pub fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let bytes = std::fs::read(path).map_err(|source| CaptureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self::from_bytes(bytes, file_name).map_err(|e| match e {
            CaptureError::NotAnImage(_) => CaptureError::NotAnImage(path.to_path_buf()),
            other => other,
        })
    }

    /// Build a selection from in-memory image data.
    ///
    /// The format is sniffed from the magic bytes first and from the file
    /// name's extension second.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, CaptureError> {
        let file_name = file_name.into();
        let format = image::guess_format(&bytes)
            .ok()
            .or_else(|| ImageFormat::from_path(&file_name).ok())
            .ok_or_else(|| CaptureError::NotAnImage(PathBuf::from(&file_name)))?;

        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let preview = PreviewRef::create(&bytes, extension)?;

        Ok(Self {
            bytes,
            file_name,
            media_type: format.to_mime_type(),
            preview,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn preview(&self) -> &PreviewRef {
        &self.preview
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// PNG signature followed by filler; enough for format sniffing
    pub(crate) fn png_bytes() -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        bytes
    }

    #[test]
    fn test_selection_sniffs_png() {
        let selection = UploadSelection::from_bytes(png_bytes(), "leaf.dat").unwrap();
        assert_eq!(selection.media_type(), "image/png");
        assert_eq!(selection.file_name(), "leaf.dat");
        assert_eq!(selection.bytes(), png_bytes().as_slice());
    }

    #[test]
    fn test_selection_falls_back_to_extension() {
        let selection = UploadSelection::from_bytes(vec![1, 2, 3], "leaf.jpg").unwrap();
        assert_eq!(selection.media_type(), "image/jpeg");
    }

    #[test]
    fn test_selection_rejects_non_image() {
        let result = UploadSelection::from_bytes(b"hello world".to_vec(), "notes.txt");
        assert!(matches!(result, Err(CaptureError::NotAnImage(_))));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadSelection::from_path(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(CaptureError::Read { .. })));
    }

    #[test]
    fn test_from_path_reads_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tea_leaf.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let selection = UploadSelection::from_path(&path).unwrap();
        assert_eq!(selection.file_name(), "tea_leaf.png");
        assert_eq!(selection.media_type(), "image/png");
    }

    #[test]
    fn test_preview_holds_image_copy() {
        let selection = UploadSelection::from_bytes(png_bytes(), "leaf.png").unwrap();
        let preview = selection.preview();
        assert!(preview.path().exists());
        assert_eq!(std::fs::read(preview.path()).unwrap(), png_bytes());
        assert_eq!(
            preview.path().extension().and_then(|e| e.to_str()),
            Some("png")
        );
    }

    #[test]
    fn test_preview_released_with_last_holder() {
        let selection = UploadSelection::from_bytes(png_bytes(), "leaf.png").unwrap();
        let shared = selection.preview().clone();
        let path = shared.path().to_path_buf();
        assert!(shared.same_as(selection.preview()));

        drop(selection);
        assert!(path.exists(), "preview must outlive the selection while shared");

        drop(shared);
        assert!(!path.exists());
    }
}
