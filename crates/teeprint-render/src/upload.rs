//! Logo upload handling: type check, decode, initial sizing.

use crate::source::MemorySource;
use image::DynamicImage;
use kurbo::Size;
use std::path::Path;
use std::sync::Arc;
use teeprint_core::overlay::OverlayState;
use thiserror::Error;

/// Upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {0}")]
    Io(String),
    #[error("Failed to decode {0}")]
    Decode(String),
}

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Raster formats recognised by sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }
        None
    }
}

/// A file handed over by the picker or a drop.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    /// MIME type reported by the environment, if any.
    pub declared_mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Build an upload; an empty declared type counts as unknown and is
    /// derived from the file extension instead.
    pub fn new(name: impl Into<String>, declared_mime: Option<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let declared_mime = declared_mime
            .filter(|m| !m.trim().is_empty())
            .or_else(|| mime_from_name(&name).map(str::to_string));
        Self {
            name,
            declared_mime,
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path) -> UploadResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| UploadError::Io(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, None, bytes))
    }

    /// Whether the declared type is an image type.
    pub fn is_image(&self) -> bool {
        self.declared_mime
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }
}

/// MIME type derived from a file name's extension.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?;
    ImageFormat::from_extension(ext).map(|f| f.mime_type())
}

/// An accepted, decoded logo.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub image: DynamicImage,
    pub natural_size: Size,
    /// Format detected from the file contents.
    pub format: Option<ImageFormat>,
}

impl LogoUpload {
    /// Fresh overlay state for this logo.
    pub fn overlay(&self) -> OverlayState {
        OverlayState::for_upload(self.natural_size)
    }

    /// Source the exporter can reload the logo from.
    pub fn source(&self) -> MemorySource {
        MemorySource::new(self.name.clone(), self.bytes.clone())
    }
}

/// Accept an uploaded file.
///
/// Files whose declared type is not `image/*` are ignored and yield
/// `Ok(None)`; no error is surfaced for them.
pub fn handle_file(file: UploadFile) -> UploadResult<Option<LogoUpload>> {
    if !file.is_image() {
        log::debug!(
            "Ignoring upload '{}' with type {:?}",
            file.name,
            file.declared_mime
        );
        return Ok(None);
    }

    let format = ImageFormat::from_magic_bytes(&file.bytes);
    let image = image::load_from_memory(&file.bytes)
        .map_err(|e| UploadError::Decode(format!("{}: {}", file.name, e)))?;
    let natural_size = Size::new(image.width() as f64, image.height() as f64);

    log::info!(
        "Accepted logo '{}' ({}x{}, {:?})",
        file.name,
        image.width(),
        image.height(),
        format
    );

    Ok(Some(LogoUpload {
        name: file.name,
        bytes: Arc::from(file.bytes),
        image,
        natural_size,
        format,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_png;
    use kurbo::Rect;
    use teeprint_core::interaction::{InteractionController, InteractionMode};

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let rgba = [0u8, 128, 255, 255].repeat((width * height) as usize);
        encode_png(&rgba, width, height).unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("txt"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&png_of(1, 1)), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a.."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_declared_mime_falls_back_to_extension() {
        let file = UploadFile::new("logo.webp", Some(String::new()), Vec::new());
        assert_eq!(file.declared_mime.as_deref(), Some("image/webp"));
        assert!(file.is_image());

        let file = UploadFile::new("notes.txt", None, Vec::new());
        assert_eq!(file.declared_mime, None);
        assert!(!file.is_image());
    }

    #[test]
    fn test_landscape_upload_initial_size() {
        let upload = handle_file(UploadFile::new("wide.png", None, png_of(400, 100)))
            .unwrap()
            .unwrap();
        let overlay = upload.overlay();
        assert!((overlay.size.width - 200.0).abs() < f64::EPSILON);
        assert!((overlay.size.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(upload.format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_portrait_upload_initial_size() {
        let upload = handle_file(UploadFile::new("tall.png", None, png_of(100, 400)))
            .unwrap()
            .unwrap();
        assert!((upload.overlay().size.width - 50.0).abs() < f64::EPSILON);
        assert!((upload.overlay().size.height - 200.0).abs() < f64::EPSILON);
        assert_eq!(upload.natural_size, Size::new(100.0, 400.0));
    }

    #[test]
    fn test_non_image_is_ignored_and_state_unchanged() {
        let preview = Rect::new(0.0, 0.0, 600.0, 800.0);
        let mut controller = InteractionController::new();
        let existing = handle_file(UploadFile::new("logo.png", None, png_of(20, 10)))
            .unwrap()
            .unwrap();
        controller.set_overlay(existing.overlay(), preview);
        let before = *controller.overlay().unwrap();

        let dropped = UploadFile::new(
            "report.pdf",
            Some("application/pdf".to_string()),
            b"%PDF-1.7".to_vec(),
        );
        let result = handle_file(dropped).unwrap();
        assert!(result.is_none());
        if let Some(upload) = result {
            controller.set_overlay(upload.overlay(), preview);
        }

        assert_eq!(*controller.overlay().unwrap(), before);
        assert_eq!(controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_corrupt_image_is_decode_error() {
        let file = UploadFile::new("broken.png", None, vec![0x89, 0x50, 0x4E, 0x47, 0, 0]);
        assert!(matches!(handle_file(file), Err(UploadError::Decode(_))));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge.png");
        std::fs::write(&path, png_of(8, 8)).unwrap();
        let file = UploadFile::from_path(&path).unwrap();
        assert_eq!(file.name, "badge.png");
        assert_eq!(file.declared_mime.as_deref(), Some("image/png"));

        let missing = UploadFile::from_path(&dir.path().join("nope.png"));
        assert!(matches!(missing, Err(UploadError::Io(_))));
    }
}
