//! Image sources loaded asynchronously by the exporter.

use crate::compositor::{ExportError, ExportResult};
use image::DynamicImage;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future for source loading.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Something the exporter can load a raster image from.
pub trait ImageSource {
    /// Human-readable name for logs and errors.
    fn describe(&self) -> String;

    /// Load and decode the image.
    fn load(&self) -> BoxFuture<'_, ExportResult<DynamicImage>>;
}

/// Image read from a file on disk (the t-shirt template).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> BoxFuture<'_, ExportResult<DynamicImage>> {
        Box::pin(async move {
            let bytes = std::fs::read(&self.path).map_err(|e| {
                ExportError::Load(format!("{}: {}", self.path.display(), e))
            })?;
            decode(&self.describe(), &bytes)
        })
    }
}

/// Encoded image bytes held in memory (the uploaded logo).
#[derive(Debug, Clone)]
pub struct MemorySource {
    label: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(label: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

impl ImageSource for MemorySource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> BoxFuture<'_, ExportResult<DynamicImage>> {
        Box::pin(async move { decode(&self.label, &self.bytes) })
    }
}

fn decode(label: &str, bytes: &[u8]) -> ExportResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| ExportError::Decode(format!("{}: {}", label, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_png;
    use std::io::Write;

    fn tiny_png() -> Vec<u8> {
        encode_png(&[10u8, 20, 30, 255].repeat(4), 2, 2).unwrap()
    }

    #[test]
    fn test_file_source_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&tiny_png()).unwrap();

        let source = FileSource::new(file.path());
        let image = pollster::block_on(source.load()).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.png"));
        let err = pollster::block_on(source.load()).unwrap_err();
        assert!(matches!(err, ExportError::Load(_)));
    }

    #[test]
    fn test_memory_source_rejects_garbage() {
        let source = MemorySource::new("logo", Arc::from(&b"not an image"[..]));
        let err = pollster::block_on(source.load()).unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
    }
}
