//! Teeprint Render Library
//!
//! Logo upload decoding and the high-resolution export pipeline: both images
//! are loaded concurrently, composited onto the fixed export canvas and
//! encoded as PNG.

pub mod compositor;
pub mod encode;
pub mod source;
pub mod upload;

pub use compositor::{ExportError, ExportGuard, ExportResult, Exporter};
pub use encode::{EncodeError, encode_png};
pub use source::{BoxFuture, FileSource, ImageSource, MemorySource};
pub use upload::{ImageFormat, LogoUpload, UploadError, UploadFile, UploadResult, handle_file};
