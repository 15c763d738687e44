//! High-resolution compositing of the logo onto the t-shirt template.

use crate::encode::{EncodeError, encode_png};
use crate::source::ImageSource;
use futures_util::future::try_join;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use kurbo::{Rect, Size};
use std::sync::atomic::{AtomicBool, Ordering};
use teeprint_core::geometry::{CanvasSpec, map_rect};
use teeprint_core::interaction::preview_printable_rect;
use teeprint_core::overlay::OverlayState;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to load image: {0}")]
    Load(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("An export is already in progress")]
    Busy,
    #[error("Invalid preview: {0}")]
    InvalidPreview(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Renders the design onto the fixed export canvas.
///
/// At most one export runs at a time per exporter; a call made while another
/// is in flight fails with [`ExportError::Busy`].
#[derive(Debug)]
pub struct Exporter {
    canvas: CanvasSpec,
    busy: AtomicBool,
}

/// Marks an export as in flight until dropped.
pub struct ExportGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(CanvasSpec::EXPORT)
    }
}

impl Exporter {
    pub fn new(canvas: CanvasSpec) -> Self {
        Self {
            canvas,
            busy: AtomicBool::new(false),
        }
    }

    pub fn canvas(&self) -> CanvasSpec {
        self.canvas
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the exporter, or `None` if an export is already running.
    pub fn try_begin(&self) -> Option<ExportGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard { busy: &self.busy })
    }

    /// Box the logo occupies on the export canvas, in canvas pixels.
    pub fn placement(&self, overlay: &OverlayState, preview: Size) -> ExportResult<Rect> {
        if !(preview.width > 0.0 && preview.height > 0.0) {
            return Err(ExportError::InvalidPreview(format!(
                "{}x{}",
                preview.width, preview.height
            )));
        }
        let from = preview_printable_rect(Rect::from_origin_size((0.0, 0.0), preview));
        Ok(map_rect(overlay.bounds(), from, self.canvas.printable_rect()))
    }

    /// Draw the template stretched over the canvas and the logo resized into
    /// `placement`, alpha-blended on top.
    pub fn composite(&self, template: &DynamicImage, logo: &DynamicImage, placement: Rect) -> RgbaImage {
        let (width, height) = (self.canvas.width, self.canvas.height);
        let mut canvas = if template.width() == width && template.height() == height {
            template.to_rgba8()
        } else {
            imageops::resize(&template.to_rgba8(), width, height, FilterType::Triangle)
        };

        let logo_width = placement.width().round().max(1.0) as u32;
        let logo_height = placement.height().round().max(1.0) as u32;
        let logo = imageops::resize(&logo.to_rgba8(), logo_width, logo_height, FilterType::Lanczos3);

        imageops::overlay(
            &mut canvas,
            &logo,
            placement.x0.round() as i64,
            placement.y0.round() as i64,
        );
        canvas
    }

    /// Composite and encode the design.
    ///
    /// Returns `Ok(None)` without touching either source when there is no
    /// overlay.
    pub async fn export(
        &self,
        overlay: Option<&OverlayState>,
        preview: Size,
        template: &dyn ImageSource,
        logo: &dyn ImageSource,
    ) -> ExportResult<Option<Vec<u8>>> {
        let Some(overlay) = overlay else {
            log::debug!("Export requested without a logo");
            return Ok(None);
        };
        let _guard = self.try_begin().ok_or(ExportError::Busy)?;

        let placement = self.placement(overlay, preview)?;
        log::info!(
            "Exporting {}x{} design, logo '{}' at ({:.1}, {:.1}) size {:.1}x{:.1}",
            self.canvas.width,
            self.canvas.height,
            logo.describe(),
            placement.x0,
            placement.y0,
            placement.width(),
            placement.height()
        );

        let (template_image, logo_image) = try_join(template.load(), logo.load())
            .await
            .inspect_err(|e| log::error!("Export failed: {}", e))?;

        let canvas = self.composite(&template_image, &logo_image, placement);
        let png = encode_png(canvas.as_raw(), canvas.width(), canvas.height())?;
        log::info!("Export finished ({} bytes)", png.len());
        Ok(Some(png))
    }
}
