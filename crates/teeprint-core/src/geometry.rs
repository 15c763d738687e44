//! Coordinate mapping between the on-screen preview and the export canvas.
//!
//! Both surfaces share one notion of a printable area: a sub-rectangle placed
//! at fixed fractions of its container. Positions are carried between the two
//! surfaces as fractions of that area, so the preview can be any size.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Printable area offsets and extents as fractions of the container.
///
/// These are tied to the t-shirt template artwork: swapping in a template with
/// a different aspect ratio means re-deriving them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintableFractions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PrintableFractions {
    /// Fractions matching the bundled t-shirt template.
    pub const TSHIRT: Self = Self {
        x: 0.20,
        y: 0.12,
        width: 0.60,
        height: 0.70,
    };

    /// Apply the fractions to a container rectangle.
    pub fn apply(&self, container: Rect) -> Rect {
        let size = container.size();
        Rect::from_origin_size(
            Point::new(
                container.x0 + size.width * self.x,
                container.y0 + size.height * self.y,
            ),
            Size::new(size.width * self.width, size.height * self.height),
        )
    }
}

impl Default for PrintableFractions {
    fn default() -> Self {
        Self::TSHIRT
    }
}

/// Fixed dimensions of the export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    /// The 2000×2000 export canvas.
    pub const EXPORT: Self = Self {
        width: 2000,
        height: 2000,
    };

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    /// Full canvas rectangle with its origin at zero.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    /// Printable area of the canvas in canvas pixels.
    pub fn printable_rect(&self) -> Rect {
        printable_rect_for(self.rect())
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::EXPORT
    }
}

/// Printable sub-rectangle of any container (preview or export canvas).
pub fn printable_rect_for(container: Rect) -> Rect {
    PrintableFractions::TSHIRT.apply(container)
}

/// Express `point` as a fraction of `printable`. Not clamped to `[0, 1]`.
pub fn to_normalized(point: Point, printable: Rect) -> Point {
    let size = printable.size();
    Point::new(
        (point.x - printable.x0) / size.width,
        (point.y - printable.y0) / size.height,
    )
}

/// Inverse of [`to_normalized`].
pub fn from_normalized(fraction: Point, printable: Rect) -> Point {
    let size = printable.size();
    Point::new(
        printable.x0 + fraction.x * size.width,
        printable.y0 + fraction.y * size.height,
    )
}

/// Express a size as a fraction of the printable area's dimensions.
pub fn size_to_normalized(size: Size, printable: Rect) -> Size {
    Size::new(size.width / printable.width(), size.height / printable.height())
}

/// Inverse of [`size_to_normalized`].
pub fn size_from_normalized(fraction: Size, printable: Rect) -> Size {
    Size::new(
        fraction.width * printable.width(),
        fraction.height * printable.height(),
    )
}

/// Affine transform taking points in `from` printable space to `to` printable space.
pub fn printable_transform(from: Rect, to: Rect) -> Affine {
    Affine::translate(to.origin().to_vec2())
        * Affine::scale_non_uniform(to.width() / from.width(), to.height() / from.height())
        * Affine::translate(-from.origin().to_vec2())
}

/// Map a rectangle from one printable area into another, going through
/// normalized coordinates.
pub fn map_rect(rect: Rect, from: Rect, to: Rect) -> Rect {
    let origin = from_normalized(to_normalized(rect.origin(), from), to);
    let size = size_from_normalized(size_to_normalized(rect.size(), from), to);
    Rect::from_origin_size(origin, size)
}

/// Rectangle at the origin with the given size. Preview-local coordinates
/// use this as their container.
pub fn local_rect(size: Size) -> Rect {
    Rect::from_origin_size(Point::ZERO, size)
}

/// Convert a screen-space point into coordinates local to `surface`.
pub fn to_local(point: Point, surface: Rect) -> Point {
    point - Vec2::new(surface.x0, surface.y0)
}
