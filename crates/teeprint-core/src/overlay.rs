//! The single logo overlay placed on the t-shirt preview.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Longest side, in preview pixels, of a freshly uploaded logo.
pub const MAX_INITIAL_SIDE: f64 = 200.0;

/// Where a freshly uploaded logo is placed (preview-local pixels) before clamping.
pub const DEFAULT_POSITION: Point = Point::new(400.0, 300.0);

/// Position and size of the overlay in preview-local pixels, plus the
/// natural size of the uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    /// Top-left corner.
    pub position: Point,
    /// Displayed size.
    pub size: Size,
    /// Pixel size of the uploaded image.
    pub natural_size: Size,
}

impl OverlayState {
    /// Overlay for a freshly uploaded image of the given natural size.
    pub fn for_upload(natural_size: Size) -> Self {
        Self {
            position: DEFAULT_POSITION,
            size: initial_display_size(natural_size),
            natural_size,
        }
    }

    /// Bounding box in preview-local pixels.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Natural height divided by natural width.
    pub fn aspect_ratio(&self) -> f64 {
        if self.natural_size.width <= 0.0 {
            return 1.0;
        }
        self.natural_size.height / self.natural_size.width
    }

    /// Whether the box lies within `area` (with a small float tolerance).
    pub fn is_within(&self, area: Rect) -> bool {
        const TOLERANCE: f64 = 1e-6;
        let b = self.bounds();
        b.x0 >= area.x0 - TOLERANCE
            && b.y0 >= area.y0 - TOLERANCE
            && b.x1 <= area.x1 + TOLERANCE
            && b.y1 <= area.y1 + TOLERANCE
    }

    /// Shrink (aspect preserved) and move the box so it lies within `area`.
    pub fn clamp_into(&mut self, area: Rect) {
        self.size = fit_size(self.size, self.aspect_ratio(), area.size());
        self.position = clamp_position(self.position, self.size, area);
    }
}

/// Initial display size: longer side capped at [`MAX_INITIAL_SIDE`], aspect preserved.
pub fn initial_display_size(natural: Size) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Size::new(MAX_INITIAL_SIDE, MAX_INITIAL_SIDE);
    }
    let aspect = natural.height / natural.width;
    if natural.width > natural.height {
        Size::new(MAX_INITIAL_SIDE, MAX_INITIAL_SIDE * aspect)
    } else {
        Size::new(MAX_INITIAL_SIDE / aspect, MAX_INITIAL_SIDE)
    }
}

/// Clamp each axis so a box of `size` at `position` stays inside `area`.
///
/// When the box is larger than the area on an axis it is pinned to the
/// area's leading edge.
pub fn clamp_position(position: Point, size: Size, area: Rect) -> Point {
    let max_x = (area.x1 - size.width).max(area.x0);
    let max_y = (area.y1 - size.height).max(area.y0);
    Point::new(
        position.x.clamp(area.x0, max_x),
        position.y.clamp(area.y0, max_y),
    )
}

/// Scale `size` down (height = width × aspect) until it fits in `bounds`.
pub fn fit_size(size: Size, aspect: f64, bounds: Size) -> Size {
    let mut width = size.width.min(bounds.width);
    if width * aspect > bounds.height {
        width = bounds.height / aspect;
    }
    Size::new(width, width * aspect)
}

/// Kind of pointer manipulation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKind {
    /// Moving the whole overlay.
    Move,
    /// Resizing from the bottom-right handle.
    Resize,
}

/// Ephemeral state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    /// Pointer minus overlay position (move) or pointer minus overlay size (resize).
    pub anchor: Vec2,
}

impl DragSession {
    /// Start moving: anchor is the pointer offset from the overlay's top-left.
    pub fn moving(pointer: Point, overlay: &OverlayState) -> Self {
        Self {
            kind: DragKind::Move,
            anchor: pointer - overlay.position,
        }
    }

    /// Start resizing: anchor is the pointer minus the overlay size.
    pub fn resizing(pointer: Point, overlay: &OverlayState) -> Self {
        Self {
            kind: DragKind::Resize,
            anchor: pointer.to_vec2() - overlay.size.to_vec2(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_size_landscape() {
        let size = initial_display_size(Size::new(4000.0, 1000.0));
        assert!((size.width - 200.0).abs() < f64::EPSILON);
        assert!((size.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initial_size_portrait() {
        let size = initial_display_size(Size::new(1000.0, 4000.0));
        assert!((size.width - 50.0).abs() < f64::EPSILON);
        assert!((size.height - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initial_size_square() {
        let size = initial_display_size(Size::new(64.0, 64.0));
        assert!((size.width - 200.0).abs() < f64::EPSILON);
        assert!((size.height - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_for_upload_uses_default_position() {
        let overlay = OverlayState::for_upload(Size::new(300.0, 150.0));
        assert_eq!(overlay.position, DEFAULT_POSITION);
        assert!((overlay.aspect_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_position_inside() {
        let area = Rect::new(10.0, 10.0, 110.0, 110.0);
        let p = clamp_position(Point::new(-50.0, 500.0), Size::new(20.0, 30.0), area);
        assert_eq!(p, Point::new(10.0, 80.0));
    }

    #[test]
    fn test_clamp_position_oversized_pins_to_origin() {
        let area = Rect::new(10.0, 10.0, 110.0, 110.0);
        let p = clamp_position(Point::new(40.0, 40.0), Size::new(200.0, 20.0), area);
        assert_eq!(p, Point::new(10.0, 40.0));
    }

    #[test]
    fn test_clamp_into_shrinks_oversized_overlay() {
        let mut overlay = OverlayState {
            position: Point::new(400.0, 300.0),
            size: Size::new(200.0, 100.0),
            natural_size: Size::new(800.0, 400.0),
        };
        let area = Rect::new(60.0, 48.0, 240.0, 328.0);
        overlay.clamp_into(area);
        assert!(overlay.is_within(area));
        assert!((overlay.size.width - 180.0).abs() < 1e-9);
        assert!((overlay.size.height / overlay.size.width - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_drag_session_anchors() {
        let overlay = OverlayState {
            position: Point::new(100.0, 120.0),
            size: Size::new(50.0, 40.0),
            natural_size: Size::new(500.0, 400.0),
        };
        let moving = DragSession::moving(Point::new(110.0, 130.0), &overlay);
        assert_eq!(moving.anchor, Vec2::new(10.0, 10.0));
        let resizing = DragSession::resizing(Point::new(150.0, 160.0), &overlay);
        assert_eq!(resizing.anchor, Vec2::new(100.0, 120.0));
        assert_eq!(resizing.kind, DragKind::Resize);
    }
}
