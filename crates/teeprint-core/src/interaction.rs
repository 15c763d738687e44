//! Pointer-driven move/resize of the overlay.
//!
//! The controller owns the overlay and the current drag session. Every
//! pointer event carries the preview rectangle as laid out right now, and all
//! clamping is recomputed against it. Moves are computed from the session
//! anchor rather than accumulated deltas, so a dropped event is corrected by
//! the next one.

use crate::geometry::{local_rect, printable_rect_for, to_local};
use crate::input::PointerEvent;
use crate::overlay::{DragKind, DragSession, OverlayState};
use kurbo::{Point, Rect, Size};

/// Minimum overlay width in preview pixels while resizing.
pub const MIN_WIDTH: f64 = 50.0;
/// Resize cap as a fraction of the preview's width and height.
pub const MAX_SIZE_FRACTION: f64 = 0.8;
/// Resize handle diameter in screen pixels.
pub const HANDLE_SIZE: f64 = 16.0;
/// Handle hit radius in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
    Resizing,
}

/// Owns the overlay and applies pointer transitions to it.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    overlay: Option<OverlayState>,
    session: Option<DragSession>,
}

/// Printable area of the preview in preview-local coordinates.
pub fn preview_printable_rect(preview: Rect) -> Rect {
    printable_rect_for(local_rect(preview.size()))
}

/// Apply the resize bounds to a raw pointer-derived width.
///
/// Width is clamped to `[MIN_WIDTH, 0.8 × container width]`. If the
/// resulting height exceeds `0.8 × container height` the width is derived
/// from the height bound instead, so the height bound wins.
pub fn constrain_width(raw_width: f64, aspect: f64, container: Size) -> f64 {
    let max_width = container.width * MAX_SIZE_FRACTION;
    let max_height = container.height * MAX_SIZE_FRACTION;
    let width = raw_width.max(MIN_WIDTH).min(max_width);
    if width * aspect > max_height {
        max_height / aspect
    } else {
        width
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overlay, if a logo has been uploaded.
    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    /// Active drag session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> InteractionMode {
        match self.session.map(|s| s.kind) {
            None => InteractionMode::Idle,
            Some(DragKind::Move) => InteractionMode::Dragging,
            Some(DragKind::Resize) => InteractionMode::Resizing,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Replace the overlay (single-overlay model) and clamp it into the preview.
    pub fn set_overlay(&mut self, mut overlay: OverlayState, preview: Rect) {
        overlay.clamp_into(preview_printable_rect(preview));
        self.session = None;
        self.overlay = Some(overlay);
    }

    /// Remove the overlay and cancel any session.
    pub fn clear(&mut self) {
        self.overlay = None;
        self.session = None;
    }

    /// Re-clamp after the preview changed size.
    pub fn settle(&mut self, preview: Rect) {
        if let Some(overlay) = self.overlay.as_mut() {
            let area = preview_printable_rect(preview);
            if !overlay.is_within(area) {
                overlay.clamp_into(area);
            }
        }
    }

    /// Resize handle centre in preview-local coordinates.
    pub fn resize_handle(&self) -> Option<Point> {
        self.overlay.map(|o| {
            let b = o.bounds();
            Point::new(b.x1, b.y1)
        })
    }

    /// What a press at `local` (preview-local) would grab. The handle is
    /// tested before the body.
    pub fn hit_test(&self, local: Point) -> Option<DragKind> {
        let overlay = self.overlay.as_ref()?;
        if let Some(handle) = self.resize_handle() {
            let dx = local.x - handle.x;
            let dy = local.y - handle.y;
            if dx * dx + dy * dy <= HANDLE_HIT_TOLERANCE * HANDLE_HIT_TOLERANCE {
                return Some(DragKind::Resize);
            }
        }
        overlay.bounds().contains(local).then_some(DragKind::Move)
    }

    /// Pointer pressed at `screen`. Starts a session when it lands on the
    /// overlay or its handle.
    pub fn pointer_down(&mut self, screen: Point, preview: Rect) -> Option<DragKind> {
        let local = to_local(screen, preview);
        let kind = self.hit_test(local)?;
        let overlay = self.overlay.as_ref()?;
        let session = match kind {
            DragKind::Move => DragSession::moving(local, overlay),
            DragKind::Resize => DragSession::resizing(local, overlay),
        };
        log::debug!("Pointer down at {:?}: {:?}", local, kind);
        self.session = Some(session);
        Some(kind)
    }

    /// Pointer moved to `screen`. Returns true when the overlay changed.
    pub fn pointer_move(&mut self, screen: Point, preview: Rect) -> bool {
        let (Some(session), Some(overlay)) = (self.session, self.overlay.as_mut()) else {
            return false;
        };
        let local = to_local(screen, preview);
        let area = preview_printable_rect(preview);
        let before = *overlay;

        match session.kind {
            DragKind::Move => {
                overlay.position = local - session.anchor;
                overlay.clamp_into(area);
            }
            DragKind::Resize => {
                let aspect = overlay.aspect_ratio();
                let width = constrain_width(local.x - session.anchor.x, aspect, preview.size());
                overlay.size = Size::new(width, width * aspect);
                overlay.clamp_into(area);
            }
        }

        *overlay != before
    }

    /// Pointer released. Ends any session.
    pub fn pointer_up(&mut self) {
        self.session = None;
    }

    /// Pointer left the design surface. Treated as an implicit cancel; the
    /// overlay keeps its last valid state.
    pub fn pointer_leave(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Pointer left design surface, ending drag");
        }
    }

    /// Dispatch a unified pointer event. Returns true when the overlay changed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, preview: Rect) -> bool {
        match event {
            PointerEvent::Down { position, .. } if event.is_primary() => {
                self.pointer_down(position, preview);
                false
            }
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { position } => self.pointer_move(position, preview),
            PointerEvent::Up { .. } => {
                self.pointer_up();
                false
            }
            PointerEvent::Leave => {
                self.pointer_leave();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    fn preview() -> Rect {
        // 600×800 design area placed at (50, 40) on screen.
        Rect::new(50.0, 40.0, 650.0, 840.0)
    }

    fn controller_with(natural: Size) -> InteractionController {
        let mut controller = InteractionController::new();
        controller.set_overlay(OverlayState::for_upload(natural), preview());
        controller
    }

    fn screen(local: Point) -> Point {
        Point::new(local.x + preview().x0, local.y + preview().y0)
    }

    #[test]
    fn test_set_overlay_clamps_into_printable_area() {
        let controller = controller_with(Size::new(400.0, 200.0));
        let overlay = controller.overlay().unwrap();
        assert!(overlay.is_within(preview_printable_rect(preview())));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_pointer_down_on_body_starts_drag() {
        let mut controller = controller_with(Size::new(400.0, 200.0));
        let center = controller.overlay().unwrap().bounds().center();
        assert_eq!(controller.pointer_down(screen(center), preview()), Some(DragKind::Move));
        assert_eq!(controller.mode(), InteractionMode::Dragging);
    }

    #[test]
    fn test_pointer_down_on_handle_starts_resize() {
        let mut controller = controller_with(Size::new(400.0, 200.0));
        let handle = controller.resize_handle().unwrap();
        let press = Point::new(handle.x + 4.0, handle.y + 4.0);
        assert_eq!(controller.pointer_down(screen(press), preview()), Some(DragKind::Resize));
        assert_eq!(controller.mode(), InteractionMode::Resizing);
    }

    #[test]
    fn test_pointer_down_outside_stays_idle() {
        let mut controller = controller_with(Size::new(400.0, 200.0));
        assert_eq!(controller.pointer_down(screen(Point::new(1.0, 1.0)), preview()), None);
        assert_eq!(controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_pointer_down_without_overlay() {
        let mut controller = InteractionController::new();
        assert_eq!(controller.pointer_down(Point::new(300.0, 300.0), preview()), None);
        assert!(!controller.pointer_move(Point::new(310.0, 310.0), preview()));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_drag_moves_by_pointer_offset() {
        let mut controller = controller_with(Size::new(100.0, 100.0));
        let start = controller.overlay().unwrap().position;
        let grab = Point::new(start.x + 10.0, start.y + 10.0);
        controller.pointer_down(screen(grab), preview());

        let target = Point::new(grab.x - 30.0, grab.y + 20.0);
        assert!(controller.pointer_move(screen(target), preview()));
        let moved = controller.overlay().unwrap().position;
        assert!((moved.x - (start.x - 30.0)).abs() < 1e-9);
        assert!((moved.y - (start.y + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drag_clamps_for_any_pointer_position() {
        let mut controller = controller_with(Size::new(300.0, 200.0));
        let area = preview_printable_rect(preview());
        let center = controller.overlay().unwrap().bounds().center();
        controller.pointer_down(screen(center), preview());

        for x in (-2000..=3000).step_by(250) {
            for y in (-2000..=3000).step_by(250) {
                controller.pointer_move(Point::new(x as f64, y as f64), preview());
                assert!(controller.overlay().unwrap().is_within(area));
            }
        }
    }

    #[test]
    fn test_drag_recomputes_from_anchor() {
        let mut a = controller_with(Size::new(100.0, 100.0));
        let mut b = a.clone();
        let center = a.overlay().unwrap().bounds().center();
        a.pointer_down(screen(center), preview());
        b.pointer_down(screen(center), preview());

        for step in 1..=10 {
            let p = Point::new(center.x + step as f64 * 3.0, center.y - step as f64 * 2.0);
            a.pointer_move(screen(p), preview());
        }
        // b misses every intermediate event.
        let last = Point::new(center.x + 30.0, center.y - 20.0);
        b.pointer_move(screen(last), preview());
        assert_eq!(a.overlay(), b.overlay());
    }

    #[test]
    fn test_resize_preserves_aspect_ratio() {
        let mut controller = controller_with(Size::new(1200.0, 800.0));
        let expected = 800.0 / 1200.0;
        let handle = controller.resize_handle().unwrap();
        controller.pointer_down(screen(handle), preview());

        for dx in [-300.0, -20.0, 0.0, 15.0, 80.0, 400.0, 2000.0, -5000.0] {
            controller.pointer_move(screen(Point::new(handle.x + dx, handle.y)), preview());
            let size = controller.overlay().unwrap().size;
            assert!((size.height / size.width - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut controller = controller_with(Size::new(100.0, 100.0));
        let handle = controller.resize_handle().unwrap();
        controller.pointer_down(screen(handle), preview());
        controller.pointer_move(screen(Point::new(handle.x - 500.0, handle.y)), preview());
        let size = controller.overlay().unwrap().size;
        assert!((size.width - MIN_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn test_resize_keeps_box_in_printable_area() {
        let mut controller = controller_with(Size::new(100.0, 300.0));
        let area = preview_printable_rect(preview());
        let handle = controller.resize_handle().unwrap();
        controller.pointer_down(screen(handle), preview());
        controller.pointer_move(screen(Point::new(handle.x + 5000.0, handle.y)), preview());
        let overlay = controller.overlay().unwrap();
        assert!(overlay.is_within(area));
        assert!((overlay.size.height / overlay.size.width - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_constrain_width_height_bound_wins() {
        let container = Size::new(1000.0, 500.0);
        // Tall image: width bound allows 800 but the height bound (400) caps width at 200.
        let width = constrain_width(700.0, 2.0, container);
        assert!((width - 200.0).abs() < 1e-9);
        // Wide image: height bound not reached, width bound applies.
        let width = constrain_width(5000.0, 0.25, container);
        assert!((width - 800.0).abs() < 1e-9);
        // Minimum width.
        let width = constrain_width(10.0, 1.0, container);
        assert!((width - MIN_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_up_and_leave_return_to_idle() {
        let mut controller = controller_with(Size::new(100.0, 100.0));
        let center = controller.overlay().unwrap().bounds().center();

        controller.pointer_down(screen(center), preview());
        controller.pointer_up();
        assert!(controller.is_idle());

        controller.pointer_down(screen(center), preview());
        controller.pointer_leave();
        assert!(controller.is_idle());
        let before = *controller.overlay().unwrap();
        assert!(!controller.pointer_move(Point::new(0.0, 0.0), preview()));
        assert_eq!(*controller.overlay().unwrap(), before);
    }

    #[test]
    fn test_handle_pointer_event_dispatch() {
        let mut controller = controller_with(Size::new(100.0, 100.0));
        let center = screen(controller.overlay().unwrap().bounds().center());

        controller.handle_pointer_event(
            PointerEvent::Down { position: center, button: MouseButton::Secondary },
            preview(),
        );
        assert!(controller.is_idle());

        controller.handle_pointer_event(
            PointerEvent::Down { position: center, button: MouseButton::Primary },
            preview(),
        );
        assert_eq!(controller.mode(), InteractionMode::Dragging);

        let changed = controller.handle_pointer_event(
            PointerEvent::Move { position: Point::new(center.x - 5.0, center.y) },
            preview(),
        );
        assert!(changed);

        controller.handle_pointer_event(PointerEvent::Leave, preview());
        assert!(controller.is_idle());
    }

    #[test]
    fn test_settle_after_preview_shrinks() {
        let mut controller = controller_with(Size::new(100.0, 100.0));
        let small = Rect::new(0.0, 0.0, 200.0, 260.0);
        controller.settle(small);
        assert!(controller.overlay().unwrap().is_within(preview_printable_rect(small)));
    }
}
