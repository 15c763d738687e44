//! Pointer events fed to the interaction controller.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the design surface.
    Leave,
}

impl PointerEvent {
    /// Screen position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// Whether the event is a press or release of the primary button.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            PointerEvent::Down { button: MouseButton::Primary, .. }
                | PointerEvent::Up { button: MouseButton::Primary, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let down = PointerEvent::Down {
            position: Point::new(1.0, 2.0),
            button: MouseButton::Primary,
        };
        assert_eq!(down.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_is_primary() {
        let secondary = PointerEvent::Up {
            position: Point::ZERO,
            button: MouseButton::Secondary,
        };
        assert!(!secondary.is_primary());
        assert!(!PointerEvent::Move { position: Point::ZERO }.is_primary());
    }
}
