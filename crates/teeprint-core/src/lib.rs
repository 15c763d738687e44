//! Teeprint Core Library
//!
//! Platform-agnostic logic for the Teeprint t-shirt designer: coordinate
//! mapping between the preview and the export canvas, the overlay model,
//! pointer interaction, and user-table bookkeeping.

pub mod geometry;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod users;

pub use geometry::{CanvasSpec, PrintableFractions, printable_rect_for, from_normalized, to_normalized};
pub use input::{MouseButton, PointerEvent};
pub use interaction::{InteractionController, InteractionMode};
pub use overlay::{DragKind, DragSession, OverlayState};
pub use users::{SortDirection, SortField, User, UserPage, UserQuery, UserTable};
