//! Capability components.
//!
//! Each interactable entity carries exactly one capability from this module
//! plus a [`SpatialHandle`]. The capabilities also implement
//! [`Interactable`](crate::Interactable), which is how the controller system
//! reaches them without knowing their concrete type.

pub mod button;
pub mod carousel;
pub mod draggable;
pub mod keyboard;
pub mod pointer;
pub mod teleport;

pub use button::{Button, ButtonState};
pub use carousel::{Carousel, CarouselState};
pub use draggable::{DragMode, DragState, Draggable, FreeDefault, ReturnToOrigin};
pub use keyboard::{KeyWidget, Keyboard, KeyboardState, TextEntry};
pub use pointer::{Locomotion, Pointer, PointerCursor, PointerOwner, SpatialHandle};
pub use teleport::{TeleportDefault, TeleportPoint, TeleportPointState, TeleportState};
