//! Per-frame systems, in the order [`TickLoop`](crate::TickLoop) registers
//! them.

pub mod button;
pub mod carousel;
pub mod controller;
pub mod draggable;
pub mod keyboard;
pub mod mouse;
pub mod teleport_default;
pub mod teleport_point;

pub use button::ButtonSystem;
pub use carousel::CarouselSystem;
pub use controller::{ButtonHistory, ControllerSystem};
pub use draggable::DraggableSystem;
pub use keyboard::KeyboardSystem;
pub use mouse::MouseSystem;
pub use teleport_default::TeleportDefaultSystem;
pub use teleport_point::TeleportPointSystem;
