//! # xr_interaction
//!
//! Controller and mouse interaction for immersive scenes, built on the
//! `xr_component` store.
//!
//! - [`components`]: the capability components and pointer bookkeeping.
//! - [`Interactable`]: the per-capability hover/select/release contract the
//!   controller dispatches through.
//! - [`systems`]: the controller, the mouse fallback and the capability
//!   effect systems.
//! - [`setup`]: builds entities from a declarative feature list.
//! - [`TickLoop`]: owns the world and host and runs the systems each frame.

pub mod components;
pub mod config;
pub mod interactable;
pub mod setup;
pub mod system;
pub mod systems;
pub mod tick;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, InteractionConfig, PulseConfig};
pub use interactable::{INTERACTABLE_GROUP, Interactable, InteractableRegistry, InteractionCx};
pub use setup::{
    ButtonFeature, CarouselFeature, FeatureData, FeatureKind, Features, KeyboardFeature,
    PointerCapability, SessionSupport, SetupError, TeleportDefaultFeature, TeleportPointFeature,
};
pub use system::{
    ClickHandler, Handlers, Host, SubmitHandler, System, SystemContext, SystemRegistry,
};
pub use tick::{TickConfig, TickLoop};
