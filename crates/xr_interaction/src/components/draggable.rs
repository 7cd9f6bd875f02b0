//! Draggable props.
//!
//! Both variants share one component type parameterised by a [`DragMode`]
//! marker. Each marker has its own type name and therefore its own
//! [`ComponentTypeId`](xr_component::ComponentTypeId), so the two variants
//! are independent capabilities in the store.

use std::marker::PhantomData;

use xr_component::Component;
use xr_math::{Mat4, Transform3D};
use xr_scene::SpatialId;

use crate::interactable::{Interactable, InteractionCx};

/// Compile-time flavour of a [`Draggable`].
pub trait DragMode: std::fmt::Debug + 'static {
    /// Component type name of `Draggable<Self>`.
    const COMPONENT_NAME: &'static str;
    /// Name of the system driving this variant.
    const SYSTEM_NAME: &'static str;
    /// Whether a dropped object snaps back to where it was picked up.
    const RETURNS_TO_ORIGIN: bool;
}

/// Dropped objects go back to their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnToOrigin;

impl DragMode for ReturnToOrigin {
    const COMPONENT_NAME: &'static str = "DraggableReturn";
    const SYSTEM_NAME: &'static str = "draggable-return";
    const RETURNS_TO_ORIGIN: bool = true;
}

/// Dropped objects stay where they were released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeDefault;

impl DragMode for FreeDefault {
    const COMPONENT_NAME: &'static str = "DraggableDefault";
    const SYSTEM_NAME: &'static str = "draggable-default";
    const RETURNS_TO_ORIGIN: bool = false;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    None,
    ToBeAttached,
    Attached,
    ToBeDetached,
    ToBeDraggable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draggable<M: DragMode> {
    pub state: DragState,
    /// Scene node of the pointer holding the object.
    pub attached_pointer: Option<SpatialId>,
    /// Local transform at first pickup.
    pub origin: Option<Transform3D>,
    /// Object world matrix relative to the pointer's, fixed at pickup.
    pub offset: Mat4,
    mode: PhantomData<M>,
}

impl<M: DragMode> Draggable<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DragState::None,
            attached_pointer: None,
            origin: None,
            offset: Mat4::IDENTITY,
            mode: PhantomData,
        }
    }

    fn arm(&mut self, state: DragState, pointer: SpatialId) {
        self.state = state;
        self.attached_pointer = Some(pointer);
    }
}

impl<M: DragMode> Default for Draggable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DragMode> Component for Draggable<M> {
    fn type_name() -> &'static str {
        M::COMPONENT_NAME
    }
}

impl<M: DragMode> Interactable for Draggable<M> {
    fn on_select(&mut self, cx: &mut InteractionCx<'_>) {
        self.arm(DragState::ToBeAttached, cx.pointer);
    }

    fn on_snap(&mut self, cx: &mut InteractionCx<'_>) {
        self.arm(DragState::ToBeDraggable, cx.pointer);
    }

    fn on_release(&mut self) -> bool {
        self.state = DragState::ToBeDetached;
        self.attached_pointer = None;
        true
    }
}
