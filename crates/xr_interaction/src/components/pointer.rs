//! Pointers and the components that tie entities to the scene.

use xr_component::Component;
use xr_math::Vec2;
use xr_scene::{Handedness, SpatialId, Viewport};

/// A tracked controller: its node in the scene and the ray visual drawn
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub handedness: Handedness,
    pub node: SpatialId,
    /// Line node whose Z scale is the visible ray length.
    pub ray: Option<SpatialId>,
}

/// The physical pointers that may hit this entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerOwner {
    pub pointers: Vec<Pointer>,
}

impl PointerOwner {
    #[must_use]
    pub fn new(pointers: Vec<Pointer>) -> Self {
        Self { pointers }
    }

    /// The pointer held in `handedness`. Sources without a hand never match.
    #[must_use]
    pub fn pointer(&self, handedness: Handedness) -> Option<&Pointer> {
        if handedness == Handedness::None {
            return None;
        }
        self.pointers.iter().find(|p| p.handedness == handedness)
    }
}

impl Component for PointerOwner {
    fn type_name() -> &'static str {
        "PointerOwner"
    }
}

/// The scene node an entity is ray-tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialHandle {
    pub node: SpatialId,
}

impl Component for SpatialHandle {
    fn type_name() -> &'static str {
        "SpatialHandle"
    }
}

/// Mouse fallback pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCursor {
    /// Last pointer position in normalised device coordinates. `None` until
    /// the first move event, so nothing is hovered before the mouse enters
    /// the viewport.
    pub pointer: Option<Vec2>,
    /// Node carrying the camera rays are cast from.
    pub camera: SpatialId,
    pub viewport: Viewport,
}

impl PointerCursor {
    #[must_use]
    pub fn new(camera: SpatialId, viewport: Viewport) -> Self {
        Self {
            pointer: None,
            camera,
            viewport,
        }
    }
}

impl Component for PointerCursor {
    fn type_name() -> &'static str {
        "PointerCursor"
    }
}

/// Continuous stick locomotion of the player rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locomotion {
    pub player: SpatialId,
}

impl Component for Locomotion {
    fn type_name() -> &'static str {
        "Locomotion"
    }
}
