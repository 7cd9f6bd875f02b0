use tracing::debug;

use xr_component::Component;
use xr_math::Vec3;
use xr_scene::{ReferenceSpace, SpatialId};

use crate::interactable::{Interactable, InteractionCx};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeleportState {
    #[default]
    None,
    Teleport,
}

/// Free teleport onto any point of a floor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeleportDefault {
    pub state: TeleportState,
    /// World-space destination staged by the last press.
    pub point: Vec3,
    /// Node moved to the staged point as a preview.
    pub marker: Option<SpatialId>,
    /// Reference space at staging time. The commit offsets from this, not
    /// from whatever space is active when the button is released.
    pub base_space: Option<ReferenceSpace>,
}

impl TeleportDefault {
    #[must_use]
    pub fn new(marker: Option<SpatialId>) -> Self {
        Self {
            marker,
            ..Self::default()
        }
    }

    fn stage(&mut self, cx: &mut InteractionCx<'_>) {
        self.point = cx.hit.point;
        self.base_space = cx.session.reference_space();
        if let Some(marker) = self.marker {
            cx.scene.set_position(marker, cx.hit.point);
        }
        debug!(entity = %cx.entity, point = ?self.point, "teleport staged");
    }
}

impl Component for TeleportDefault {
    fn type_name() -> &'static str {
        "TeleportDefault"
    }
}

impl Interactable for TeleportDefault {
    fn on_press(&mut self, cx: &mut InteractionCx<'_>) {
        self.stage(cx);
    }

    fn on_select(&mut self, cx: &mut InteractionCx<'_>) {
        self.stage(cx);
    }

    fn on_release(&mut self) -> bool {
        self.state = TeleportState::Teleport;
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeleportPointState {
    #[default]
    None,
    Hover,
    Teleport,
}

/// A fixed teleport destination. Arriving shows the destination's group
/// and hides all others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeleportPoint {
    pub state: TeleportPointState,
    /// Mutually exclusive groups; the hit point's `target` index selects the
    /// visible one.
    pub groups: Vec<SpatialId>,
    /// Scene root whose environment is replaced on arrival.
    pub scene: Option<SpatialId>,
}

impl TeleportPoint {
    #[must_use]
    pub fn new(groups: Vec<SpatialId>, scene: Option<SpatialId>) -> Self {
        Self {
            state: TeleportPointState::None,
            groups,
            scene,
        }
    }

    /// Hover unless a teleport is already pending.
    pub fn hover(&mut self) {
        if self.state != TeleportPointState::Teleport {
            self.state = TeleportPointState::Hover;
        }
    }

    /// Drop hover unless a teleport is already pending.
    pub fn unhover(&mut self) {
        if self.state == TeleportPointState::Hover {
            self.state = TeleportPointState::None;
        }
    }
}

impl Component for TeleportPoint {
    fn type_name() -> &'static str {
        "TeleportPoint"
    }
}

impl Interactable for TeleportPoint {
    fn on_hover(&mut self, _cx: &mut InteractionCx<'_>) {
        self.hover();
    }

    fn on_unhover(&mut self) {
        self.unhover();
    }

    fn on_select(&mut self, _cx: &mut InteractionCx<'_>) {
        self.state = TeleportPointState::Teleport;
    }

    fn on_release(&mut self) -> bool {
        self.state = TeleportPointState::None;
        true
    }
}
