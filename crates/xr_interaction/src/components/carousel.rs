use xr_component::Component;
use xr_scene::SpatialId;

use crate::interactable::{Interactable, InteractionCx};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CarouselState {
    #[default]
    None,
    Hover,
    Show,
    Hide,
}

/// A horizontally scrolling strip of cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carousel {
    pub state: CarouselState,
    /// Node moved along its local X axis when scrolling.
    pub container: SpatialId,
    pub is_logged_in: bool,
    /// Largest X the container may reach.
    pub min_scroll: f32,
    /// The container's X never drops below `-max_scroll`.
    pub max_scroll: f32,
}

impl Carousel {
    #[must_use]
    pub fn new(container: SpatialId) -> Self {
        Self {
            state: CarouselState::None,
            container,
            is_logged_in: false,
            min_scroll: 0.0,
            max_scroll: 0.0,
        }
    }

    #[must_use]
    pub fn with_scroll_range(mut self, min_scroll: f32, max_scroll: f32) -> Self {
        self.min_scroll = min_scroll;
        self.max_scroll = max_scroll;
        self
    }

    /// The container X after scrolling from `x` by `delta`. An inverted
    /// range pins the container to `min_scroll`.
    #[must_use]
    pub fn scrolled(&self, x: f32, delta: f32) -> f32 {
        (x - delta).max(-self.max_scroll).min(self.min_scroll)
    }
}

impl Component for Carousel {
    fn type_name() -> &'static str {
        "Carousel"
    }
}

impl Interactable for Carousel {
    fn on_hover(&mut self, cx: &mut InteractionCx<'_>) {
        if self.state != CarouselState::Hover {
            self.state = CarouselState::Hover;
        }

        let delta = cx.axis(2) * cx.config.scroll_factor;
        if delta == 0.0 {
            return;
        }
        if let Some(local) = cx.scene.local(self.container) {
            let x = self.scrolled(local.position.x, delta);
            cx.scene.set_position(self.container, local.position.with_x(x));
        }
    }

    fn on_unhover(&mut self) {
        self.state = CarouselState::None;
    }
}
