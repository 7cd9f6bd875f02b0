use tracing::debug;

use xr_component::World;

use crate::components::{Carousel, CarouselState};
use crate::system::{System, SystemContext};

/// Applies show/hide requests to carousel containers. Scrolling happens
/// during hover dispatch.
#[derive(Debug, Default)]
pub struct CarouselSystem;

impl CarouselSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl System for CarouselSystem {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<Carousel>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.world.entities_with::<Carousel>() {
            let Some(carousel) = ctx.world.get_mut::<Carousel>(entity) else {
                continue;
            };
            let visible = match carousel.state {
                CarouselState::Show => true,
                CarouselState::Hide => false,
                CarouselState::None | CarouselState::Hover => continue,
            };
            carousel.state = CarouselState::None;
            ctx.host.scene.set_visible(carousel.container, visible);
            ctx.host.scene.recompute_bounds(carousel.container);
            debug!(entity = %entity, visible, "carousel toggled");
        }
    }
}

#[cfg(test)]
mod tests {
    use xr_scene::{Node, SceneGraph};

    use super::*;
    use crate::testing;

    #[test]
    fn test_show_and_hide_consume_request() {
        let mut scene = SceneGraph::new();
        let container = scene.add(Node::new("cards").hidden());
        let mut world = World::new();
        let (mut host, _) = testing::host(scene, &mut world);
        let entity = world.create_entity();
        world
            .attach(
                entity,
                Carousel {
                    state: CarouselState::Show,
                    ..Carousel::new(container)
                },
            )
            .unwrap();

        let mut system = CarouselSystem::new();
        testing::run(&mut system, &mut world, &mut host);
        assert!(host.scene.is_visible(container));
        assert_eq!(
            world.get::<Carousel>(entity).unwrap().state,
            CarouselState::None
        );

        world.get_mut::<Carousel>(entity).unwrap().state = CarouselState::Hide;
        testing::run(&mut system, &mut world, &mut host);
        assert!(!host.scene.is_visible(container));
    }

    #[test]
    fn test_hover_left_untouched() {
        let mut scene = SceneGraph::new();
        let container = scene.add(Node::new("cards"));
        let mut world = World::new();
        let (mut host, _) = testing::host(scene, &mut world);
        let entity = world.create_entity();
        world
            .attach(
                entity,
                Carousel {
                    state: CarouselState::Hover,
                    ..Carousel::new(container)
                },
            )
            .unwrap();

        testing::run(&mut CarouselSystem::new(), &mut world, &mut host);
        assert_eq!(
            world.get::<Carousel>(entity).unwrap().state,
            CarouselState::Hover
        );
        assert!(host.scene.is_visible(container));
    }
}
