//! Virtual keyboard effects.
//!
//! A key press is relayed once per press: the `was_pressed` latch is set on
//! the first frame and only cleared by the release. The enter key submits
//! instead of typing; a successful submit logs the user in on this key and
//! on every carousel, and reveals the carousels.

use tracing::{debug, info};

use xr_component::World;
use xr_math::Vec3;

use crate::components::{Carousel, CarouselState, Keyboard, KeyboardState, SpatialHandle};
use crate::system::{System, SystemContext};

#[derive(Debug, Default)]
pub struct KeyboardSystem;

impl KeyboardSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn log_in_carousels(world: &mut World) {
    for entity in world.entities_with::<Carousel>() {
        if let Some(carousel) = world.get_mut::<Carousel>(entity) {
            carousel.is_logged_in = true;
            carousel.state = CarouselState::Show;
        }
    }
}

impl System for KeyboardSystem {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<Keyboard>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.world.entities_with::<Keyboard>() {
            let key_node = ctx.world.get::<SpatialHandle>(entity).map(|h| h.node);
            let Some(key) = ctx.world.get_mut::<Keyboard>(entity) else {
                continue;
            };
            let host = &mut *ctx.host;

            match key.state {
                KeyboardState::Pressed => {
                    if key.was_pressed {
                        continue;
                    }
                    key.was_pressed = true;
                    let root = key.root;
                    let Some(label) = key_node
                        .and_then(|n| host.scene.node(n))
                        .and_then(|n| n.data.label.clone())
                    else {
                        debug!(entity = %entity, "pressed key has no label");
                        continue;
                    };

                    if label == host.config.enter_label {
                        if host.handlers.submit(root) {
                            key.is_logged_in = true;
                            log_in_carousels(ctx.world);
                            info!(entity = %entity, "logged in");
                        } else {
                            info!(entity = %entity, "submit rejected");
                        }
                    } else if let Some(widget) = host.handlers.widget_mut(root) {
                        widget.handle_key(&label);
                        debug!(entity = %entity, label = %label, "key relayed");
                    }
                }
                KeyboardState::Hover => {
                    let scale = host.config.key_hover_scale;
                    if let Some(node) = key_node.and_then(|n| host.scene.node_mut(n))
                        && node.local.scale.x != scale
                    {
                        node.local.scale = Vec3::splat(scale);
                    }
                }
                KeyboardState::Show | KeyboardState::Hide => {
                    let visible = key.state == KeyboardState::Show;
                    key.state = KeyboardState::None;
                    host.scene.set_visible(key.root, visible);
                    host.scene.recompute_bounds(key.root);
                    debug!(entity = %entity, visible, "keyboard toggled");
                }
                KeyboardState::None => {
                    if let Some(node) = key_node.and_then(|n| host.scene.node_mut(n))
                        && node.local.scale.x != 1.0
                    {
                        node.local.scale = Vec3::ONE;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use xr_component::Entity;
    use xr_scene::{Node, SceneGraph, Shape, SpatialId};

    use super::*;
    use crate::components::TextEntry;
    use crate::system::Host;
    use crate::testing;

    struct Fixture {
        world: World,
        host: Host,
        root: SpatialId,
        keys: Vec<(Entity, SpatialId)>,
        carousels: Vec<Entity>,
    }

    fn fixture(accept: bool) -> Fixture {
        let mut scene = SceneGraph::new();
        let root = scene.add(Node::new("keyboard"));
        let labels = ["a", "b", "enter"];
        let nodes: Vec<SpatialId> = labels
            .iter()
            .map(|label| {
                scene.add_child(
                    root,
                    Node::new(*label)
                        .with_shape(Shape::Box {
                            half_extents: Vec3::splat(0.05),
                        })
                        .with_label(*label),
                )
            })
            .collect();

        let mut world = World::new();
        let (mut host, _) = testing::host(scene, &mut world);
        host.handlers.set_widget(root, Box::new(TextEntry::new()));
        host.handlers
            .set_submit(root, Box::new(move |text| accept && !text.is_empty()));

        let keys = nodes
            .into_iter()
            .map(|node| {
                let e = world.create_entity();
                world.attach(e, SpatialHandle { node }).unwrap();
                world.attach(e, Keyboard::new(root)).unwrap();
                (e, node)
            })
            .collect();
        let carousels = (0..2)
            .map(|i| {
                let e = world.create_entity();
                world.attach(e, Carousel::new(SpatialId(100 + i))).unwrap();
                e
            })
            .collect();
        Fixture {
            world,
            host,
            root,
            keys,
            carousels,
        }
    }

    fn press(f: &mut Fixture, key: usize) {
        f.world.get_mut::<Keyboard>(f.keys[key].0).unwrap().state = KeyboardState::Pressed;
    }

    fn text(f: &Fixture) -> String {
        f.host.handlers.widget(f.root).unwrap().text().to_string()
    }

    #[test]
    fn test_held_key_types_once() {
        let mut f = fixture(true);
        let mut system = KeyboardSystem::new();
        press(&mut f, 0);
        testing::run(&mut system, &mut f.world, &mut f.host);
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert_eq!(text(&f), "a");

        // Release clears the latch, the next press types again.
        let key = f.world.get_mut::<Keyboard>(f.keys[0].0).unwrap();
        key.state = KeyboardState::None;
        key.was_pressed = false;
        press(&mut f, 1);
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert_eq!(text(&f), "ab");
    }

    #[test]
    fn test_enter_logs_in_keyboard_and_carousels() {
        let mut f = fixture(true);
        let mut system = KeyboardSystem::new();
        press(&mut f, 0);
        testing::run(&mut system, &mut f.world, &mut f.host);
        press(&mut f, 2);
        testing::run(&mut system, &mut f.world, &mut f.host);

        assert!(f.world.get::<Keyboard>(f.keys[2].0).unwrap().is_logged_in);
        for &carousel in &f.carousels {
            let carousel = f.world.get::<Carousel>(carousel).unwrap();
            assert!(carousel.is_logged_in);
            assert_eq!(carousel.state, CarouselState::Show);
        }
        // Enter submits, it does not type.
        assert_eq!(text(&f), "a");
    }

    #[test]
    fn test_rejected_submit_leaves_state() {
        let mut f = fixture(false);
        press(&mut f, 2);
        testing::run(&mut KeyboardSystem::new(), &mut f.world, &mut f.host);

        assert!(!f.world.get::<Keyboard>(f.keys[2].0).unwrap().is_logged_in);
        assert!(!f.world.get::<Carousel>(f.carousels[0]).unwrap().is_logged_in);
    }

    #[test]
    fn test_hover_scales_key_and_none_restores() {
        let mut f = fixture(true);
        let mut system = KeyboardSystem::new();
        let (entity, node) = f.keys[1];

        f.world.get_mut::<Keyboard>(entity).unwrap().state = KeyboardState::Hover;
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert_eq!(f.host.scene.local(node).unwrap().scale, Vec3::splat(1.2));

        f.world.get_mut::<Keyboard>(entity).unwrap().state = KeyboardState::None;
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert_eq!(f.host.scene.local(node).unwrap().scale, Vec3::ONE);
    }

    #[test]
    fn test_hide_and_show_toggle_root() {
        let mut f = fixture(true);
        let mut system = KeyboardSystem::new();
        let entity = f.keys[0].0;

        f.world.get_mut::<Keyboard>(entity).unwrap().state = KeyboardState::Hide;
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert!(!f.host.scene.is_visible(f.root));
        assert_eq!(
            f.world.get::<Keyboard>(entity).unwrap().state,
            KeyboardState::None
        );
        assert!(f.host.scene.bounds(f.root).is_some());

        f.world.get_mut::<Keyboard>(entity).unwrap().state = KeyboardState::Show;
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert!(f.host.scene.is_visible(f.root));
    }

    #[test]
    fn test_submit_handler_sees_typed_text() {
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        let mut f = fixture(true);
        f.host.handlers.set_submit(
            f.root,
            Box::new(move |text| {
                flag.set(text == "b");
                true
            }),
        );
        let mut system = KeyboardSystem::new();
        press(&mut f, 1);
        testing::run(&mut system, &mut f.world, &mut f.host);
        press(&mut f, 2);
        testing::run(&mut system, &mut f.world, &mut f.host);
        assert!(seen.get());
    }
}
