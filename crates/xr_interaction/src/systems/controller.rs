//! Controller interaction.
//!
//! Every frame, for each visible entity with a [`PointerOwner`] and a
//! [`SpatialHandle`], each tracked input source is matched to a pointer by
//! hand and its ray is cast against the entity's node subtree. A hit
//! dispatches hover to the entity's capability and runs button edge
//! detection; a miss restores the ray visual once. Entities no pointer
//! touched this frame are unhovered at the end.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use xr_component::{Entity, Query, World};
use xr_math::{Quat, Vec3};
use xr_scene::{Handedness, InputSource, RayHit, SceneGraph, SpatialId};

use crate::components::{Locomotion, Pointer, PointerOwner, SpatialHandle};
use crate::config::InteractionConfig;
use crate::interactable::{Interactable, InteractionCx};
use crate::system::{Host, System, SystemContext};

/// Action bound to a button ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonAction {
    Select,
    Snap,
    Close,
}

impl ButtonAction {
    fn for_button(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Select),
            1 => Some(Self::Snap),
            4 => Some(Self::Close),
            _ => None,
        }
    }
}

/// Pressed state of every button during the previous frame, per hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonHistory {
    left: Vec<bool>,
    right: Vec<bool>,
}

impl ButtonHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, handedness: Handedness) -> Option<&Vec<bool>> {
        match handedness {
            Handedness::Left => Some(&self.left),
            Handedness::Right => Some(&self.right),
            Handedness::None => None,
        }
    }

    fn side_mut(&mut self, handedness: Handedness) -> Option<&mut Vec<bool>> {
        match handedness {
            Handedness::Left => Some(&mut self.left),
            Handedness::Right => Some(&mut self.right),
            Handedness::None => None,
        }
    }

    #[must_use]
    pub fn was_pressed(&self, handedness: Handedness, index: usize) -> bool {
        self.side(handedness)
            .and_then(|side| side.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn record(&mut self, handedness: Handedness, index: usize, pressed: bool) {
        if let Some(side) = self.side_mut(handedness) {
            if side.len() <= index {
                side.resize(index + 1, false);
            }
            side[index] = pressed;
        }
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

/// Ray visual bookkeeping per pointer.
#[derive(Debug, Clone, Copy, Default)]
struct RayLatch {
    hovering: bool,
    /// The default length has been restored since the last hit.
    reset: bool,
}

/// The entity and pointer a single ray test runs for.
#[derive(Debug, Clone, Copy)]
struct Target {
    entity: Entity,
    handle: SpatialId,
    pointer: Pointer,
}

#[derive(Debug, Default)]
pub struct ControllerSystem {
    history: ButtonHistory,
    latches: HashMap<SpatialId, RayLatch>,
}

impl ControllerSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> &ButtonHistory {
        &self.history
    }

    fn process_source(
        &mut self,
        world: &mut World,
        host: &mut Host,
        target: Target,
        source: &InputSource,
        hovered: &mut BTreeSet<Entity>,
    ) {
        let Target { entity, handle, pointer } = target;
        let ray = host.scene.pointer_ray(pointer.node);
        let hit = host.scene.raycast(handle, &ray).first().copied();
        let latch = self.latches.entry(pointer.node).or_default();

        let Some(hit) = hit else {
            if !latch.reset {
                set_ray_length(&mut host.scene, &pointer, host.config.default_ray_length);
                latch.reset = true;
                latch.hovering = false;
            }
            return;
        };

        if !latch.hovering {
            latch.hovering = true;
            latch.reset = false;
        }
        hovered.insert(entity);
        dispatch(world, host, target, source, hit, |t, cx| t.on_hover(cx));
        set_ray_length(&mut host.scene, &pointer, hit.distance);

        let Some(gamepad) = source.gamepad.as_ref() else {
            return;
        };
        for (index, button) in gamepad.buttons.iter().enumerate() {
            let was_pressed = self.history.was_pressed(pointer.handedness, index);
            if !button.pressed && !was_pressed {
                continue;
            }
            if button.pressed && !was_pressed {
                press(world, host, target, source, hit, index);
            } else if !button.pressed {
                release(world, host, target, source, hit, index);
            }
            self.history.record(pointer.handedness, index, button.pressed);
        }
    }

    fn unhover_rest(world: &mut World, host: &Host, hovered: &BTreeSet<Entity>) {
        for entity in world.query(&host.interactables.query()) {
            if hovered.contains(&entity) {
                continue;
            }
            if let Some(target) = host.interactables.resolve(world, entity) {
                target.on_unhover();
            }
        }
    }
}

impl System for ControllerSystem {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn init(&mut self, _world: &mut World) {
        self.history.clear();
        self.latches.clear();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        let delta = ctx.delta as f32;
        let world = &mut *ctx.world;
        let host = &mut *ctx.host;
        let mut hovered = BTreeSet::new();

        if host.session.is_active() {
            let sources = host.session.input_sources();
            let owners = world.query(&Query::new().with::<PointerOwner>().with::<SpatialHandle>());
            for entity in owners {
                let Some(handle) = world.get::<SpatialHandle>(entity).map(|h| h.node) else {
                    continue;
                };
                if !host.scene.is_visible_in_tree(handle) {
                    continue;
                }
                let Some(owner) = world.get::<PointerOwner>(entity).cloned() else {
                    continue;
                };
                let player = world.get::<Locomotion>(entity).map(|l| l.player);

                for source in &sources {
                    let Some(&pointer) = owner.pointer(source.handedness) else {
                        continue;
                    };
                    if let Some(player) = player {
                        apply_locomotion(&mut host.scene, &host.config, player, source, delta);
                    }
                    let target = Target {
                        entity,
                        handle,
                        pointer,
                    };
                    self.process_source(world, host, target, source, &mut hovered);
                }
            }
        }

        Self::unhover_rest(world, host, &hovered);
    }
}

/// Run `f` against the capability of `target.entity`, if it has one.
fn dispatch<R>(
    world: &mut World,
    host: &mut Host,
    target: Target,
    source: &InputSource,
    hit: RayHit,
    f: impl FnOnce(&mut dyn Interactable, &mut InteractionCx<'_>) -> R,
) -> Option<R> {
    let Host {
        scene,
        session,
        config,
        interactables,
        ..
    } = host;
    let interactable = interactables.resolve(world, target.entity)?;
    let mut cx = InteractionCx {
        entity: target.entity,
        scene,
        session: &mut **session,
        config,
        handedness: target.pointer.handedness,
        pointer: target.pointer.node,
        gamepad: source.gamepad.as_ref(),
        hit,
    };
    Some(f(interactable, &mut cx))
}

fn press(
    world: &mut World,
    host: &mut Host,
    target: Target,
    source: &InputSource,
    hit: RayHit,
    index: usize,
) {
    dispatch(world, host, target, source, hit, |t, cx| t.on_press(cx));

    let action = ButtonAction::for_button(index);
    if let Some(action) = action {
        set_ray_color(
            &mut host.scene,
            &target.pointer,
            host.config.active_ray_color,
        );
        dispatch(world, host, target, source, hit, |t, cx| match action {
            ButtonAction::Select => t.on_select(cx),
            ButtonAction::Snap => t.on_snap(cx),
            ButtonAction::Close => t.on_close(cx),
        });
    }

    let pulse = host.config.press_pulse;
    host.session.pulse(
        target.pointer.handedness,
        pulse.intensity,
        pulse.duration_ms,
    );
    debug!(
        entity = %target.entity,
        handedness = ?target.pointer.handedness,
        index,
        action = ?action,
        "button press"
    );
}

fn release(
    world: &mut World,
    host: &mut Host,
    target: Target,
    source: &InputSource,
    hit: RayHit,
    index: usize,
) {
    let reset = dispatch(world, host, target, source, hit, |t, _| t.on_release());
    if reset == Some(true) {
        set_ray_color(
            &mut host.scene,
            &target.pointer,
            host.config.neutral_ray_color,
        );
    }
    debug!(
        entity = %target.entity,
        handedness = ?target.pointer.handedness,
        index,
        "button release"
    );
}

/// Left stick walks relative to the player's heading, right stick turns.
fn apply_locomotion(
    scene: &mut SceneGraph,
    config: &InteractionConfig,
    player: SpatialId,
    source: &InputSource,
    delta: f32,
) {
    let Some(gamepad) = source.gamepad.as_ref() else {
        return;
    };
    let Some(local) = scene.local(player) else {
        return;
    };
    match source.handedness {
        Handedness::Left => {
            let stick = Vec3::new(gamepad.axis(2), 0.0, gamepad.axis(3));
            if stick == Vec3::ZERO {
                return;
            }
            let step = Quat::from_rotation_y(local.yaw()) * (stick.normalize() * config.move_speed);
            scene.set_position(player, local.position + step);
        }
        Handedness::Right => {
            let turn = gamepad.axis(2);
            if turn.abs() > config.turn_deadzone {
                let yaw = Quat::from_rotation_y(-turn * config.turn_speed() * delta);
                scene.set_local(player, local.rotated(yaw));
            }
        }
        Handedness::None => {}
    }
}

fn set_ray_length(scene: &mut SceneGraph, pointer: &Pointer, length: f32) {
    if let Some(node) = pointer.ray.and_then(|ray| scene.node_mut(ray)) {
        node.local.scale.z = length;
    }
}

fn set_ray_color(scene: &mut SceneGraph, pointer: &Pointer, color: u32) {
    if let Some(ray) = pointer.ray {
        scene.set_color(ray, color);
    }
}

#[cfg(test)]
mod tests {
    use xr_component::Component;
    use xr_scene::{Gamepad, HeadlessSession, LogSpeech, Node, Shape, XrSession};

    use super::*;
    use crate::components::{Button, ButtonState, Keyboard, KeyboardState};
    use crate::interactable::InteractableRegistry;

    /// Counts every dispatch it receives.
    #[derive(Debug, Default)]
    struct Probe {
        hovers: u32,
        unhovers: u32,
        presses: u32,
        selects: u32,
        snaps: u32,
        releases: u32,
    }

    impl Component for Probe {
        fn type_name() -> &'static str {
            "Probe"
        }
    }

    impl Interactable for Probe {
        fn on_hover(&mut self, _cx: &mut InteractionCx<'_>) {
            self.hovers += 1;
        }

        fn on_unhover(&mut self) {
            self.unhovers += 1;
        }

        fn on_press(&mut self, _cx: &mut InteractionCx<'_>) {
            self.presses += 1;
        }

        fn on_select(&mut self, _cx: &mut InteractionCx<'_>) {
            self.selects += 1;
        }

        fn on_snap(&mut self, _cx: &mut InteractionCx<'_>) {
            self.snaps += 1;
        }

        fn on_release(&mut self) -> bool {
            self.releases += 1;
            true
        }
    }

    struct Rig {
        world: World,
        host: Host,
        session: HeadlessSession,
        system: ControllerSystem,
        pointer: Pointer,
        tick_id: u64,
    }

    impl Rig {
        fn new() -> Self {
            let mut world = World::new();
            let mut scene = SceneGraph::new();
            let pointer_node = scene.add(Node::new("controller-right"));
            let ray = scene.add_child(pointer_node, Node::new("line-right").with_color(0xffffff));
            let session = HeadlessSession::new();
            session.start();
            session.set_source(InputSource {
                handedness: Handedness::Right,
                gamepad: Some(Gamepad::with_buttons(5)),
            });

            let mut host = Host::new(
                scene,
                Box::new(session.clone()),
                Box::new(LogSpeech::new()),
                InteractionConfig::default(),
            );
            host.interactables = InteractableRegistry::with_builtin(&mut world);
            host.interactables.register::<Probe>(&mut world);

            let mut system = ControllerSystem::new();
            system.init(&mut world);
            Self {
                world,
                host,
                session,
                system,
                pointer: Pointer {
                    handedness: Handedness::Right,
                    node: pointer_node,
                    ray: Some(ray),
                },
                tick_id: 0,
            }
        }

        /// A sphere straight ahead of the pointer, owned by a new entity.
        fn spawn<T: Component>(&mut self, capability: T) -> (Entity, SpatialId) {
            let node = self.host.scene.add(
                Node::new("target")
                    .with_shape(Shape::Sphere { radius: 0.5 })
                    .with_position(Vec3::new(0.0, 0.0, -2.0)),
            );
            let entity = self.world.create_entity();
            self.world
                .attach(entity, PointerOwner::new(vec![self.pointer]))
                .unwrap();
            self.world.attach(entity, SpatialHandle { node }).unwrap();
            self.world.attach(entity, capability).unwrap();
            (entity, node)
        }

        fn frame(&mut self) {
            self.tick_id += 1;
            let mut ctx = SystemContext {
                tick_id: self.tick_id,
                delta: 1.0 / 60.0,
                time: self.tick_id as f64 / 60.0,
                world: &mut self.world,
                host: &mut self.host,
            };
            self.system.execute(&mut ctx);
        }

        fn ray_node(&self) -> &Node {
            self.host.scene.node(self.pointer.ray.unwrap()).unwrap()
        }
    }

    #[test]
    fn test_press_and_release_edges_fire_once() {
        let mut rig = Rig::new();
        let (entity, _) = rig.spawn(Probe::default());

        for pressed in [false, true, true, false] {
            rig.session.set_button(Handedness::Right, 0, pressed);
            rig.frame();
        }

        let probe = rig.world.get::<Probe>(entity).unwrap();
        assert_eq!(probe.hovers, 4);
        assert_eq!(probe.presses, 1);
        assert_eq!(probe.selects, 1);
        assert_eq!(probe.releases, 1);
        assert_eq!(probe.unhovers, 0);
    }

    #[test]
    fn test_select_fires_on_second_frame() {
        let mut rig = Rig::new();
        let (entity, _) = rig.spawn(Probe::default());

        rig.frame();
        assert_eq!(rig.world.get::<Probe>(entity).unwrap().selects, 0);
        rig.session.set_button(Handedness::Right, 0, true);
        rig.frame();
        assert_eq!(rig.world.get::<Probe>(entity).unwrap().selects, 1);
        assert!(rig.system.history().was_pressed(Handedness::Right, 0));
    }

    #[test]
    fn test_button_ordinals_map_to_actions() {
        let mut rig = Rig::new();
        let (entity, _) = rig.spawn(Probe::default());

        rig.session.set_button(Handedness::Right, 1, true);
        rig.session.set_button(Handedness::Right, 2, true);
        rig.frame();

        let probe = rig.world.get::<Probe>(entity).unwrap();
        assert_eq!(probe.snaps, 1);
        assert_eq!(probe.selects, 0);
        // Every press edge stages, whatever the ordinal.
        assert_eq!(probe.presses, 2);
    }

    #[test]
    fn test_hover_decays_when_pointer_leaves() {
        let mut rig = Rig::new();
        let (entity, node) = rig.spawn(Button::default());

        rig.frame();
        assert_eq!(
            rig.world.get::<Button>(entity).unwrap().state,
            ButtonState::Hovered
        );

        rig.host.scene.set_position(node, Vec3::new(10.0, 0.0, -2.0));
        rig.frame();
        assert_eq!(
            rig.world.get::<Button>(entity).unwrap().state,
            ButtonState::None
        );
    }

    #[test]
    fn test_unhover_runs_without_session() {
        let mut rig = Rig::new();
        let (entity, _) = rig.spawn(Keyboard {
            state: KeyboardState::Hover,
            ..Keyboard::new(SpatialId(99))
        });
        rig.session.end();
        rig.frame();
        assert_eq!(
            rig.world.get::<Keyboard>(entity).unwrap().state,
            KeyboardState::None
        );
    }

    #[test]
    fn test_hidden_handle_is_not_hit() {
        let mut rig = Rig::new();
        let (entity, node) = rig.spawn(Probe::default());
        rig.host.scene.set_visible(node, false);
        rig.frame();

        let probe = rig.world.get::<Probe>(entity).unwrap();
        assert_eq!(probe.hovers, 0);
        assert_eq!(probe.unhovers, 1);
    }

    #[test]
    fn test_ray_visual_feedback() {
        let mut rig = Rig::new();
        let (_, node) = rig.spawn(Button::default());

        rig.frame();
        assert!((rig.ray_node().local.scale.z - 1.5).abs() < 1e-5);

        rig.session.set_button(Handedness::Right, 0, true);
        rig.frame();
        assert_eq!(
            rig.host.scene.color(rig.pointer.ray.unwrap()),
            Some(0x22d3ee)
        );

        rig.session.set_button(Handedness::Right, 0, false);
        rig.frame();
        assert_eq!(
            rig.host.scene.color(rig.pointer.ray.unwrap()),
            Some(0xffffff)
        );

        rig.host.scene.set_position(node, Vec3::new(10.0, 0.0, -2.0));
        rig.frame();
        assert_eq!(rig.ray_node().local.scale.z, 1.0);
    }

    #[test]
    fn test_haptics_on_hover_enter_and_press() {
        let mut rig = Rig::new();
        rig.spawn(Button::default());

        rig.frame();
        rig.frame();
        assert_eq!(rig.session.pulses().len(), 1);
        assert_eq!(rig.session.pulses()[0].duration_ms, 40);

        rig.session.set_button(Handedness::Right, 0, true);
        rig.frame();
        let pulses = rig.session.pulses();
        assert_eq!(pulses.len(), 2);
        assert_eq!(pulses[1].intensity, 0.5);
        assert_eq!(pulses[1].duration_ms, 80);
    }

    #[test]
    fn test_release_off_target_waits_for_next_hit() {
        let mut rig = Rig::new();
        let (entity, node) = rig.spawn(Probe::default());

        rig.session.set_button(Handedness::Right, 0, true);
        rig.frame();
        rig.host.scene.set_position(node, Vec3::new(10.0, 0.0, -2.0));
        rig.session.set_button(Handedness::Right, 0, false);
        rig.frame();
        assert_eq!(rig.world.get::<Probe>(entity).unwrap().releases, 0);

        rig.host.scene.set_position(node, Vec3::new(0.0, 0.0, -2.0));
        rig.frame();
        assert_eq!(rig.world.get::<Probe>(entity).unwrap().releases, 1);
    }

    #[test]
    fn test_locomotion_walks_and_turns() {
        let mut rig = Rig::new();
        let player = rig.host.scene.add(Node::new("player"));
        let entity = rig.world.create_entity();
        let left = rig.host.scene.add(Node::new("controller-left"));
        rig.world
            .attach(
                entity,
                PointerOwner::new(vec![
                    rig.pointer,
                    Pointer {
                        handedness: Handedness::Left,
                        node: left,
                        ray: None,
                    },
                ]),
            )
            .unwrap();
        rig.world.attach(entity, SpatialHandle { node: player }).unwrap();
        rig.world.attach(entity, Locomotion { player }).unwrap();
        rig.session.set_source(InputSource {
            handedness: Handedness::Left,
            gamepad: Some(Gamepad::with_buttons(2)),
        });

        rig.session.set_axes(Handedness::Left, &[0.0, 0.0, 0.0, -0.5]);
        rig.frame();
        let moved = rig.host.scene.local(player).unwrap().position;
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -0.025), 1e-6));

        rig.session.set_axes(Handedness::Left, &[0.0; 4]);
        rig.session.set_axes(Handedness::Right, &[0.0, 0.0, 0.05, 0.0]);
        rig.frame();
        assert_eq!(rig.host.scene.local(player).unwrap().yaw(), 0.0);

        rig.session.set_axes(Handedness::Right, &[0.0, 0.0, 1.0, 0.0]);
        rig.frame();
        let expected = -std::f32::consts::FRAC_PI_2 / 60.0;
        assert!(
            (rig.host.scene.local(player).unwrap().yaw() - expected).abs() < 1e-5
        );
    }

    #[test]
    fn test_history_is_per_hand() {
        let mut history = ButtonHistory::new();
        history.record(Handedness::Left, 3, true);
        assert!(history.was_pressed(Handedness::Left, 3));
        assert!(!history.was_pressed(Handedness::Right, 3));
        history.record(Handedness::None, 0, true);
        assert!(!history.was_pressed(Handedness::None, 0));
        history.clear();
        assert!(!history.was_pressed(Handedness::Left, 3));
    }

    #[test]
    fn test_session_trait_object_sees_driver_input() {
        let rig = Rig::new();
        assert!(rig.host.session.is_active());
        assert_eq!(rig.host.session.input_sources().len(), 1);
    }
}
