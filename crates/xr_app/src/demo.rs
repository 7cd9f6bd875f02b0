//! Demo scene and scripted input.

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use xr_interaction::components::{Pointer, TextEntry};
use xr_interaction::{
    ButtonFeature, CarouselFeature, FeatureData, FeatureKind, Features, KeyboardFeature,
    PointerCapability, TeleportDefaultFeature, TeleportPointFeature,
};
use xr_math::{Quat, Transform3D, Vec2, Vec3};
use xr_scene::{
    Gamepad, Handedness, HeadlessSession, InputSource, Node, PerspectiveCamera, SceneGraph, Shape,
    SpatialId, TextureId, Viewport,
};

/// Height of the hands, the button, the keys and the teleport points. Rays
/// aimed between them stay parallel to the floor.
const HAND_HEIGHT: f32 = 1.2;

/// Scene nodes the script refers to.
#[derive(Debug, Clone)]
pub struct DemoNodes {
    pub player: SpatialId,
    pub right: SpatialId,
    pub button: SpatialId,
    pub keyboard: SpatialId,
    pub keys: Vec<SpatialId>,
    pub container: SpatialId,
    pub marker: SpatialId,
    /// Root whose environment teleport points change.
    pub root: SpatialId,
    pub groups: Vec<SpatialId>,
    pub points: Vec<SpatialId>,
}

fn pointer(scene: &mut SceneGraph, handedness: Handedness, x: f32) -> Pointer {
    let name = handedness.as_str();
    let node = scene.add(
        Node::new(format!("controller-{name}"))
            .with_position(Vec3::new(x, HAND_HEIGHT, 0.0)),
    );
    let ray = scene.add_child(node, Node::new(format!("ray-{name}")).with_color(0xffffff));
    Pointer {
        handedness,
        node,
        ray: Some(ray),
    }
}

fn key(label: &str, x: f32) -> Node {
    Node::new(format!("key-{label}"))
        .with_shape(Shape::Box {
            half_extents: Vec3::splat(0.05),
        })
        .with_position(Vec3::new(x, 0.0, 0.0))
        .with_label(label)
}

fn teleport_point(position: Vec3, target: usize, speech: &str) -> Node {
    Node::new("teleport-point")
        .with_shape(Shape::Sphere { radius: 0.3 })
        .with_color(0xd6d4d4)
        .with_position(position)
        .with_target(target)
        .with_texture(TextureId(target as u32 + 1))
        .with_speech(speech)
}

/// Build the demo scene and the feature list for `capability`.
pub fn build(capability: PointerCapability) -> (SceneGraph, Features, DemoNodes, Rc<Cell<u32>>) {
    let mut scene = SceneGraph::new();
    let player = scene.add(Node::new("player"));
    let left = pointer(&mut scene, Handedness::Left, -0.2);
    let right = pointer(&mut scene, Handedness::Right, 0.2);
    let camera = scene.add(
        Node::new("camera")
            .with_camera(PerspectiveCamera::default())
            .with_position(Vec3::new(0.0, HAND_HEIGHT, 0.0)),
    );
    let root = scene.add(Node::new("scene"));

    let button = scene.add(
        Node::new("start-button")
            .with_shape(Shape::Box {
                half_extents: Vec3::new(0.1, 0.05, 0.02),
            })
            .with_position(Vec3::new(0.5, HAND_HEIGHT, -2.0)),
    );

    let keyboard =
        scene.add(Node::new("keyboard").with_position(Vec3::new(-0.5, HAND_HEIGHT, -1.5)));
    let keys: Vec<SpatialId> = [("a", -0.15), ("b", 0.0), ("enter", 0.15)]
        .into_iter()
        .map(|(label, x)| scene.add_child(keyboard, key(label, x)))
        .collect();

    let container = scene.add(
        Node::new("carousel")
            .with_position(Vec3::new(0.0, 2.0, -3.0))
            .hidden(),
    );
    scene.add_child(
        container,
        Node::new("card").with_shape(Shape::Quad {
            width: 0.6,
            height: 0.4,
        }),
    );

    let floor = scene.add(Node::new("floor").with_shape(Shape::Disc { radius: 20.0 }));
    let marker = scene.add(Node::new("teleport-marker"));

    let front = scene.add(Node::new("room-front"));
    let back = scene.add(Node::new("room-back").hidden());
    let points = vec![
        scene.add_child(
            front,
            teleport_point(Vec3::new(0.0, HAND_HEIGHT, -4.0), 1, "Selamat datang"),
        ),
        scene.add_child(
            back,
            teleport_point(Vec3::new(0.0, HAND_HEIGHT, 4.0), 0, "Kembali"),
        ),
    ];
    let groups = vec![front, back];

    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);

    let mut required = vec![
        FeatureKind::Button,
        FeatureKind::Keyboard,
        FeatureKind::Carousel,
        FeatureKind::Movement,
        FeatureKind::TeleportDefault,
        FeatureKind::TeleportPoint,
    ];
    if capability == PointerCapability::Mouse {
        required.retain(|&f| f == FeatureKind::TeleportPoint);
    }

    let features = Features {
        required,
        data: FeatureData {
            pointers: vec![left, right],
            viewport: Some(Viewport::new(0.0, 0.0, 800.0, 600.0)),
            buttons: vec![ButtonFeature {
                node: button,
                on_click: Some(Box::new(move || {
                    counter.set(counter.get() + 1);
                    info!(clicks = counter.get(), "start button clicked");
                })),
            }],
            keyboard: Some(KeyboardFeature {
                root: keyboard,
                camera: Some(camera),
                widget: Some(Box::new(TextEntry::new().with_max_len(16))),
                on_submit: Some(Box::new(|text: &str| {
                    info!(text, "credentials submitted");
                    !text.is_empty()
                })),
            }),
            player: Some(player),
            teleport_default: Some(TeleportDefaultFeature {
                floor,
                marker: Some(marker),
            }),
            teleport_point: Some(TeleportPointFeature {
                groups: groups.clone(),
                scene: Some(root),
                camera: Some(camera),
            }),
            carousel: Some(CarouselFeature {
                container,
                min_scroll: 0.0,
                max_scroll: 1.2,
            }),
            ..FeatureData::default()
        },
    };

    let nodes = DemoNodes {
        player,
        right: right.node,
        button,
        keyboard,
        keys,
        container,
        marker,
        root,
        groups,
        points,
    };
    (scene, features, nodes, clicks)
}

/// One scripted input event.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Point the right controller at a world position.
    Aim(Vec3),
    /// Set a right-hand button.
    Button { index: usize, pressed: bool },
    /// Set the stick axes of a hand.
    Stick { handedness: Handedness, axes: [f32; 4] },
    /// Move the mouse, in client pixels.
    MouseMove(Vec2),
    Click,
}

fn press_at(frame: u64, target: Vec3) -> [(u64, Step); 3] {
    [
        (frame, Step::Aim(target)),
        (frame + 5, Step::Button { index: 0, pressed: true }),
        (frame + 10, Step::Button { index: 0, pressed: false }),
    ]
}

/// Input events keyed by the frame they are applied before.
pub fn script(
    capability: PointerCapability,
    scene: &SceneGraph,
    nodes: &DemoNodes,
) -> Vec<(u64, Step)> {
    if capability == PointerCapability::Mouse {
        return vec![
            (5, Step::MouseMove(Vec2::new(400.0, 300.0))),
            (10, Step::Click),
        ];
    }

    let at = |node: SpatialId| scene.world_position(node);
    let mut steps = Vec::new();
    steps.extend(press_at(0, at(nodes.button)));
    steps.extend(press_at(20, at(nodes.keys[0])));
    steps.extend(press_at(40, at(nodes.keys[1])));
    steps.extend(press_at(60, at(nodes.keys[2])));
    steps.extend(press_at(80, Vec3::new(1.0, 0.0, -2.0)));
    steps.push((
        100,
        Step::Stick {
            handedness: Handedness::Left,
            axes: [0.0, 0.0, 0.0, -1.0],
        },
    ));
    steps.push((
        120,
        Step::Stick {
            handedness: Handedness::Left,
            axes: [0.0; 4],
        },
    ));
    steps.extend(press_at(130, at(nodes.points[0])));
    steps
}

/// Start the session with both hands tracked.
pub fn start_session(session: &HeadlessSession) {
    session.start();
    for handedness in [Handedness::Left, Handedness::Right] {
        session.set_source(InputSource {
            handedness,
            gamepad: Some(Gamepad::with_buttons(5)),
        });
    }
}

/// Rotate `pointer` in place so its ray passes through `target`.
pub fn aim(scene: &mut SceneGraph, pointer: SpatialId, target: Vec3) {
    let origin = scene.world_position(pointer);
    let direction = (target - origin).normalize_or_zero();
    if direction == Vec3::ZERO {
        return;
    }
    let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
    scene.set_local(
        pointer,
        Transform3D::from_position_rotation(origin, rotation),
    );
}
