//! Feature setup.
//!
//! Setup runs in two phases. The one-time session-support probe is resolved
//! first into a [`SessionSupport`]; [`SessionSupport::pointer_capability`]
//! then decides which pointer each interactable gets, and
//! [`TickLoop::add_features`] builds the entities. A feature whose data is
//! incomplete is reported and skipped; the remaining features still load.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use xr_component::{Component, EcsError, Entity, World};
use xr_scene::{SceneGraph, SpatialId, Viewport};

use crate::components::{
    Button, Carousel, DragMode, Draggable, FreeDefault, KeyWidget, Keyboard, Locomotion, Pointer,
    PointerCursor, PointerOwner, ReturnToOrigin, SpatialHandle, TeleportDefault, TeleportPoint,
};
use crate::system::{ClickHandler, SubmitHandler};
use crate::systems::DraggableSystem;
use crate::tick::TickLoop;

/// Resolved answer of the session-support probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSupport {
    Supported,
    Unsupported,
    /// The probe itself failed.
    Failed,
}

/// Which pointer drives the interactables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCapability {
    /// Hand controllers of an immersive session.
    Session,
    /// The mouse fallback.
    Mouse,
}

impl SessionSupport {
    pub fn from_probe<E: fmt::Display>(result: Result<bool, E>) -> Self {
        match result {
            Ok(true) => Self::Supported,
            Ok(false) => Self::Unsupported,
            Err(err) => {
                warn!(error = %err, "session support probe failed");
                Self::Failed
            }
        }
    }

    /// A failed probe falls back to the mouse exactly like an unsupported
    /// one.
    #[must_use]
    pub fn pointer_capability(self) -> PointerCapability {
        match self {
            Self::Supported => PointerCapability::Session,
            Self::Unsupported | Self::Failed => PointerCapability::Mouse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Button,
    Keyboard,
    DraggableReturn,
    DraggableDefault,
    Movement,
    TeleportDefault,
    TeleportPoint,
    Carousel,
}

impl FeatureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Keyboard => "keyboard",
            Self::DraggableReturn => "draggable-return",
            Self::DraggableDefault => "draggable-default",
            Self::Movement => "movement",
            Self::TeleportDefault => "teleport-default",
            Self::TeleportPoint => "teleport-point",
            Self::Carousel => "carousel",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ButtonFeature {
    pub node: SpatialId,
    pub on_click: Option<ClickHandler>,
}

pub struct KeyboardFeature {
    /// Group whose shaped children are the keys.
    pub root: SpatialId,
    pub camera: Option<SpatialId>,
    /// Receives typed keys.
    pub widget: Option<Box<dyn KeyWidget>>,
    /// Called by the enter key with the widget's text.
    pub on_submit: Option<SubmitHandler>,
}

#[derive(Debug, Clone, Copy)]
pub struct TeleportDefaultFeature {
    pub floor: SpatialId,
    pub marker: Option<SpatialId>,
}

#[derive(Debug, Clone)]
pub struct TeleportPointFeature {
    /// Mutually exclusive groups; each shaped child is a teleport point.
    pub groups: Vec<SpatialId>,
    /// Root whose environment arrivals change.
    pub scene: Option<SpatialId>,
    /// Camera the mouse fallback casts from.
    pub camera: Option<SpatialId>,
}

#[derive(Debug, Clone, Copy)]
pub struct CarouselFeature {
    pub container: SpatialId,
    pub min_scroll: f32,
    pub max_scroll: f32,
}

/// Data the features draw from. Each feature consumes its own entry.
#[derive(Default)]
pub struct FeatureData {
    /// Hand pointers shared by every session-driven interactable.
    pub pointers: Vec<Pointer>,
    /// Element receiving mouse events.
    pub viewport: Option<Viewport>,
    pub buttons: Vec<ButtonFeature>,
    pub keyboard: Option<KeyboardFeature>,
    pub draggable_return: Option<SpatialId>,
    pub draggable_default: Option<SpatialId>,
    /// Player rig moved by the sticks.
    pub player: Option<SpatialId>,
    pub teleport_default: Option<TeleportDefaultFeature>,
    pub teleport_point: Option<TeleportPointFeature>,
    pub carousel: Option<CarouselFeature>,
}

#[derive(Default)]
pub struct Features {
    pub required: Vec<FeatureKind>,
    pub data: FeatureData,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("incomplete data provided for \"{feature}\" feature: missing {missing}")]
    Incomplete {
        feature: FeatureKind,
        missing: &'static str,
    },

    #[error("\"{feature}\" feature found no shaped children under {node}")]
    Empty { feature: FeatureKind, node: SpatialId },

    #[error("\"{feature}\" feature has an invalid scroll range ({min_scroll}, {max_scroll})")]
    InvalidRange {
        feature: FeatureKind,
        min_scroll: f32,
        max_scroll: f32,
    },

    #[error(transparent)]
    Ecs(#[from] EcsError),
}

fn incomplete(feature: FeatureKind, missing: &'static str) -> SetupError {
    SetupError::Incomplete { feature, missing }
}

fn owner(data: &FeatureData, feature: FeatureKind) -> Result<PointerOwner, SetupError> {
    if data.pointers.is_empty() {
        return Err(incomplete(feature, "pointers"));
    }
    Ok(PointerOwner::new(data.pointers.clone()))
}

fn shaped_children(scene: &SceneGraph, node: SpatialId) -> Vec<SpatialId> {
    scene
        .children(node)
        .iter()
        .copied()
        .filter(|&child| scene.node(child).is_some_and(|n| n.shape.is_some()))
        .collect()
}

fn attach_all<T: Component>(
    world: &mut World,
    entity: Entity,
    owner: Option<&PointerOwner>,
    node: SpatialId,
    component: T,
) -> Result<(), EcsError> {
    if let Some(owner) = owner {
        world.attach(entity, owner.clone())?;
    }
    world.attach(entity, SpatialHandle { node })?;
    world.attach(entity, component)
}

/// Create an entity with a spatial handle on `node`, `component` and, for
/// session pointers, a pointer owner. Nothing is left behind on failure.
fn spawn<T: Component>(
    world: &mut World,
    owner: Option<&PointerOwner>,
    node: SpatialId,
    component: T,
) -> Result<Entity, SetupError> {
    let entity = world.create_entity();
    if let Err(err) = attach_all(world, entity, owner, node, component) {
        world.despawn(entity);
        return Err(err.into());
    }
    debug!(entity = %entity, node = %node, component = T::type_name(), "spawned");
    Ok(entity)
}

impl TickLoop {
    /// Build the entities of every required feature. Returns the errors of
    /// the features that were skipped.
    pub fn add_features(&mut self, support: SessionSupport, features: Features) -> Vec<SetupError> {
        let capability = support.pointer_capability();
        let Features { required, mut data } = features;
        let mut errors = Vec::new();

        for feature in required {
            let result = match feature {
                FeatureKind::Button => self.add_buttons(&mut data),
                FeatureKind::Keyboard => self.add_keyboard(&mut data),
                FeatureKind::DraggableReturn => {
                    let node = data.draggable_return.take();
                    self.add_draggable::<ReturnToOrigin>(feature, node, &data)
                }
                FeatureKind::DraggableDefault => {
                    let node = data.draggable_default.take();
                    self.add_draggable::<FreeDefault>(feature, node, &data)
                }
                FeatureKind::Movement => self.add_movement(&mut data),
                FeatureKind::TeleportDefault => self.add_teleport_default(&mut data),
                FeatureKind::TeleportPoint => self.add_teleport_points(capability, &mut data),
                FeatureKind::Carousel => self.add_carousel(&mut data),
            };
            match result {
                Ok(entities) => info!(feature = %feature, entities, "feature registered"),
                Err(err) => {
                    warn!(feature = %feature, error = %err, "feature skipped");
                    errors.push(err);
                }
            }
        }
        errors
    }

    fn add_buttons(&mut self, data: &mut FeatureData) -> Result<usize, SetupError> {
        let feature = FeatureKind::Button;
        let owner = owner(data, feature)?;
        if data.buttons.is_empty() {
            return Err(incomplete(feature, "button"));
        }
        if data.buttons.iter().any(|b| b.on_click.is_none()) {
            return Err(incomplete(feature, "on_click"));
        }

        let buttons = std::mem::take(&mut data.buttons);
        let count = buttons.len();
        for ButtonFeature { node, on_click } in buttons {
            spawn(&mut self.world, Some(&owner), node, Button::default())?;
            if let Some(handler) = on_click {
                self.host.handlers.set_click(node, handler);
            }
        }
        Ok(count)
    }

    fn add_keyboard(&mut self, data: &mut FeatureData) -> Result<usize, SetupError> {
        let feature = FeatureKind::Keyboard;
        let owner = owner(data, feature)?;
        let KeyboardFeature {
            root,
            camera,
            widget,
            on_submit,
        } = data
            .keyboard
            .take()
            .ok_or_else(|| incomplete(feature, "keyboard"))?;

        let keys = shaped_children(&self.host.scene, root);
        if keys.is_empty() {
            return Err(SetupError::Empty { feature, node: root });
        }
        for &key in &keys {
            let keyboard = Keyboard {
                camera,
                ..Keyboard::new(root)
            };
            spawn(&mut self.world, Some(&owner), key, keyboard)?;
        }

        if let Some(widget) = widget {
            self.host.handlers.set_widget(root, widget);
        }
        if let Some(handler) = on_submit {
            self.host.handlers.set_submit(root, handler);
        }
        Ok(keys.len())
    }

    fn add_draggable<M: DragMode>(
        &mut self,
        feature: FeatureKind,
        node: Option<SpatialId>,
        data: &FeatureData,
    ) -> Result<usize, SetupError> {
        let owner = owner(data, feature)?;
        let node = node.ok_or_else(|| incomplete(feature, "mesh"))?;
        self.register_system(Box::new(DraggableSystem::<M>::new()));
        spawn(&mut self.world, Some(&owner), node, Draggable::<M>::new())?;
        Ok(1)
    }

    fn add_movement(&mut self, data: &mut FeatureData) -> Result<usize, SetupError> {
        let feature = FeatureKind::Movement;
        let owner = owner(data, feature)?;
        let player = data
            .player
            .take()
            .ok_or_else(|| incomplete(feature, "player"))?;
        spawn(&mut self.world, Some(&owner), player, Locomotion { player })?;
        Ok(1)
    }

    fn add_teleport_default(&mut self, data: &mut FeatureData) -> Result<usize, SetupError> {
        let feature = FeatureKind::TeleportDefault;
        let owner = owner(data, feature)?;
        let TeleportDefaultFeature { floor, marker } = data
            .teleport_default
            .take()
            .ok_or_else(|| incomplete(feature, "floor"))?;
        spawn(
            &mut self.world,
            Some(&owner),
            floor,
            TeleportDefault::new(marker),
        )?;
        Ok(1)
    }

    fn add_teleport_points(
        &mut self,
        capability: PointerCapability,
        data: &mut FeatureData,
    ) -> Result<usize, SetupError> {
        let feature = FeatureKind::TeleportPoint;
        let TeleportPointFeature {
            groups,
            scene,
            camera,
        } = data
            .teleport_point
            .take()
            .ok_or_else(|| incomplete(feature, "teleport_point"))?;
        let Some(&first) = groups.first() else {
            return Err(incomplete(feature, "groups"));
        };

        let (owner, cursor) = match capability {
            PointerCapability::Session => (Some(owner(data, feature)?), None),
            PointerCapability::Mouse => {
                let camera = camera.ok_or_else(|| incomplete(feature, "camera"))?;
                let viewport = data.viewport.ok_or_else(|| incomplete(feature, "viewport"))?;
                (None, Some(PointerCursor::new(camera, viewport)))
            }
        };

        let points: Vec<SpatialId> = groups
            .iter()
            .flat_map(|&group| shaped_children(&self.host.scene, group))
            .collect();
        if points.is_empty() {
            return Err(SetupError::Empty { feature, node: first });
        }
        for &point in &points {
            let component = TeleportPoint::new(groups.clone(), scene);
            spawn(&mut self.world, owner.as_ref(), point, component)?;
        }

        if let Some(cursor) = cursor
            && self.world.entities_with::<PointerCursor>().is_empty()
        {
            let entity = self.world.create_entity();
            self.world.attach(entity, cursor)?;
            debug!(entity = %entity, "mouse cursor created");
        }
        Ok(points.len())
    }

    fn add_carousel(&mut self, data: &mut FeatureData) -> Result<usize, SetupError> {
        let feature = FeatureKind::Carousel;
        let owner = owner(data, feature)?;
        let CarouselFeature {
            container,
            min_scroll,
            max_scroll,
        } = data
            .carousel
            .take()
            .ok_or_else(|| incomplete(feature, "carousel"))?;
        // The container X is clamped to [-max_scroll, min_scroll].
        let valid = min_scroll.is_finite() && max_scroll.is_finite() && -max_scroll <= min_scroll;
        if !valid {
            return Err(SetupError::InvalidRange {
                feature,
                min_scroll,
                max_scroll,
            });
        }
        let carousel = Carousel::new(container).with_scroll_range(min_scroll, max_scroll);
        spawn(&mut self.world, Some(&owner), container, carousel)?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use xr_math::Vec3;
    use xr_scene::{Handedness, Node, PerspectiveCamera, Shape};

    use super::*;
    use crate::components::TextEntry;
    use crate::testing;

    fn pointers(scene: &mut SceneGraph) -> Vec<Pointer> {
        [Handedness::Left, Handedness::Right]
            .into_iter()
            .map(|handedness| Pointer {
                handedness,
                node: scene.add(Node::new(format!("controller-{}", handedness.as_str()))),
                ray: None,
            })
            .collect()
    }

    fn shaped(name: &str) -> Node {
        Node::new(name).with_shape(Shape::Box {
            half_extents: Vec3::splat(0.1),
        })
    }

    fn teleport_groups(scene: &mut SceneGraph) -> Vec<SpatialId> {
        (0..2)
            .map(|i| {
                let group = scene.add(Node::new(format!("group-{i}")));
                scene.add_child(group, shaped("point").with_target(1 - i));
                scene.add_child(group, shaped("point").with_target(1 - i));
                group
            })
            .collect()
    }

    #[test]
    fn test_probe_resolution() {
        assert_eq!(
            SessionSupport::from_probe::<String>(Ok(true)),
            SessionSupport::Supported
        );
        assert_eq!(
            SessionSupport::from_probe::<String>(Ok(false)),
            SessionSupport::Unsupported
        );
        assert_eq!(
            SessionSupport::from_probe(Err("no runtime")),
            SessionSupport::Failed
        );
        assert_eq!(
            SessionSupport::Supported.pointer_capability(),
            PointerCapability::Session
        );
        assert_eq!(
            SessionSupport::Unsupported.pointer_capability(),
            PointerCapability::Mouse
        );
        assert_eq!(
            SessionSupport::Failed.pointer_capability(),
            PointerCapability::Mouse
        );
    }

    #[test]
    fn test_feature_list_from_json() {
        let kinds: Vec<FeatureKind> =
            serde_json::from_str(r#"["button", "draggable-return", "teleport-point"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                FeatureKind::Button,
                FeatureKind::DraggableReturn,
                FeatureKind::TeleportPoint
            ]
        );
        assert_eq!(
            FeatureKind::DraggableDefault.to_string(),
            "draggable-default"
        );
        assert!(serde_json::from_str::<FeatureKind>(r#""input-field""#).is_err());
    }

    #[test]
    fn test_incomplete_feature_is_skipped() {
        let mut scene = SceneGraph::new();
        let button = scene.add(shaped("button"));
        let player = scene.add(Node::new("player"));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![FeatureKind::Button, FeatureKind::Movement],
                data: FeatureData {
                    buttons: vec![ButtonFeature {
                        node: button,
                        on_click: None,
                    }],
                    player: Some(player),
                    ..FeatureData::default()
                },
            },
        );

        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            SetupError::Incomplete {
                feature: FeatureKind::Button,
                missing: "pointers"
            }
        ));
        assert_eq!(tick_loop.world().entity_count(), 0);
    }

    #[test]
    fn test_button_requires_click_handler() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let button = scene.add(shaped("button"));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![FeatureKind::Button],
                data: FeatureData {
                    pointers,
                    buttons: vec![ButtonFeature {
                        node: button,
                        on_click: None,
                    }],
                    ..FeatureData::default()
                },
            },
        );
        assert!(matches!(
            errors.as_slice(),
            [SetupError::Incomplete {
                missing: "on_click",
                ..
            }]
        ));
        assert!(tick_loop.world().entities_with::<Button>().is_empty());
    }

    #[test]
    fn test_keyboard_expands_shaped_keys() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let root = scene.add(Node::new("keyboard"));
        scene.add_child(root, shaped("a").with_label("a"));
        scene.add_child(root, shaped("enter").with_label("enter"));
        scene.add_child(root, Node::new("caption"));
        let camera = scene.add(Node::new("camera"));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![FeatureKind::Keyboard],
                data: FeatureData {
                    pointers,
                    keyboard: Some(KeyboardFeature {
                        root,
                        camera: Some(camera),
                        widget: Some(Box::new(TextEntry::new())),
                        on_submit: None,
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(errors.is_empty());

        let world = tick_loop.world();
        let keys = world.entities_with::<Keyboard>();
        assert_eq!(keys.len(), 2);
        for key in keys {
            let keyboard = world.get::<Keyboard>(key).unwrap();
            assert_eq!(keyboard.root, root);
            assert_eq!(keyboard.camera, Some(camera));
            assert_eq!(world.get::<PointerOwner>(key).unwrap().pointers.len(), 2);
        }
        assert!(tick_loop.host().handlers.widget(root).is_some());
    }

    #[test]
    fn test_keyboard_without_keys_is_empty() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let root = scene.add(Node::new("keyboard"));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![FeatureKind::Keyboard],
                data: FeatureData {
                    pointers,
                    keyboard: Some(KeyboardFeature {
                        root,
                        camera: None,
                        widget: None,
                        on_submit: None,
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(matches!(
            errors.as_slice(),
            [SetupError::Empty { node, .. }] if *node == root
        ));
    }

    #[test]
    fn test_draggable_systems_registered_on_demand() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let first = scene.add(shaped("cube"));
        let second = scene.add(shaped("sphere"));
        let (mut tick_loop, _) = testing::tick_loop(scene);
        let core = tick_loop.systems().system_count();

        for node in [first, second] {
            let errors = tick_loop.add_features(
                SessionSupport::Supported,
                Features {
                    required: vec![FeatureKind::DraggableReturn],
                    data: FeatureData {
                        pointers: pointers.clone(),
                        draggable_return: Some(node),
                        ..FeatureData::default()
                    },
                },
            );
            assert!(errors.is_empty());
        }

        assert_eq!(tick_loop.systems().system_count(), core + 1);
        assert!(tick_loop.systems().contains("draggable-return"));
        assert!(!tick_loop.systems().contains("draggable-default"));
        assert_eq!(
            tick_loop
                .world()
                .entities_with::<Draggable<ReturnToOrigin>>()
                .len(),
            2
        );
    }

    #[test]
    fn test_teleport_points_under_session() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let groups = teleport_groups(&mut scene);
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![FeatureKind::TeleportPoint],
                data: FeatureData {
                    pointers,
                    teleport_point: Some(TeleportPointFeature {
                        groups: groups.clone(),
                        scene: None,
                        camera: None,
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(errors.is_empty());

        let world = tick_loop.world();
        let points = world.entities_with::<TeleportPoint>();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|&p| world.has::<PointerOwner>(p)));
        assert!(
            world.get::<TeleportPoint>(points[0]).unwrap().groups == groups
        );
        assert!(world.entities_with::<PointerCursor>().is_empty());
    }

    #[test]
    fn test_teleport_points_fall_back_to_one_cursor() {
        let mut scene = SceneGraph::new();
        let groups = teleport_groups(&mut scene);
        let camera = scene.add(Node::new("camera").with_camera(PerspectiveCamera::default()));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Unsupported,
            Features {
                required: vec![FeatureKind::TeleportPoint],
                data: FeatureData {
                    viewport: Some(Viewport::new(0.0, 0.0, 800.0, 600.0)),
                    teleport_point: Some(TeleportPointFeature {
                        groups,
                        scene: None,
                        camera: Some(camera),
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(errors.is_empty());

        let world = tick_loop.world();
        let points = world.entities_with::<TeleportPoint>();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|&p| !world.has::<PointerOwner>(p)));
        assert_eq!(world.entities_with::<PointerCursor>().len(), 1);
    }

    #[test]
    fn test_mouse_fallback_needs_camera() {
        let mut scene = SceneGraph::new();
        let groups = teleport_groups(&mut scene);
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Failed,
            Features {
                required: vec![FeatureKind::TeleportPoint],
                data: FeatureData {
                    viewport: Some(Viewport::new(0.0, 0.0, 800.0, 600.0)),
                    teleport_point: Some(TeleportPointFeature {
                        groups,
                        scene: None,
                        camera: None,
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(matches!(
            errors.as_slice(),
            [SetupError::Incomplete {
                missing: "camera",
                ..
            }]
        ));
        assert!(tick_loop.world().entities_with::<TeleportPoint>().is_empty());
    }

    #[test]
    fn test_every_entity_has_at_most_one_capability() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let button = scene.add(shaped("button"));
        let cube = scene.add(shaped("cube"));
        let floor = scene.add(shaped("floor"));
        let container = scene.add(Node::new("carousel"));
        let player = scene.add(Node::new("player"));
        let groups = teleport_groups(&mut scene);
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let errors = tick_loop.add_features(
            SessionSupport::Supported,
            Features {
                required: vec![
                    FeatureKind::Button,
                    FeatureKind::DraggableDefault,
                    FeatureKind::Movement,
                    FeatureKind::TeleportDefault,
                    FeatureKind::TeleportPoint,
                    FeatureKind::Carousel,
                ],
                data: FeatureData {
                    pointers,
                    buttons: vec![ButtonFeature {
                        node: button,
                        on_click: Some(Box::new(|| {})),
                    }],
                    draggable_default: Some(cube),
                    player: Some(player),
                    teleport_default: Some(TeleportDefaultFeature {
                        floor,
                        marker: None,
                    }),
                    teleport_point: Some(TeleportPointFeature {
                        groups,
                        scene: None,
                        camera: None,
                    }),
                    carousel: Some(CarouselFeature {
                        container,
                        min_scroll: 0.0,
                        max_scroll: 1.0,
                    }),
                    ..FeatureData::default()
                },
            },
        );
        assert!(errors.is_empty());

        let world = tick_loop.world();
        let interactables = tick_loop.host().interactables.query();
        let capable = world.query(&interactables);
        assert_eq!(capable.len(), 8);
        for entity in capable {
            let types = world.signature(entity).unwrap();
            let count = tick_loop
                .host()
                .interactables
                .names()
                .filter(|name| types.contains(&xr_component::ComponentTypeId::from_name(name)))
                .count();
            assert_eq!(count, 1, "{entity} carries {count} capabilities");
        }
        assert_eq!(world.entities_with::<Locomotion>().len(), 1);
    }

    #[test]
    fn test_carousel_rejects_inverted_scroll_range() {
        let mut scene = SceneGraph::new();
        let pointers = pointers(&mut scene);
        let container = scene.add(Node::new("carousel"));
        let (mut tick_loop, _) = testing::tick_loop(scene);

        let ranges = [(-0.5, 0.2), (f32::NAN, 1.0), (0.0, f32::INFINITY)];
        for (min_scroll, max_scroll) in ranges {
            let errors = tick_loop.add_features(
                SessionSupport::Supported,
                Features {
                    required: vec![FeatureKind::Carousel],
                    data: FeatureData {
                        pointers: pointers.clone(),
                        carousel: Some(CarouselFeature {
                            container,
                            min_scroll,
                            max_scroll,
                        }),
                        ..FeatureData::default()
                    },
                },
            );
            assert!(matches!(
                errors.as_slice(),
                [SetupError::InvalidRange {
                    feature: FeatureKind::Carousel,
                    ..
                }]
            ));
        }
        assert!(tick_loop.world().entities_with::<Carousel>().is_empty());
    }
}
