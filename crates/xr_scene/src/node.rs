//! Scene nodes and the data the interaction systems read from them.

use xr_math::{Aabb, Ray, Transform3D, Vec3};

use crate::camera::PerspectiveCamera;

/// Handle to a node in a [`SceneGraph`](crate::SceneGraph).
///
/// Components store handles, never node references, so a removed node turns
/// into a failed lookup instead of a dangling pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialId(pub u64);

impl std::fmt::Display for SpatialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spatial({})", self.0)
    }
}

/// Identifier of an environment texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Ray-testable geometry in the node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// Rectangle in the local XY plane, facing +Z.
    Quad { width: f32, height: f32 },
    /// Circle in the local XZ plane, facing +Y.
    Disc { radius: f32 },
}

impl Shape {
    /// Intersect a ray already transformed into local space.
    #[must_use]
    pub fn intersect(&self, local_ray: &Ray) -> Option<f32> {
        match *self {
            Shape::Sphere { radius } => local_ray.intersect_sphere(radius),
            Shape::Box { half_extents } => {
                local_ray.intersect_aabb(&Aabb::from_half_extents(half_extents))
            }
            Shape::Quad { width, height } => local_ray.intersect_quad(width, height),
            Shape::Disc { radius } => local_ray.intersect_disc(radius),
        }
    }

    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Shape::Sphere { radius } => Aabb::from_half_extents(Vec3::splat(radius)),
            Shape::Box { half_extents } => Aabb::from_half_extents(half_extents),
            Shape::Quad { width, height } => {
                Aabb::from_half_extents(Vec3::new(width * 0.5, height * 0.5, 0.0))
            }
            Shape::Disc { radius } => Aabb::from_half_extents(Vec3::new(radius, 0.0, radius)),
        }
    }
}

/// Flat-colour material. Colours are `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub color: u32,
}

/// Per-node data attached by scene construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    /// Key label on virtual keyboard keys.
    pub label: Option<String>,
    /// Environment texture a teleport point switches to.
    pub texture: Option<TextureId>,
    /// Index of the teleport group that becomes visible on arrival.
    pub target: Option<usize>,
    /// Spoken on arrival at a teleport point.
    pub speech: Option<String>,
}

/// A node of the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Transform relative to the parent.
    pub local: Transform3D,
    pub visible: bool,
    pub shape: Option<Shape>,
    pub material: Option<Material>,
    pub camera: Option<PerspectiveCamera>,
    pub data: NodeData,
    pub(crate) parent: Option<SpatialId>,
    pub(crate) children: Vec<SpatialId>,
    pub(crate) bounds: Option<Aabb>,
}

impl Node {
    /// An empty, visible group node at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform3D::IDENTITY,
            visible: true,
            shape: None,
            material: None,
            camera: None,
            data: NodeData::default(),
            parent: None,
            children: Vec::new(),
            bounds: None,
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.material = Some(Material { color });
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.local.position = position;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, local: Transform3D) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: PerspectiveCamera) -> Self {
        self.camera = Some(camera);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.data.texture = Some(texture);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: usize) -> Self {
        self.data.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_speech(mut self, text: impl Into<String>) -> Self {
        self.data.speech = Some(text.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<SpatialId> {
        self.parent
    }

    pub fn children(&self) -> &[SpatialId] {
        &self.children
    }

    /// World-space bounds of this subtree as of the last
    /// [`SceneGraph::recompute_bounds`](crate::SceneGraph::recompute_bounds).
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}
