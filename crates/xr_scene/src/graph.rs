//! The scene graph.
//!
//! Nodes live in a flat map keyed by [`SpatialId`]; hierarchy is expressed
//! through parent/children IDs. World transforms are computed on demand by
//! walking the parent chain, so moving a node never leaves a stale matrix
//! behind.

use std::collections::HashMap;

use xr_math::{Aabb, Mat4, Ray, Transform3D, Vec2, Vec3};

use crate::node::{Node, SpatialId, TextureId};

/// One intersection of a ray with a node's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The node whose shape was hit.
    pub node: SpatialId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Background and image-based lighting of a scene root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub background: Option<TextureId>,
    pub lighting: Option<TextureId>,
}

/// In-memory scene graph.
#[derive(Debug, Default)]
pub struct SceneGraph {
    next_id: u64,
    nodes: HashMap<SpatialId, Node>,
    /// Environment per scene root.
    environments: HashMap<SpatialId, Environment>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root-level node.
    pub fn add(&mut self, node: Node) -> SpatialId {
        self.insert(node, None)
    }

    /// Add `node` as the last child of `parent`. An unknown parent makes the
    /// node a root.
    pub fn add_child(&mut self, parent: SpatialId, node: Node) -> SpatialId {
        let parent = self.nodes.contains_key(&parent).then_some(parent);
        self.insert(node, parent)
    }

    fn insert(&mut self, mut node: Node, parent: Option<SpatialId>) -> SpatialId {
        self.next_id += 1;
        let id = SpatialId(self.next_id);
        node.parent = parent;
        node.children.clear();
        node.bounds = None;
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        self.nodes.insert(id, node);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: SpatialId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn node(&self, id: SpatialId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn node_mut(&mut self, id: SpatialId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    #[must_use]
    pub fn parent(&self, id: SpatialId) -> Option<SpatialId> {
        self.nodes.get(&id)?.parent
    }

    /// Direct children of `id`; empty for unknown nodes.
    #[must_use]
    pub fn children(&self, id: SpatialId) -> &[SpatialId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// First descendant of `id` (depth first) with the given name.
    #[must_use]
    pub fn find_descendant(&self, id: SpatialId, name: &str) -> Option<SpatialId> {
        for &child in self.children(id) {
            if self.nodes.get(&child).is_some_and(|n| n.name == name) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, name) {
                return Some(found);
            }
        }
        None
    }

    #[must_use]
    pub fn local(&self, id: SpatialId) -> Option<Transform3D> {
        self.nodes.get(&id).map(|n| n.local)
    }

    pub fn set_local(&mut self, id: SpatialId, local: Transform3D) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: SpatialId, position: Vec3) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.local.position = position;
                true
            }
            None => false,
        }
    }

    /// Local-to-world matrix. Unknown nodes yield the identity.
    #[must_use]
    pub fn world_matrix(&self, id: SpatialId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            matrix = node.local.to_matrix() * matrix;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        matrix
    }

    #[must_use]
    pub fn world_transform(&self, id: SpatialId) -> Transform3D {
        Transform3D::from_matrix(self.world_matrix(id))
    }

    #[must_use]
    pub fn world_position(&self, id: SpatialId) -> Vec3 {
        self.world_matrix(id).w_axis.truncate()
    }

    /// Place `id` so that its world matrix equals `world`.
    pub fn set_world_matrix(&mut self, id: SpatialId, world: Mat4) -> bool {
        let parent_world = self
            .parent(id)
            .map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
        self.set_local(id, Transform3D::from_matrix(parent_world.inverse() * world))
    }

    /// The node's own visibility flag.
    #[must_use]
    pub fn is_visible(&self, id: SpatialId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.visible)
    }

    pub fn set_visible(&mut self, id: SpatialId, visible: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// `true` if the node and all of its ancestors are visible.
    #[must_use]
    pub fn is_visible_in_tree(&self, id: SpatialId) -> bool {
        let mut current = self.nodes.get(&id);
        if current.is_none() {
            return false;
        }
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        true
    }

    /// `true` if `id` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: SpatialId, id: SpatialId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    #[must_use]
    pub fn color(&self, id: SpatialId) -> Option<u32> {
        self.nodes.get(&id)?.material.map(|m| m.color)
    }

    /// Set the material colour. Nodes without a material are left alone.
    pub fn set_color(&mut self, id: SpatialId, color: u32) -> bool {
        match self.nodes.get_mut(&id).and_then(|n| n.material.as_mut()) {
            Some(material) => {
                material.color = color;
                true
            }
            None => false,
        }
    }

    /// The ray a tracked pointer emits: from its world position along its
    /// local −Z axis rotated into world space.
    #[must_use]
    pub fn pointer_ray(&self, id: SpatialId) -> Ray {
        let (_, rotation, origin) = self.world_matrix(id).to_scale_rotation_translation();
        Ray::new(origin, rotation * Vec3::NEG_Z)
    }

    /// Ray from the camera on node `id` through normalised device
    /// coordinate `ndc`.
    #[must_use]
    pub fn camera_ray(&self, id: SpatialId, ndc: Vec2) -> Option<Ray> {
        let camera = self.nodes.get(&id)?.camera?;
        let world = self.world_matrix(id);
        let inverse_view_projection = (camera.projection() * world.inverse()).inverse();
        let far = inverse_view_projection.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let origin = world.w_axis.truncate();
        Some(Ray::new(origin, far - origin))
    }

    /// Intersect `ray` with the visible subtree rooted at `root`, nearest hit
    /// first.
    #[must_use]
    pub fn raycast(&self, root: SpatialId, ray: &Ray) -> Vec<RayHit> {
        self.raycast_all(&[root], ray)
    }

    /// Intersect `ray` with several subtrees, nearest hit first. Roots under
    /// a hidden ancestor are skipped.
    #[must_use]
    pub fn raycast_all(&self, roots: &[SpatialId], ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for &root in roots {
            if !self.is_visible_in_tree(root) {
                continue;
            }
            let parent_world = self
                .parent(root)
                .map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
            self.collect_hits(root, parent_world, ray, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn collect_hits(&self, id: SpatialId, parent_world: Mat4, ray: &Ray, hits: &mut Vec<RayHit>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let world = parent_world * node.local.to_matrix();
        if let Some(shape) = node.shape
            && world.determinant().abs() > f32::EPSILON
        {
            let local_ray = ray.transformed(&world.inverse());
            if let Some(distance) = shape.intersect(&local_ray) {
                hits.push(RayHit {
                    node: id,
                    point: ray.at(distance),
                    distance,
                });
            }
        }
        for &child in &node.children {
            self.collect_hits(child, world, ray, hits);
        }
    }

    /// Recompute world-space bounds for every node in the subtree of `root`
    /// and return the root's bounds.
    pub fn recompute_bounds(&mut self, root: SpatialId) -> Option<Aabb> {
        let parent_world = self
            .parent(root)
            .map_or(Mat4::IDENTITY, |p| self.world_matrix(p));
        self.compute_bounds(root, parent_world)
    }

    fn compute_bounds(&mut self, id: SpatialId, parent_world: Mat4) -> Option<Aabb> {
        let (world, own, children) = {
            let node = self.nodes.get(&id)?;
            let world = parent_world * node.local.to_matrix();
            let own = node.shape.map(|s| s.local_bounds().transformed(&world));
            (world, own, node.children.clone())
        };

        let mut bounds = own;
        for child in children {
            if let Some(child_bounds) = self.compute_bounds(child, world) {
                bounds = Some(match bounds {
                    Some(b) => b.union(&child_bounds),
                    None => child_bounds,
                });
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.bounds = bounds;
        }
        bounds
    }

    #[must_use]
    pub fn bounds(&self, id: SpatialId) -> Option<Aabb> {
        self.nodes.get(&id)?.bounds
    }

    #[must_use]
    pub fn environment(&self, root: SpatialId) -> Environment {
        self.environments.get(&root).copied().unwrap_or_default()
    }

    pub fn set_environment(&mut self, root: SpatialId, environment: Environment) {
        self.environments.insert(root, environment);
    }
}
