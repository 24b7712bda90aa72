//! In-memory scene world backed by a slotmap arena
//!
//! `SceneWorld` plays the host side of the node contract: it owns the tree,
//! hands out cheap [`WorldNode`] handles, and controls when queued deletions
//! actually happen. Single-threaded; handles share the world through
//! `Rc<RefCell<..>>`.

use crate::foundation::math::{Transform, Vec3};
use crate::tree::{DeferredFree, NodeView, SceneNode};
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Key identifying a node in a [`SceneWorld`] arena
    pub struct NodeId;
}

/// Runtime kind of a node, with per-kind payload
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node with no spatial data
    Group,

    /// Node positioned in 3D space
    Spatial {
        /// Local transform
        transform: Transform,
    },

    /// Perspective camera
    Camera {
        /// Local transform
        transform: Transform,
        /// Vertical field of view in degrees
        fov_y_deg: f32,
    },

    /// Point light
    Light {
        /// Local transform
        transform: Transform,
        /// Light color (linear RGB)
        color: Vec3,
        /// Brightness multiplier
        intensity: f32,
    },
}

impl NodeKind {
    /// Transform carried by this kind, if it is a spatial kind
    ///
    /// Cameras and lights are spatial kinds too - the transform capability
    /// spans every kind that sits somewhere in space.
    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Self::Group => None,
            Self::Spatial { transform }
            | Self::Camera { transform, .. }
            | Self::Light { transform, .. } => Some(transform),
        }
    }

    /// Short label used in debug output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Spatial { .. } => "Spatial",
            Self::Camera { .. } => "Camera",
            Self::Light { .. } => "Light",
        }
    }
}

#[derive(Debug)]
struct NodeData {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct WorldInner {
    nodes: SlotMap<NodeId, NodeData>,
    pending_free: Vec<NodeId>,
}

/// An in-memory scene tree acting as the host side of the node contract
#[derive(Debug, Clone, Default)]
pub struct SceneWorld {
    inner: Rc<RefCell<WorldInner>>,
}

impl SceneWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unparented node and return its handle
    pub fn spawn(&self, name: impl Into<String>, kind: NodeKind) -> WorldNode {
        let name = name.into();
        log::trace!("Spawning node '{}' ({})", name, kind.label());
        let id = self.inner.borrow_mut().nodes.insert(NodeData {
            name,
            kind,
            parent: None,
            children: Vec::new(),
        });
        WorldNode {
            world: self.clone(),
            id,
        }
    }

    /// Create a node attached as the last child of `parent`
    pub fn spawn_child(
        &self,
        parent: &WorldNode,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> WorldNode {
        let node = self.spawn(name, kind);
        let mut inner = self.inner.borrow_mut();
        if let Some(parent_data) = inner.nodes.get_mut(parent.id) {
            parent_data.children.push(node.id);
            if let Some(child_data) = inner.nodes.get_mut(node.id) {
                child_data.parent = Some(parent.id);
            }
        } else {
            log::warn!("spawn_child: parent is gone, node stays unparented");
        }
        node
    }

    /// Total number of live nodes
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Whether the world holds no nodes
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(id)
    }

    /// Number of removal requests waiting for the next flush
    pub fn pending_free(&self) -> usize {
        self.inner.borrow().pending_free.len()
    }

    /// Perform all queued removals - the host's "safe point"
    ///
    /// Each queued node is detached from its parent and dropped together with
    /// its whole subtree. Requests for nodes that are already gone (queued
    /// twice, or inside an earlier-flushed subtree) are silently skipped.
    /// Returns the number of nodes actually dropped.
    pub fn flush_deferred(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        let pending = std::mem::take(&mut inner.pending_free);
        let mut dropped = 0;

        for id in pending {
            if !inner.nodes.contains_key(id) {
                continue;
            }

            if let Some(parent) = inner.nodes.get(id).and_then(|data| data.parent) {
                if let Some(parent_data) = inner.nodes.get_mut(parent) {
                    parent_data.children.retain(|child| *child != id);
                }
            }

            let mut stack = vec![id];
            while let Some(current) = stack.pop() {
                if let Some(data) = inner.nodes.remove(current) {
                    stack.extend(data.children);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            log::debug!("Flushed deferred removals: {} nodes dropped", dropped);
        }
        dropped
    }
}

/// Cheap cloneable handle to a node in a [`SceneWorld`]
///
/// Handles may outlive their node; accessors return `None` once the node has
/// been flushed away.
#[derive(Debug, Clone)]
pub struct WorldNode {
    world: SceneWorld,
    id: NodeId,
}

impl WorldNode {
    /// Arena key of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// World this handle belongs to
    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    /// Whether the node is still present in the world
    pub fn is_alive(&self) -> bool {
        self.world.contains(self.id)
    }

    /// Node name, if the node is still alive
    pub fn name(&self) -> Option<String> {
        self.with_data(|data| data.name.clone())
    }

    /// Node kind, if the node is still alive
    pub fn kind(&self) -> Option<NodeKind> {
        self.with_data(|data| data.kind.clone())
    }

    fn with_data<R>(&self, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        let inner = self.world.inner.borrow();
        inner.nodes.get(self.id).map(f)
    }
}

impl PartialEq for WorldNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.world.inner, &other.world.inner)
    }
}

impl Eq for WorldNode {}

impl SceneNode for WorldNode {
    fn child_count(&self) -> usize {
        self.with_data(|data| data.children.len()).unwrap_or(0)
    }

    fn child(&self, index: usize) -> Option<Self> {
        let id = self.with_data(|data| data.children.get(index).copied())??;
        Some(Self {
            world: self.world.clone(),
            id,
        })
    }
}

impl DeferredFree for WorldNode {
    fn queue_free(&self) {
        log::trace!("queue_free on node {:?}", self.id);
        self.world.inner.borrow_mut().pending_free.push(self.id);
    }
}

/// View over any node kind that carries a transform
///
/// Matches `Spatial`, `Camera`, and `Light` nodes - the is-or-inherits
/// filter of the transform capability.
#[derive(Debug, Clone)]
pub struct SpatialNode {
    node: WorldNode,
    transform: Transform,
}

impl SpatialNode {
    /// The underlying node handle
    pub fn node(&self) -> &WorldNode {
        &self.node
    }

    /// Transform captured when the view was taken
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl NodeView<WorldNode> for SpatialNode {
    fn try_view(node: &WorldNode) -> Option<Self> {
        let transform = node.kind()?.transform()?.clone();
        Some(Self {
            node: node.clone(),
            transform,
        })
    }
}

/// View over camera nodes
#[derive(Debug, Clone)]
pub struct CameraNode {
    node: WorldNode,
    transform: Transform,
    fov_y_deg: f32,
}

impl CameraNode {
    /// The underlying node handle
    pub fn node(&self) -> &WorldNode {
        &self.node
    }

    /// Transform captured when the view was taken
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Vertical field of view in degrees
    pub fn fov_y_deg(&self) -> f32 {
        self.fov_y_deg
    }
}

impl NodeView<WorldNode> for CameraNode {
    fn try_view(node: &WorldNode) -> Option<Self> {
        match node.kind()? {
            NodeKind::Camera {
                transform,
                fov_y_deg,
            } => Some(Self {
                node: node.clone(),
                transform,
                fov_y_deg,
            }),
            _ => None,
        }
    }
}

/// View over light nodes
#[derive(Debug, Clone)]
pub struct LightNode {
    node: WorldNode,
    transform: Transform,
    color: Vec3,
    intensity: f32,
}

impl LightNode {
    /// The underlying node handle
    pub fn node(&self) -> &WorldNode {
        &self.node
    }

    /// Transform captured when the view was taken
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Light color (linear RGB)
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Brightness multiplier
    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

impl NodeView<WorldNode> for LightNode {
    fn try_view(node: &WorldNode) -> Option<Self> {
        match node.kind()? {
            NodeKind::Light {
                transform,
                color,
                intensity,
            } => Some(Self {
                node: node.clone(),
                transform,
                color,
                intensity,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{collect_children, collect_descendants, queue_free_children};

    /// Root
    /// ├── Rig (Spatial)
    /// │   ├── MainCamera (Camera)
    /// │   └── KeyLight (Light)
    /// └── Props (Group)
    ///     └── Crate (Spatial)
    fn build_world() -> (SceneWorld, WorldNode) {
        let world = SceneWorld::new();
        let root = world.spawn("Root", NodeKind::Group);

        let rig = world.spawn_child(
            &root,
            "Rig",
            NodeKind::Spatial {
                transform: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            },
        );
        world.spawn_child(
            &rig,
            "MainCamera",
            NodeKind::Camera {
                transform: Transform::from_position(Vec3::new(0.0, 2.0, 8.0)),
                fov_y_deg: 60.0,
            },
        );
        world.spawn_child(
            &rig,
            "KeyLight",
            NodeKind::Light {
                transform: Transform::from_position(Vec3::new(4.0, 4.0, 0.0)),
                color: Vec3::new(1.0, 0.9, 0.8),
                intensity: 2.0,
            },
        );

        let props = world.spawn_child(&root, "Props", NodeKind::Group);
        world.spawn_child(
            &props,
            "Crate",
            NodeKind::Spatial {
                transform: Transform::identity(),
            },
        );

        (world, root)
    }

    fn names(nodes: &[SpatialNode]) -> Vec<String> {
        nodes
            .iter()
            .map(|view| view.node().name().unwrap())
            .collect()
    }

    #[test]
    fn test_spawn_builds_ordered_children() {
        let (world, root) = build_world();
        assert_eq!(world.node_count(), 6);
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.child(0).unwrap().name().unwrap(), "Rig");
        assert_eq!(root.child(1).unwrap().name().unwrap(), "Props");
        assert_eq!(root.child(2), None);
    }

    #[test]
    fn test_spatial_view_spans_camera_and_light() {
        let (_world, root) = build_world();

        let spatials: Vec<SpatialNode> = collect_descendants(Some(&root));
        assert_eq!(
            names(&spatials),
            vec!["Rig", "MainCamera", "KeyLight", "Crate"]
        );
    }

    #[test]
    fn test_exact_kind_views() {
        let (_world, root) = build_world();

        let cameras: Vec<CameraNode> = collect_descendants(Some(&root));
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].fov_y_deg(), 60.0);
        assert_eq!(cameras[0].node().name().unwrap(), "MainCamera");

        let lights: Vec<LightNode> = collect_descendants(Some(&root));
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].intensity(), 2.0);

        let immediate: Vec<CameraNode> = collect_children(Some(&root));
        assert!(immediate.is_empty());
    }

    #[test]
    fn test_queue_free_children_then_flush_drops_subtrees() {
        let (world, root) = build_world();
        let rig = root.child(0).unwrap();

        let issued = queue_free_children(Some(&rig)).unwrap();
        assert_eq!(issued, 2);
        assert_eq!(world.pending_free(), 2);

        // Deletion is deferred: nothing is gone until the host flushes.
        assert_eq!(world.node_count(), 6);
        assert_eq!(rig.child_count(), 2);

        let dropped = world.flush_deferred();
        assert_eq!(dropped, 2);
        assert_eq!(world.node_count(), 4);
        assert_eq!(rig.child_count(), 0);
        assert!(rig.is_alive());
    }

    #[test]
    fn test_flush_drops_whole_subtree_of_queued_node() {
        let (world, root) = build_world();

        // Queue the two children of Root; Rig and Props take their own
        // children down with them.
        let issued = queue_free_children(Some(&root)).unwrap();
        assert_eq!(issued, 2);

        let dropped = world.flush_deferred();
        assert_eq!(dropped, 5);
        assert_eq!(world.node_count(), 1);
        assert!(root.is_alive());
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn test_double_queue_and_dead_handles_are_harmless() {
        let (world, root) = build_world();
        let rig = root.child(0).unwrap();

        rig.queue_free();
        rig.queue_free();
        assert_eq!(world.pending_free(), 2);

        let dropped = world.flush_deferred();
        assert_eq!(dropped, 3);
        assert!(!rig.is_alive());
        assert_eq!(rig.name(), None);
        assert_eq!(rig.kind().map(|k| k.label().to_string()), None);

        // Queueing through a dead handle is accepted and skipped at flush.
        rig.queue_free();
        assert_eq!(world.flush_deferred(), 0);
    }

    #[test]
    fn test_node_equality_is_identity() {
        let (world, root) = build_world();
        let first = root.child(0).unwrap();
        let again = root.child(0).unwrap();
        assert_eq!(first, again);

        let other_world = SceneWorld::new();
        let other_root = other_world.spawn("Root", NodeKind::Group);
        assert_ne!(root, other_root);
    }
}
