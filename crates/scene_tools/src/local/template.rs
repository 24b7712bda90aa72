//! RON scene templates and their materialization
//!
//! A template is the serialized blueprint of a node subtree. Payload fields
//! stay plain numbers on the wire; math types are only built when the
//! blueprint is materialized into a world.

use super::world::{NodeKind, SceneWorld, WorldNode};
use crate::assets::SceneInstantiator;
use crate::foundation::math::{Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A whole scene blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneTemplate {
    /// Root of the blueprint subtree
    pub root: TemplateNode,
}

impl SceneTemplate {
    /// Parse a template from RON text
    ///
    /// # Errors
    ///
    /// Returns the RON parse error, with position, on malformed input.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Number of nodes the blueprint describes
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(template) = stack.pop() {
            count += 1;
            stack.extend(template.children.iter());
        }
        count
    }
}

/// Blueprint for one node and its subtree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateNode {
    /// Node name
    pub name: String,

    /// Kind payload
    pub kind: TemplateKind,

    /// Child blueprints, in order
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

/// Kind payload in wire form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TemplateKind {
    /// Plain grouping node
    Group,

    /// Node positioned in 3D space
    Spatial {
        /// Position
        position: [f32; 3],
    },

    /// Perspective camera
    Camera {
        /// Position
        position: [f32; 3],
        /// Vertical field of view in degrees
        fov_y_deg: f32,
    },

    /// Point light
    Light {
        /// Position
        position: [f32; 3],
        /// Light color (linear RGB)
        color: [f32; 3],
        /// Brightness multiplier
        intensity: f32,
    },
}

impl TemplateKind {
    fn to_node_kind(&self) -> NodeKind {
        match self {
            Self::Group => NodeKind::Group,
            Self::Spatial { position } => NodeKind::Spatial {
                transform: Transform::from_position(Vec3::from(*position)),
            },
            Self::Camera {
                position,
                fov_y_deg,
            } => NodeKind::Camera {
                transform: Transform::from_position(Vec3::from(*position)),
                fov_y_deg: *fov_y_deg,
            },
            Self::Light {
                position,
                color,
                intensity,
            } => NodeKind::Light {
                transform: Transform::from_position(Vec3::from(*position)),
                color: Vec3::from(*color),
                intensity: *intensity,
            },
        }
    }
}

impl SceneInstantiator for SceneWorld {
    type Template = Rc<SceneTemplate>;
    type Node = WorldNode;

    /// Materialize the blueprint into fresh nodes, returning the unparented root
    fn materialize(&self, template: &Rc<SceneTemplate>) -> Option<WorldNode> {
        let root = self.spawn(template.root.name.as_str(), template.root.kind.to_node_kind());

        // Same explicit-stack shape as the collectors; blueprint depth is
        // caller-controlled data.
        let mut stack: Vec<(WorldNode, &TemplateNode)> = Vec::new();
        for child in template.root.children.iter().rev() {
            stack.push((root.clone(), child));
        }
        while let Some((parent, node_template)) = stack.pop() {
            let node = self.spawn_child(
                &parent,
                node_template.name.as_str(),
                node_template.kind.to_node_kind(),
            );
            for child in node_template.children.iter().rev() {
                stack.push((node.clone(), child));
            }
        }

        log::debug!(
            "Materialized scene '{}' ({} nodes)",
            template.root.name,
            template.node_count()
        );
        Some(root)
    }
}
