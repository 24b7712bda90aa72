//! # Scene Tools
//!
//! Typed helpers over a host-owned scene tree: collectors, scene instancing,
//! and deferred subtree removal.
//!
//! The tree itself always belongs to a host engine. The library defines the
//! narrow contract a host binding implements ([`tree::SceneNode`] plus the
//! loader traits in [`assets`]) and builds every operation against that
//! contract, so the same queries run over any binding. The [`local`] module
//! ships a complete in-memory binding.
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_tools::prelude::*;
//!
//! let world = SceneWorld::new();
//! let root = world.spawn("Root", NodeKind::Group);
//! world.spawn_child(
//!     &root,
//!     "MainCamera",
//!     NodeKind::Camera {
//!         transform: Transform::from_position(Vec3::new(0.0, 2.0, 8.0)),
//!         fov_y_deg: 60.0,
//!     },
//! );
//!
//! let cameras: Vec<CameraNode> = collect_descendants(Some(&root));
//! assert_eq!(cameras.len(), 1);
//!
//! queue_free_children(Some(&root)).unwrap();
//! world.flush_deferred();
//! assert_eq!(world.node_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod assets;
pub mod config;
pub mod error;
pub mod foundation;
pub mod local;
pub mod tree;

pub use error::SceneError;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{
            instantiate_scene, instantiate_template, load_resource, ResourceSource, ResourceView,
            SceneInstantiator,
        },
        config::{Config, ConfigError},
        error::SceneError,
        foundation::math::{Transform, Vec3},
        local::{
            AssetLibrary, CameraNode, LightNode, MaterialDef, NodeId, NodeKind, SceneTemplate,
            SceneWorld, SpatialNode, WorldNode,
        },
        tree::{
            collect_children, collect_children_with, collect_descendants,
            collect_descendants_with, queue_free_children, DeferredFree, NodeView, SceneNode,
        },
    };
}
