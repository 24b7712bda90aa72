//! In-memory host binding
//!
//! A complete stand-in for an engine-owned scene tree, used by the tests and
//! the demo app: a slotmap-backed node arena with deferred removal, RON scene
//! templates, and an asset registry implementing the loader contract. Nothing
//! in the query layer depends on this module; any real engine binding can
//! replace it by implementing the same traits.

mod library;
mod template;
mod world;

pub use library::{
    AssetLibrary, LibraryError, LocalResource, MaterialDef, MATERIAL_SUFFIX, SCENE_SUFFIX,
};
pub use template::{SceneTemplate, TemplateKind, TemplateNode};
pub use world::{CameraNode, LightNode, NodeId, NodeKind, SceneWorld, SpatialNode, WorldNode};
