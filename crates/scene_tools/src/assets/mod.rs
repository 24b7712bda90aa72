//! Typed resource loading and scene instancing
//!
//! The host owns the actual loader and the ability to materialize live nodes
//! from templates; this module wraps both behind presence and type
//! guarantees: an operation either returns the typed value or fails loudly.

mod loader;

pub use loader::{
    instantiate_scene, instantiate_template, load_resource, ResourceSource, ResourceView,
    SceneInstantiator,
};
