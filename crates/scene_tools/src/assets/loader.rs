//! Presence- and type-asserting wrappers over the host's loader

use crate::error::SceneError;
use crate::tree::{NodeView, SceneNode};
use std::any::type_name;

/// Host loader contract: fetch an opaque resource by path
pub trait ResourceSource {
    /// Opaque resource value the host hands back
    type Resource;

    /// Fetch the resource stored at `path`, if any
    fn fetch(&self, path: &str) -> Option<Self::Resource>;
}

/// Typed view over an opaque host resource
pub trait ResourceView<S: ResourceSource>: Sized {
    /// Attempt to view `resource` as this type
    fn try_view(resource: S::Resource) -> Option<Self>;
}

/// Host contract for materializing live nodes from templates
pub trait SceneInstantiator {
    /// Blueprint the host instantiates from
    type Template;

    /// Node handle produced by materialization
    type Node: SceneNode;

    /// Materialize a live, unparented node (sub)tree from `template`
    ///
    /// `None` means the host could not produce a node from this template.
    fn materialize(&self, template: &Self::Template) -> Option<Self::Node>;
}

/// Load the resource at `path` and view it as `R`
///
/// The presence guarantee is part of the contract: on success the typed
/// resource is returned, never an absent value.
///
/// # Errors
///
/// - [`SceneError::PreconditionViolation`] if `path` is empty
/// - [`SceneError::ResourceNotFound`] if the host loader has nothing at `path`
/// - [`SceneError::TypeMismatch`] if the resource cannot be viewed as `R`
pub fn load_resource<S, R>(source: &S, path: &str) -> Result<R, SceneError>
where
    S: ResourceSource,
    R: ResourceView<S>,
{
    if path.is_empty() {
        return Err(SceneError::PreconditionViolation(
            "load path must not be empty",
        ));
    }

    let resource = source
        .fetch(path)
        .ok_or_else(|| SceneError::ResourceNotFound {
            path: path.to_string(),
        })?;

    let typed = R::try_view(resource).ok_or_else(|| {
        SceneError::type_mismatch(type_name::<R>(), format!("resource at '{}'", path))
    })?;

    log::debug!("Loaded '{}' as {}", path, type_name::<R>());
    Ok(typed)
}

/// Load the template at `path`, materialize it, and view the result as `T`
///
/// # Errors
///
/// Everything [`load_resource`] raises for the template lookup, plus
/// [`SceneError::TypeMismatch`] when materialization produces nothing or the
/// produced node does not satisfy `T`.
pub fn instantiate_scene<S, H, T>(source: &S, host: &H, path: &str) -> Result<T, SceneError>
where
    S: ResourceSource,
    H: SceneInstantiator,
    H::Template: ResourceView<S>,
    T: NodeView<H::Node>,
{
    let template: H::Template = load_resource(source, path)?;
    instantiate_template(host, &template)
}

/// Materialize an already-loaded template and view the result as `T`
///
/// # Errors
///
/// [`SceneError::TypeMismatch`] when the host produces no node from the
/// template, or produces one that does not satisfy `T`. Both are the same
/// logical failure - a template that cannot yield the requested node type.
pub fn instantiate_template<H, T>(host: &H, template: &H::Template) -> Result<T, SceneError>
where
    H: SceneInstantiator,
    T: NodeView<H::Node>,
{
    let node = host.materialize(template).ok_or_else(|| {
        SceneError::type_mismatch(type_name::<T>(), "template that produced no node")
    })?;

    T::try_view(&node).ok_or_else(|| {
        SceneError::type_mismatch(type_name::<T>(), "instantiated node of another kind")
    })
}
