//! Scene-tree contract and typed collectors
//!
//! The tree itself is owned by a host engine; this module only defines the
//! narrow handle contract a host binding implements ([`SceneNode`],
//! [`DeferredFree`]) and the query operations written against it. Queries
//! never mutate the tree; the one side-effecting operation
//! ([`queue_free_children`]) only hands removal requests to the host.

mod collect;
mod node;

pub use collect::{
    collect_children, collect_children_with, collect_descendants, collect_descendants_with,
    queue_free_children,
};
pub use node::{Children, DeferredFree, NodeView, SceneNode};
