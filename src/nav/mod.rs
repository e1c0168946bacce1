//! Directional (D-pad) focus engine
//!
//! The front-end renders a [`ViewTree`], feeds raw key events into a
//! [`NavigationContext`] and acts on the returned [`KeyOutcome`].

pub mod context;
pub mod geometry;
pub mod keys;
pub mod registry;
pub mod resolver;
pub mod scroll;
pub mod tree;

#[cfg(test)]
pub mod testing;

pub use context::{KeyOutcome, NavigationContext};
pub use geometry::{Direction, Rect};
pub use keys::{normalize, Key, NavKey, RawKey};
pub use registry::FocusRegistry;
pub use resolver::{MoveContext, Resolution, SpatialResolver, Strategy};
pub use scroll::{ScrollController, ScrollSettings};
pub use tree::{
    Activation, ContainerKind, ElementKind, NodeId, NodeKind, NodeSpec, ScrollState, ViewTree,
};
