//! Rendering-surface capability contract.
//!
//! The accordion core never talks to a concrete rendering technology. It
//! needs exactly these capabilities from its host:
//!
//! - selector lookup below a root, in document order
//! - attribute get / set / remove
//! - class add / remove / query
//! - input listener registration (the host routes input only to nodes with a
//!   registered listener)
//! - a cancellable timer, see [`Timers`](crate::timer::Timers)
//!
//! [`Document`](crate::dom::Document) is the in-memory implementation used by
//! the tests and the terminal demo.

pub mod selector;

pub use selector::{AttributeMatch, Combinator, Complex, Compound, Selector, SelectorError};

use crate::model::{ListenerKind, NodeId};
use crate::timer::Timers;

/// Capabilities a host must provide for folds to live on its elements.
pub trait Surface {
    /// Descendants of `root` (excluding `root`) matching `selector`, in document order.
    fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// First child that is an element.
    fn first_element_child(&self, node: NodeId) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Register interest in `kind` input events on `node`.
    fn listen(&mut self, node: NodeId, kind: ListenerKind);

    fn unlisten(&mut self, node: NodeId, kind: ListenerKind);

    fn is_listening(&self, node: NodeId, kind: ListenerKind) -> bool;
}

/// Borrowed host capabilities handed to every controller and fold operation.
pub struct Context<'a> {
    pub surface: &'a mut dyn Surface,
    pub timers: &'a mut dyn Timers,
}

impl<'a> Context<'a> {
    pub fn new(surface: &'a mut dyn Surface, timers: &'a mut dyn Timers) -> Self {
        Self { surface, timers }
    }

    /// Reborrow for a nested call.
    pub fn reborrow(&mut self) -> Context<'_> {
        Context {
            surface: &mut *self.surface,
            timers: &mut *self.timers,
        }
    }
}
