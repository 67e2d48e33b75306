//! Domain model types (pure).
//!
//! Identifiers, published events and input events shared by the fold,
//! the controller and the surfaces they drive.

pub mod event;
pub mod identifiers;
pub mod input;
pub mod key_action;

// Re-export for convenience
pub use event::{Event, EventKind};
pub use identifiers::{ControllerId, FoldId, InvalidControllerId, NodeId, TimerId};
pub use input::{
    Dispatch, FocusTarget, InputEvent, Key, KeyPress, ListenerKind, UnknownFocusTarget,
};
pub use key_action::KeyAction;
