//! Input events delivered by the host surface, and focus traversal targets.

use std::fmt;
use std::str::FromStr;

/// Key identity for key-down events.
///
/// Only the keys the accordion reacts to are named; everything else arrives
/// as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Other,
}

/// A key-down with its Ctrl modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    pub const fn new(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub const fn with_ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// Input event kinds a fold subscribes to on its surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Click,
    KeyDown,
    Focus,
    Blur,
}

/// An input event dispatched by the host to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Click,
    KeyDown(KeyPress),
    Focus,
    Blur,
}

impl InputEvent {
    pub fn listener_kind(self) -> ListenerKind {
        match self {
            InputEvent::Click => ListenerKind::Click,
            InputEvent::KeyDown(_) => ListenerKind::KeyDown,
            InputEvent::Focus => ListenerKind::Focus,
            InputEvent::Blur => ListenerKind::Blur,
        }
    }
}

/// Result of dispatching an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// No listener handled the event.
    #[default]
    Ignored,
    /// A listener handled the event.
    Handled,
    /// A listener handled the event and the host's default action must not run.
    DefaultPrevented,
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        !matches!(self, Dispatch::Ignored)
    }
}

/// Destination of a keyboard focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Prev,
    Next,
    First,
    Last,
}

impl FocusTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            FocusTarget::Prev => "prev",
            FocusTarget::Next => "next",
            FocusTarget::First => "first",
            FocusTarget::Last => "last",
        }
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown focus target {0:?} (expected prev, next, first or last)")]
pub struct UnknownFocusTarget(pub String);

impl FromStr for FocusTarget {
    type Err = UnknownFocusTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(FocusTarget::Prev),
            "next" => Ok(FocusTarget::Next),
            "first" => Ok(FocusTarget::First),
            "last" => Ok(FocusTarget::Last),
            other => Err(UnknownFocusTarget(other.to_string())),
        }
    }
}
