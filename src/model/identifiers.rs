//! Identifier newtypes.
//!
//! Surfaces, folds and timers are addressed through small copyable handles.
//! The controller identifier is a string because it is written to the
//! container's `id` attribute; it validates non-empty at construction.

use std::fmt;

/// Handle to one surface (element) owned by a [`Surface`](crate::surface::Surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one fold.
///
/// Unique within the controller that created it; survives `update()` for as
/// long as the fold's header stays in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FoldId(u64);

impl FoldId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fold-{}", self.0)
    }
}

/// Handle for a scheduled timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifier assigned to a controller's container (`handorgel1`, `handorgel2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerId(String);

impl ControllerId {
    /// Prefix used for generated identifiers.
    pub const PREFIX: &'static str = "handorgel";

    /// Smart constructor: validates non-empty identifier
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidControllerId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidControllerId::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(InvalidControllerId::Whitespace(raw));
        }
        Ok(Self(raw))
    }

    /// Generated identifier for the `n`th attached controller.
    pub fn numbered(n: u64) -> Self {
        Self(format!("{}{}", Self::PREFIX, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidControllerId {
    #[error("Controller ID cannot be empty")]
    Empty,
    #[error("Controller ID cannot contain whitespace: {0:?}")]
    Whitespace(String),
}
