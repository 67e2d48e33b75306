//! Notifications published on a controller's event channel.

use super::identifiers::FoldId;
use std::fmt;

/// Kind of notification.
///
/// Controller lifecycle kinds carry no fold; every other kind is emitted on
/// behalf of one fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Controller teardown is about to start.
    Destroy,
    /// Controller teardown finished.
    Destroyed,
    /// A fold is about to open. Consumed by the controller's single-open policy.
    FoldOpen,
    /// A fold started opening.
    Open,
    /// A fold finished its opening transition.
    Opened,
    /// A fold started closing.
    Close,
    /// A fold finished its closing transition.
    Closed,
    /// A fold's button received focus.
    Focus,
    /// A fold's button lost focus.
    Blur,
    /// A fold was disabled.
    Disable,
    /// A fold was enabled.
    Enable,
}

impl EventKind {
    /// Event name as exposed to listeners.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Destroy => "destroy",
            EventKind::Destroyed => "destroyed",
            EventKind::FoldOpen => "fold:open",
            EventKind::Open => "open",
            EventKind::Opened => "opened",
            EventKind::Close => "close",
            EventKind::Closed => "closed",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Disable => "disable",
            EventKind::Enable => "enable",
        }
    }

    /// Whether this kind is part of the controller/fold coordination protocol
    /// rather than meant for outside consumers.
    pub fn is_internal(self) -> bool {
        matches!(self, EventKind::FoldOpen)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub fold: Option<FoldId>,
}

impl Event {
    pub fn controller(kind: EventKind) -> Self {
        Self { kind, fold: None }
    }

    pub fn fold(kind: EventKind, fold: FoldId) -> Self {
        Self {
            kind,
            fold: Some(fold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_open_is_the_only_internal_kind() {
        let kinds = [
            EventKind::Destroy,
            EventKind::Destroyed,
            EventKind::FoldOpen,
            EventKind::Open,
            EventKind::Opened,
            EventKind::Close,
            EventKind::Closed,
            EventKind::Focus,
            EventKind::Blur,
            EventKind::Disable,
            EventKind::Enable,
        ];
        let internal: Vec<_> = kinds.iter().filter(|k| k.is_internal()).collect();
        assert_eq!(internal, vec![&EventKind::FoldOpen]);
    }

    #[test]
    fn event_names_match_listener_names() {
        assert_eq!(EventKind::FoldOpen.to_string(), "fold:open");
        assert_eq!(EventKind::Opened.as_str(), "opened");
    }

    #[test]
    fn controller_events_carry_no_fold() {
        let event = Event::controller(EventKind::Destroy);
        assert_eq!(event.fold, None);

        let event = Event::fold(EventKind::Open, FoldId::new(2));
        assert_eq!(event.fold, Some(FoldId::new(2)));
    }
}
