//! Demo-level keyboard actions independent of key bindings.

/// Actions the terminal demo handles itself.
///
/// Keys without a binding are not dropped: the demo forwards them to the
/// focused header button as key-down events, where the accordion's own
/// navigation keys (arrows, Home/End, Ctrl+PageUp/PageDown) take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Move focus to the next header button, as a browser Tab would. Default: Tab
    FocusNext,
    /// Move focus to the previous header button. Default: Shift+Tab
    FocusPrev,
    /// Click the focused header button. Default: Enter/Space
    Activate,
    /// Exit the demo. Default: q/Esc/Ctrl+c
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_actions_are_distinct() {
        assert_ne!(KeyAction::FocusNext, KeyAction::FocusPrev);
    }

    #[test]
    fn actions_are_copy() {
        let action = KeyAction::Activate;
        let copied = action;
        assert_eq!(action, copied);
    }
}
