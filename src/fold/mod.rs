//! One header/content pair and its state machine.
//!
//! A fold owns the classes, ARIA attributes and input listeners it puts on
//! its header button and content surfaces. It never touches its siblings:
//! everything that crosses fold boundaries (single-open policy, focus
//! traversal) is published as an [`Event`] or returned as an
//! [`InputOutcome`] for the controller to act on.
//!
//! Observable phases:
//!
//! ```text
//!            open()                 timer
//!  Closed ──────────▶ Opening ──────────────▶ Open
//!    ▲                  │ close()               │ close()
//!    │      timer       ▼                       ▼
//!    └────────────── Closing ◀──────────────────┘
//! ```
//!
//! With transitions disabled (or a zero duration) the timer step is skipped.

use crate::config::{FoldClass, Options, Part};
use crate::model::{
    Event, EventKind, FocusTarget, FoldId, InputEvent, Key, KeyPress, ListenerKind, NodeId,
    TimerId,
};
use crate::surface::Surface;
use crate::timer::Timers;
use std::time::Duration;
use tracing::debug;

const BUTTON_LISTENERS: [ListenerKind; 4] = [
    ListenerKind::Click,
    ListenerKind::KeyDown,
    ListenerKind::Focus,
    ListenerKind::Blur,
];
const CONTENT_LISTENERS: [ListenerKind; 1] = [ListenerKind::KeyDown];

const AUTOFOCUS_ATTRIBUTE: &str = "autofocus";
const ID_ATTRIBUTE: &str = "id";

/// Everything a fold may use from its owner during one call.
///
/// This is the fold's view of its controller: the shared options, the host
/// capabilities, and the outbox where published events are queued for the
/// controller to process once the call returns.
pub struct FoldEnv<'a> {
    pub surface: &'a mut dyn Surface,
    pub timers: &'a mut dyn Timers,
    pub options: &'a Options,
    pub outbox: &'a mut Vec<Event>,
}

/// Observable transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// What the controller must do after a fold handled an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Handled,
    /// A navigation key was pressed; move focus and suppress the key's default.
    Navigate(FocusTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Opening,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTransition {
    timer: TimerId,
    direction: Direction,
}

/// ARIA attributes a fold maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aria {
    Controls,
    Expanded,
    Disabled,
    Role,
    LabelledBy,
}

impl Aria {
    const ALL: [Aria; 5] = [
        Aria::Controls,
        Aria::Expanded,
        Aria::Disabled,
        Aria::Role,
        Aria::LabelledBy,
    ];

    fn name(self) -> &'static str {
        match self {
            Aria::Controls => "aria-controls",
            Aria::Expanded => "aria-expanded",
            Aria::Disabled => "aria-disabled",
            Aria::Role => "role",
            Aria::LabelledBy => "aria-labelledby",
        }
    }
}

#[derive(Debug)]
pub struct Fold {
    id: FoldId,
    header: NodeId,
    button: NodeId,
    content: NodeId,
    open: bool,
    disabled: bool,
    focused: bool,
    pending: Option<PendingTransition>,
    generated_header_id: bool,
    generated_content_id: bool,
}

impl Fold {
    /// Attach a fold to `header`/`content`.
    ///
    /// Surfaces without an id get `<id_prefix>-header-<n>` and
    /// `<id_prefix>-content-<n>`, where `n` is the fold's sequence number.
    /// Initial open and initial focus are applied here and published through
    /// the outbox.
    pub fn new(
        env: &mut FoldEnv<'_>,
        id: FoldId,
        header: NodeId,
        content: NodeId,
        id_prefix: &str,
    ) -> Self {
        let button = env.surface.first_element_child(header).unwrap_or(header);

        let generated_header_id = ensure_id(env.surface, header, || {
            format!("{id_prefix}-header-{}", id.get())
        });
        let generated_content_id = ensure_id(env.surface, content, || {
            format!("{id_prefix}-content-{}", id.get())
        });

        let mut fold = Self {
            id,
            header,
            button,
            content,
            open: false,
            disabled: false,
            focused: false,
            pending: None,
            generated_header_id,
            generated_content_id,
        };

        debug!(fold = %id, header = %header, content = %content, "fold attached");

        fold.bind(env.surface);
        fold.init_aria(env);
        fold.initial_open(env);
        fold.initial_focus(env);
        fold
    }

    pub fn id(&self) -> FoldId {
        self.id
    }

    pub fn header(&self) -> NodeId {
        self.header
    }

    /// The interactive element inside the header (the header itself if it has no child).
    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn phase(&self) -> Phase {
        match (self.open, self.pending.map(|p| p.direction)) {
            (true, Some(Direction::Opening)) => Phase::Opening,
            (true, _) => Phase::Open,
            (false, Some(Direction::Closing)) => Phase::Closing,
            (false, _) => Phase::Closed,
        }
    }

    /// Whether `node` is one of the surfaces this fold listens on.
    pub fn owns(&self, node: NodeId) -> bool {
        node == self.button || node == self.header || node == self.content
    }

    /// Open with the configured transition (or immediately if `transition` is false).
    ///
    /// No-op if already open or disabled. Returns whether the state changed.
    pub fn open(&mut self, env: &mut FoldEnv<'_>, transition: bool) -> bool {
        let delay = transition.then_some(env.options.transition_duration);
        self.open_after(env, delay)
    }

    /// Close with the configured transition (or immediately if `transition` is false).
    ///
    /// Honored on a disabled fold: the controller's single-open policy must be
    /// able to close a fold that non-collapsible mode has locked open.
    pub fn close(&mut self, env: &mut FoldEnv<'_>, transition: bool) -> bool {
        if !self.open {
            return false;
        }

        env.outbox.push(Event::fold(EventKind::Close, self.id));
        self.open = false;
        debug!(fold = %self.id, "closing");

        if !env.options.collapsible {
            self.enable(env);
        }

        self.update_aria(env, Aria::Expanded);
        self.remove_class(env.surface, env.options, FoldClass::Opened);
        self.cancel_pending(env.timers);

        let delay = transition.then_some(env.options.transition_duration);
        match delay.filter(|d| !d.is_zero()) {
            Some(delay) => self.schedule(env.timers, delay, Direction::Closing),
            None => self.finish_close(env),
        }
        true
    }

    pub fn toggle(&mut self, env: &mut FoldEnv<'_>, transition: bool) -> bool {
        if self.open {
            self.close(env, transition)
        } else {
            self.open(env, transition)
        }
    }

    pub fn disable(&mut self, env: &mut FoldEnv<'_>) -> bool {
        if self.disabled {
            return false;
        }
        self.disabled = true;
        self.update_aria(env, Aria::Disabled);
        self.add_class(env.surface, env.options, FoldClass::Disabled);
        env.outbox.push(Event::fold(EventKind::Disable, self.id));
        true
    }

    pub fn enable(&mut self, env: &mut FoldEnv<'_>) -> bool {
        if !self.disabled {
            return false;
        }
        self.disabled = false;
        self.update_aria(env, Aria::Disabled);
        self.remove_class(env.surface, env.options, FoldClass::Disabled);
        env.outbox.push(Event::fold(EventKind::Enable, self.id));
        true
    }

    /// Mark focused. The controller blurs any other focused fold first.
    pub fn focus(&mut self, env: &mut FoldEnv<'_>) -> bool {
        if self.focused {
            return false;
        }
        self.focused = true;
        self.add_class(env.surface, env.options, FoldClass::Focus);
        env.outbox.push(Event::fold(EventKind::Focus, self.id));
        true
    }

    pub fn blur(&mut self, env: &mut FoldEnv<'_>) -> bool {
        if !self.focused {
            return false;
        }
        self.focused = false;
        self.remove_class(env.surface, env.options, FoldClass::Focus);
        env.outbox.push(Event::fold(EventKind::Blur, self.id));
        true
    }

    /// Finish the pending transition if `timer` is the one this fold scheduled.
    pub fn complete_transition(&mut self, env: &mut FoldEnv<'_>, timer: TimerId) -> bool {
        match self.pending {
            Some(pending) if pending.timer == timer => {
                self.pending = None;
                match pending.direction {
                    Direction::Opening => self.finish_open(env),
                    Direction::Closing => self.finish_close(env),
                }
                true
            }
            _ => false,
        }
    }

    /// Whether `timer` belongs to this fold's pending transition.
    pub fn awaits(&self, timer: TimerId) -> bool {
        self.pending.is_some_and(|p| p.timer == timer)
    }

    /// React to an input event on one of this fold's surfaces.
    pub fn handle_input(
        &mut self,
        env: &mut FoldEnv<'_>,
        node: NodeId,
        event: InputEvent,
    ) -> InputOutcome {
        match event {
            InputEvent::Click if node == self.button => {
                if self.disabled {
                    debug!(fold = %self.id, "click ignored on disabled fold");
                    return InputOutcome::Ignored;
                }
                self.toggle(env, true);
                InputOutcome::Handled
            }
            InputEvent::Focus if node == self.button => {
                self.focus(env);
                InputOutcome::Handled
            }
            InputEvent::Blur if node == self.button => {
                self.blur(env);
                InputOutcome::Handled
            }
            InputEvent::KeyDown(press) if env.options.keyboard_interaction => {
                let target = if node == self.button {
                    button_navigation(press)
                } else if node == self.content {
                    content_navigation(press)
                } else {
                    None
                };
                target.map_or(InputOutcome::Ignored, InputOutcome::Navigate)
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Remove everything this fold applied to its surfaces.
    ///
    /// Cancels a pending transition so no completion can reach a detached fold.
    pub fn destroy(mut self, env: &mut FoldEnv<'_>) {
        self.cancel_pending(env.timers);
        self.unbind(env.surface);
        self.clean_aria(env.surface);

        for class in [
            FoldClass::Open,
            FoldClass::Opened,
            FoldClass::Disabled,
            FoldClass::Focus,
        ] {
            self.remove_class(env.surface, env.options, class);
        }

        if self.generated_header_id {
            env.surface.remove_attribute(self.header, ID_ATTRIBUTE);
        }
        if self.generated_content_id {
            env.surface.remove_attribute(self.content, ID_ATTRIBUTE);
        }

        self.open = false;
        self.disabled = false;
        self.focused = false;
        debug!(fold = %self.id, "fold detached");
    }

    fn open_after(&mut self, env: &mut FoldEnv<'_>, delay: Option<Duration>) -> bool {
        if self.open || self.disabled {
            return false;
        }

        env.outbox.push(Event::fold(EventKind::FoldOpen, self.id));
        env.outbox.push(Event::fold(EventKind::Open, self.id));
        self.open = true;
        debug!(fold = %self.id, ?delay, "opening");

        if !env.options.collapsible {
            self.disable(env);
        }

        self.update_aria(env, Aria::Expanded);
        self.add_class(env.surface, env.options, FoldClass::Open);
        self.cancel_pending(env.timers);

        match delay.filter(|d| !d.is_zero()) {
            Some(delay) => self.schedule(env.timers, delay, Direction::Opening),
            None => self.finish_open(env),
        }
        true
    }

    fn finish_open(&mut self, env: &mut FoldEnv<'_>) {
        self.add_class(env.surface, env.options, FoldClass::Opened);
        env.outbox.push(Event::fold(EventKind::Opened, self.id));
    }

    fn finish_close(&mut self, env: &mut FoldEnv<'_>) {
        self.remove_class(env.surface, env.options, FoldClass::Open);
        env.outbox.push(Event::fold(EventKind::Closed, self.id));
    }

    fn schedule(&mut self, timers: &mut dyn Timers, delay: Duration, direction: Direction) {
        let timer = timers.schedule(delay);
        self.pending = Some(PendingTransition { timer, direction });
    }

    fn cancel_pending(&mut self, timers: &mut dyn Timers) {
        if let Some(pending) = self.pending.take() {
            timers.cancel(pending.timer);
        }
    }

    fn initial_open(&mut self, env: &mut FoldEnv<'_>) {
        let marker = env.options.initial_open_attribute.as_str();
        let marked = env.surface.has_attribute(self.header, marker)
            || env.surface.has_attribute(self.content, marker);
        if !marked {
            return;
        }

        let delay = env
            .options
            .initial_open_transition
            .then_some(env.options.initial_open_transition_delay);
        self.open_after(env, delay);
    }

    fn initial_focus(&mut self, env: &mut FoldEnv<'_>) {
        if env.surface.has_attribute(self.button, AUTOFOCUS_ATTRIBUTE) {
            self.focus(env);
        }
    }

    fn bind(&self, surface: &mut dyn Surface) {
        for kind in BUTTON_LISTENERS {
            surface.listen(self.button, kind);
        }
        for kind in CONTENT_LISTENERS {
            surface.listen(self.content, kind);
        }
    }

    fn unbind(&self, surface: &mut dyn Surface) {
        for kind in BUTTON_LISTENERS {
            surface.unlisten(self.button, kind);
        }
        for kind in CONTENT_LISTENERS {
            surface.unlisten(self.content, kind);
        }
    }

    fn init_aria(&self, env: &mut FoldEnv<'_>) {
        for attribute in Aria::ALL {
            self.update_aria(env, attribute);
        }
    }

    fn update_aria(&self, env: &mut FoldEnv<'_>, attribute: Aria) {
        if !env.options.aria_enabled {
            return;
        }

        let (node, value) = match attribute {
            Aria::Controls => (
                self.button,
                env.surface
                    .attribute(self.content, ID_ATTRIBUTE)
                    .unwrap_or_default(),
            ),
            Aria::Expanded => (self.button, bool_attribute(self.open)),
            Aria::Disabled => (self.button, bool_attribute(self.disabled)),
            Aria::Role => (self.content, "region".to_string()),
            Aria::LabelledBy => (
                self.content,
                env.surface
                    .attribute(self.header, ID_ATTRIBUTE)
                    .unwrap_or_default(),
            ),
        };
        env.surface.set_attribute(node, attribute.name(), &value);
    }

    fn clean_aria(&self, surface: &mut dyn Surface) {
        for attribute in [Aria::Controls, Aria::Expanded, Aria::Disabled] {
            surface.remove_attribute(self.button, attribute.name());
        }
        for attribute in [Aria::Role, Aria::LabelledBy] {
            surface.remove_attribute(self.content, attribute.name());
        }
    }

    fn add_class(&self, surface: &mut dyn Surface, options: &Options, class: FoldClass) {
        surface.add_class(self.header, options.classes.get(Part::Header, class));
        surface.add_class(self.content, options.classes.get(Part::Content, class));
    }

    fn remove_class(&self, surface: &mut dyn Surface, options: &Options, class: FoldClass) {
        surface.remove_class(self.header, options.classes.get(Part::Header, class));
        surface.remove_class(self.content, options.classes.get(Part::Content, class));
    }
}

/// Give `node` an id if it has none. Returns whether one was generated.
fn ensure_id(surface: &mut dyn Surface, node: NodeId, generate: impl FnOnce() -> String) -> bool {
    if surface
        .attribute(node, ID_ATTRIBUTE)
        .is_some_and(|id| !id.is_empty())
    {
        return false;
    }
    surface.set_attribute(node, ID_ATTRIBUTE, &generate());
    true
}

fn bool_attribute(value: bool) -> String {
    let value = if value { "true" } else { "false" };
    value.to_string()
}

fn button_navigation(press: KeyPress) -> Option<FocusTarget> {
    match press.key {
        Key::ArrowDown => Some(FocusTarget::Next),
        Key::ArrowUp => Some(FocusTarget::Prev),
        Key::Home => Some(FocusTarget::First),
        Key::End => Some(FocusTarget::Last),
        Key::PageDown | Key::PageUp => content_navigation(press),
        _ => None,
    }
}

fn content_navigation(press: KeyPress) -> Option<FocusTarget> {
    match (press.key, press.ctrl) {
        (Key::PageDown, true) => Some(FocusTarget::Next),
        (Key::PageUp, true) => Some(FocusTarget::Prev),
        _ => None,
    }
}

#[cfg(test)]
#[path = "fold_tests.rs"]
mod tests;
