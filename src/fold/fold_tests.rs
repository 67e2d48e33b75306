//! Tests for the per-fold state machine.
//!
//! Folds are driven directly here, without a controller: the outbox is
//! inspected to see what a fold publishes, and the virtual clock completes
//! transitions.

use super::*;
use crate::dom::Document;
use crate::timer::TimerQueue;

struct Rig {
    doc: Document,
    timers: TimerQueue,
    options: Options,
    outbox: Vec<Event>,
    header: NodeId,
    button: NodeId,
    content: NodeId,
}

impl Rig {
    fn new(options: Options) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let header = doc.append_element(root, "h3", &[("class", "handorgel__header")]);
        let button = doc.append_element(header, "button", &[]);
        let content = doc.append_element(root, "div", &[("class", "handorgel__content")]);
        Self {
            doc,
            timers: TimerQueue::new(),
            options,
            outbox: Vec::new(),
            header,
            button,
            content,
        }
    }

    fn env(&mut self) -> FoldEnv<'_> {
        FoldEnv {
            surface: &mut self.doc,
            timers: &mut self.timers,
            options: &self.options,
            outbox: &mut self.outbox,
        }
    }

    fn fold(&mut self) -> Fold {
        let (header, content) = (self.header, self.content);
        Fold::new(&mut self.env(), FoldId::new(1), header, content, "acc")
    }

    /// Advance the clock and deliver due timers to `fold`.
    fn advance(&mut self, fold: &mut Fold, millis: u64) {
        for timer in self.timers.advance(Duration::from_millis(millis)) {
            fold.complete_transition(&mut self.env(), timer);
        }
    }

    fn kinds(&mut self) -> Vec<EventKind> {
        self.outbox.drain(..).map(|e| e.kind).collect()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.doc.attribute(node, name)
    }
}

fn instant() -> Options {
    Options {
        transition_duration: Duration::ZERO,
        ..Options::default()
    }
}

// ===== Construction =====

#[test]
fn new_fold_starts_closed_with_aria_and_ids() {
    let mut rig = Rig::new(Options::default());
    let fold = rig.fold();

    assert_eq!(fold.phase(), Phase::Closed);
    assert_eq!(fold.button(), rig.button);
    assert_eq!(rig.attr(rig.header, "id").as_deref(), Some("acc-header-1"));
    assert_eq!(rig.attr(rig.content, "id").as_deref(), Some("acc-content-1"));
    assert_eq!(
        rig.attr(rig.button, "aria-controls").as_deref(),
        Some("acc-content-1")
    );
    assert_eq!(rig.attr(rig.button, "aria-expanded").as_deref(), Some("false"));
    assert_eq!(rig.attr(rig.button, "aria-disabled").as_deref(), Some("false"));
    assert_eq!(rig.attr(rig.content, "role").as_deref(), Some("region"));
    assert_eq!(
        rig.attr(rig.content, "aria-labelledby").as_deref(),
        Some("acc-header-1")
    );
    assert!(rig.outbox.is_empty(), "a plain fold publishes nothing");
}

#[test]
fn existing_ids_are_kept() {
    let mut rig = Rig::new(Options::default());
    rig.doc.set_attribute(rig.header, "id", "q1");
    let _fold = rig.fold();

    assert_eq!(rig.attr(rig.header, "id").as_deref(), Some("q1"));
    assert_eq!(rig.attr(rig.content, "aria-labelledby").as_deref(), Some("q1"));
}

#[test]
fn header_without_child_is_its_own_button() {
    let mut rig = Rig::new(Options::default());
    let header = rig.doc.append_element(rig.doc.root(), "dt", &[]);
    rig.header = header;
    let fold = rig.fold();

    assert_eq!(fold.button(), header);
    assert!(rig.doc.is_listening(header, ListenerKind::Click));
}

#[test]
fn aria_disabled_option_skips_attributes() {
    let mut rig = Rig::new(Options {
        aria_enabled: false,
        ..Options::default()
    });
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), false);

    assert_eq!(rig.attr(rig.button, "aria-expanded"), None);
    assert_eq!(rig.attr(rig.content, "role"), None);
}

#[test]
fn listeners_are_bound_on_button_and_content() {
    let mut rig = Rig::new(Options::default());
    let _fold = rig.fold();

    assert_eq!(
        rig.doc.listeners(rig.button),
        vec![
            ListenerKind::Click,
            ListenerKind::KeyDown,
            ListenerKind::Focus,
            ListenerKind::Blur
        ]
    );
    assert_eq!(rig.doc.listeners(rig.content), vec![ListenerKind::KeyDown]);
}

// ===== Open / close =====

#[test]
fn open_applies_open_state_then_opened_after_transition() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();

    assert!(fold.open(&mut rig.env(), true));
    assert_eq!(fold.phase(), Phase::Opening);
    assert!(rig.doc.has_class(rig.header, "handorgel__header--open"));
    assert!(rig.doc.has_class(rig.content, "handorgel__content--open"));
    assert!(!rig.doc.has_class(rig.content, "handorgel__content--opened"));
    assert_eq!(rig.attr(rig.button, "aria-expanded").as_deref(), Some("true"));
    assert_eq!(rig.kinds(), vec![EventKind::FoldOpen, EventKind::Open]);

    rig.advance(&mut fold, 199);
    assert!(rig.outbox.is_empty());

    rig.advance(&mut fold, 1);
    assert_eq!(fold.phase(), Phase::Open);
    assert!(rig.doc.has_class(rig.header, "handorgel__header--opened"));
    assert_eq!(rig.kinds(), vec![EventKind::Opened]);
}

#[test]
fn open_without_transition_completes_immediately() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();

    fold.open(&mut rig.env(), false);

    assert_eq!(fold.phase(), Phase::Open);
    assert_eq!(
        rig.kinds(),
        vec![EventKind::FoldOpen, EventKind::Open, EventKind::Opened]
    );
    assert_eq!(rig.timers.pending_count(), 0);
}

#[test]
fn open_is_idempotent() {
    let mut rig = Rig::new(instant());
    let mut fold = rig.fold();

    assert!(fold.open(&mut rig.env(), true));
    rig.kinds();
    assert!(!fold.open(&mut rig.env(), true));
    assert!(rig.outbox.is_empty());
}

#[test]
fn close_reverses_open() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), false);
    rig.kinds();

    assert!(fold.close(&mut rig.env(), true));
    assert_eq!(fold.phase(), Phase::Closing);
    assert!(!rig.doc.has_class(rig.header, "handorgel__header--opened"));
    assert!(
        rig.doc.has_class(rig.header, "handorgel__header--open"),
        "open class stays until the closing transition ends"
    );
    assert_eq!(rig.attr(rig.button, "aria-expanded").as_deref(), Some("false"));
    assert_eq!(rig.kinds(), vec![EventKind::Close]);

    rig.advance(&mut fold, 200);
    assert_eq!(fold.phase(), Phase::Closed);
    assert!(!rig.doc.has_class(rig.header, "handorgel__header--open"));
    assert_eq!(rig.kinds(), vec![EventKind::Closed]);
}

#[test]
fn close_on_closed_fold_is_noop() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();

    assert!(!fold.close(&mut rig.env(), true));
    assert!(rig.outbox.is_empty());
}

#[test]
fn reversing_mid_transition_cancels_pending_completion() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();

    fold.open(&mut rig.env(), true);
    rig.advance(&mut fold, 100);
    fold.close(&mut rig.env(), true);
    rig.kinds();

    assert_eq!(rig.timers.pending_count(), 1, "only the closing timer remains");
    rig.advance(&mut fold, 200);
    assert_eq!(rig.kinds(), vec![EventKind::Closed]);
    assert_eq!(fold.phase(), Phase::Closed);
}

#[test]
fn toggle_alternates() {
    let mut rig = Rig::new(instant());
    let mut fold = rig.fold();

    fold.toggle(&mut rig.env(), true);
    assert!(fold.is_open());
    fold.toggle(&mut rig.env(), true);
    assert!(!fold.is_open());
}

#[test]
fn foreign_timer_is_not_consumed() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), true);

    let other = rig.timers.schedule(Duration::from_millis(5));
    assert!(!fold.awaits(other));
    assert!(!fold.complete_transition(&mut rig.env(), other));
    assert_eq!(fold.phase(), Phase::Opening);
}

// ===== Disabled / collapsible =====

#[test]
fn disabled_fold_rejects_open() {
    let mut rig = Rig::new(instant());
    let mut fold = rig.fold();

    fold.disable(&mut rig.env());
    assert_eq!(rig.attr(rig.button, "aria-disabled").as_deref(), Some("true"));
    assert!(rig.doc.has_class(rig.header, "handorgel__header--disabled"));
    assert_eq!(rig.kinds(), vec![EventKind::Disable]);

    assert!(!fold.open(&mut rig.env(), true));
    assert!(!fold.is_open());

    fold.enable(&mut rig.env());
    assert!(fold.open(&mut rig.env(), true));
}

#[test]
fn click_on_disabled_fold_is_ignored() {
    let mut rig = Rig::new(instant());
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), true);
    fold.disable(&mut rig.env());
    rig.kinds();

    let button = rig.button;
    let outcome = fold.handle_input(&mut rig.env(), button, InputEvent::Click);

    assert_eq!(outcome, InputOutcome::Ignored);
    assert!(fold.is_open());
    assert!(rig.outbox.is_empty());
}

#[test]
fn non_collapsible_open_locks_until_programmatic_close() {
    let mut rig = Rig::new(Options {
        collapsible: false,
        ..instant()
    });
    let mut fold = rig.fold();
    let button = rig.button;

    fold.handle_input(&mut rig.env(), button, InputEvent::Click);
    assert!(fold.is_open());
    assert!(fold.is_disabled(), "an open fold locks itself");

    let outcome = fold.handle_input(&mut rig.env(), button, InputEvent::Click);
    assert_eq!(outcome, InputOutcome::Ignored);
    assert!(fold.is_open());

    assert!(fold.close(&mut rig.env(), true));
    assert!(!fold.is_disabled(), "closing unlocks");
    assert!(rig
        .kinds()
        .ends_with(&[EventKind::Close, EventKind::Enable, EventKind::Closed]));
}

// ===== Initial state =====

#[test]
fn initial_open_marker_opens_with_initial_delay() {
    let mut rig = Rig::new(Options {
        transition_duration: Duration::from_millis(999),
        ..Options::default()
    });
    rig.doc.set_attribute(rig.header, "data-open", "");
    let mut fold = rig.fold();

    assert!(fold.is_open(), "open immediately after construction");
    assert_eq!(rig.kinds(), vec![EventKind::FoldOpen, EventKind::Open]);

    rig.advance(&mut fold, 199);
    assert!(rig.outbox.is_empty());
    rig.advance(&mut fold, 1);
    assert_eq!(rig.kinds(), vec![EventKind::Opened]);
}

#[test]
fn initial_open_marker_on_content_counts() {
    let mut rig = Rig::new(Options::default());
    rig.doc.set_attribute(rig.content, "data-open", "");
    let fold = rig.fold();

    assert!(fold.is_open());
}

#[test]
fn initial_open_without_transition_completes_at_once() {
    let mut rig = Rig::new(Options {
        initial_open_transition: false,
        ..Options::default()
    });
    rig.doc.set_attribute(rig.header, "data-open", "");
    let fold = rig.fold();

    assert_eq!(fold.phase(), Phase::Open);
    assert_eq!(
        rig.kinds(),
        vec![EventKind::FoldOpen, EventKind::Open, EventKind::Opened]
    );
}

#[test]
fn custom_initial_open_attribute() {
    let mut rig = Rig::new(Options {
        initial_open_attribute: "aria-expanded-initially".to_string(),
        ..Options::default()
    });
    rig.doc.set_attribute(rig.header, "data-open", "");
    let fold = rig.fold();

    assert!(!fold.is_open(), "default marker no longer applies");
}

#[test]
fn autofocus_button_starts_focused() {
    let mut rig = Rig::new(Options::default());
    rig.doc.set_attribute(rig.button, "autofocus", "");
    let fold = rig.fold();

    assert!(fold.is_focused());
    assert!(rig.doc.has_class(rig.header, "handorgel__header--focus"));
    assert_eq!(rig.kinds(), vec![EventKind::Focus]);
}

// ===== Input =====

#[test]
fn focus_and_blur_events_toggle_focus_classes() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    let button = rig.button;

    fold.handle_input(&mut rig.env(), button, InputEvent::Focus);
    assert!(fold.is_focused());
    assert!(rig.doc.has_class(rig.content, "handorgel__content--focus"));

    fold.handle_input(&mut rig.env(), button, InputEvent::Blur);
    assert!(!fold.is_focused());
    assert!(!rig.doc.has_class(rig.content, "handorgel__content--focus"));
    assert_eq!(rig.kinds(), vec![EventKind::Focus, EventKind::Blur]);
}

#[test]
fn button_navigation_keys_map_to_focus_targets() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    let button = rig.button;

    let cases = [
        (KeyPress::new(Key::ArrowDown), Some(FocusTarget::Next)),
        (KeyPress::new(Key::ArrowUp), Some(FocusTarget::Prev)),
        (KeyPress::new(Key::Home), Some(FocusTarget::First)),
        (KeyPress::new(Key::End), Some(FocusTarget::Last)),
        (KeyPress::with_ctrl(Key::PageDown), Some(FocusTarget::Next)),
        (KeyPress::with_ctrl(Key::PageUp), Some(FocusTarget::Prev)),
        (KeyPress::new(Key::PageDown), None),
        (KeyPress::new(Key::Other), None),
    ];

    for (press, expected) in cases {
        let outcome = fold.handle_input(&mut rig.env(), button, InputEvent::KeyDown(press));
        let expected = expected.map_or(InputOutcome::Ignored, InputOutcome::Navigate);
        assert_eq!(outcome, expected, "key {press:?}");
    }
}

#[test]
fn content_only_navigates_with_ctrl_page_keys() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    let content = rig.content;

    let arrow = fold.handle_input(
        &mut rig.env(),
        content,
        InputEvent::KeyDown(KeyPress::new(Key::ArrowDown)),
    );
    assert_eq!(arrow, InputOutcome::Ignored);

    let page = fold.handle_input(
        &mut rig.env(),
        content,
        InputEvent::KeyDown(KeyPress::with_ctrl(Key::PageUp)),
    );
    assert_eq!(page, InputOutcome::Navigate(FocusTarget::Prev));
}

#[test]
fn keyboard_interaction_disabled_ignores_keys() {
    let mut rig = Rig::new(Options {
        keyboard_interaction: false,
        ..Options::default()
    });
    let mut fold = rig.fold();
    let button = rig.button;

    let outcome = fold.handle_input(
        &mut rig.env(),
        button,
        InputEvent::KeyDown(KeyPress::new(Key::Home)),
    );
    assert_eq!(outcome, InputOutcome::Ignored);
}

// ===== Destroy =====

#[test]
fn destroy_removes_everything_it_applied() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), false);
    fold.focus(&mut rig.env());
    fold.disable(&mut rig.env());

    fold.destroy(&mut rig.env());

    assert_eq!(rig.attr(rig.header, "class").as_deref(), Some("handorgel__header"));
    assert_eq!(rig.attr(rig.content, "class").as_deref(), Some("handorgel__content"));
    assert_eq!(rig.attr(rig.button, "class"), None);
    for node in [rig.button, rig.content] {
        assert!(rig.doc.listeners(node).is_empty());
    }
    assert_eq!(rig.attr(rig.header, "id"), None, "generated id removed");
    assert_eq!(rig.attr(rig.button, "aria-expanded"), None);
    assert_eq!(rig.attr(rig.content, "role"), None);
}

#[test]
fn destroy_cancels_pending_transition() {
    let mut rig = Rig::new(Options::default());
    let mut fold = rig.fold();
    fold.open(&mut rig.env(), true);
    assert_eq!(rig.timers.pending_count(), 1);

    fold.destroy(&mut rig.env());

    assert_eq!(rig.timers.pending_count(), 0);
}

#[test]
fn destroy_keeps_author_ids() {
    let mut rig = Rig::new(Options::default());
    rig.doc.set_attribute(rig.content, "id", "answer");
    let fold = rig.fold();

    fold.destroy(&mut rig.env());

    assert_eq!(rig.attr(rig.content, "id").as_deref(), Some("answer"));
}
