//! Property-based tests for controller invariants.
//!
//! Random operation sequences run against a [`Page`]; after every step the
//! fold states and the classes on the document must agree with the
//! controller's guarantees.

use crate::config::{FoldClass, Options, Part};
use crate::handorgel::Handorgel;
use crate::model::{FocusTarget, InputEvent, Key, KeyPress};
use crate::surface::Surface;
use crate::test_harness::Page;
use proptest::prelude::*;
use std::time::Duration;

// ===== Arbitrary Strategies =====

#[derive(Debug, Clone)]
enum Op {
    Open(usize, bool),
    Close(usize, bool),
    Toggle(usize),
    Disable(usize),
    Enable(usize),
    Focus(FocusTarget),
    Click(usize),
    Key(usize, KeyPress),
    Advance(u64),
}

fn arb_target() -> impl Strategy<Value = FocusTarget> {
    prop_oneof![
        Just(FocusTarget::Prev),
        Just(FocusTarget::Next),
        Just(FocusTarget::First),
        Just(FocusTarget::Last),
    ]
}

fn arb_key_press() -> impl Strategy<Value = KeyPress> {
    let key = prop_oneof![
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::Home),
        Just(Key::End),
        Just(Key::PageUp),
        Just(Key::PageDown),
        Just(Key::Other),
    ];
    (key, any::<bool>()).prop_map(|(key, ctrl)| KeyPress { key, ctrl })
}

/// Fold indices may run past the end to exercise out-of-range calls.
fn arb_op(folds: usize) -> impl Strategy<Value = Op> {
    let index = 0..folds + 1;
    prop_oneof![
        (index.clone(), any::<bool>()).prop_map(|(i, t)| Op::Open(i, t)),
        (index.clone(), any::<bool>()).prop_map(|(i, t)| Op::Close(i, t)),
        index.clone().prop_map(Op::Toggle),
        index.clone().prop_map(Op::Disable),
        index.clone().prop_map(Op::Enable),
        arb_target().prop_map(Op::Focus),
        index.clone().prop_map(Op::Click),
        (index, arb_key_press()).prop_map(|(i, k)| Op::Key(i, k)),
        (0u64..400).prop_map(Op::Advance),
    ]
}

fn arb_options() -> impl Strategy<Value = Options> {
    (any::<bool>(), any::<bool>(), any::<bool>(), 0u64..300).prop_map(
        |(multi_selectable, collapsible, carousel_focus, transition_ms)| Options {
            multi_selectable,
            collapsible,
            carousel_focus,
            transition_duration: Duration::from_millis(transition_ms),
            ..Options::default()
        },
    )
}

fn apply(page: &mut Page, controller: &mut Handorgel, op: &Op) {
    match *op {
        Op::Open(i, transition) => {
            controller.open(&mut page.cx(), i, transition);
        }
        Op::Close(i, transition) => {
            controller.close(&mut page.cx(), i, transition);
        }
        Op::Toggle(i) => {
            controller.toggle(&mut page.cx(), i, true);
        }
        Op::Disable(i) => {
            controller.disable(&mut page.cx(), i);
        }
        Op::Enable(i) => {
            controller.enable(&mut page.cx(), i);
        }
        Op::Focus(target) => controller.focus(&mut page.cx(), target),
        Op::Click(i) => {
            if let Some(node) = page.buttons.get(i).copied() {
                controller.dispatch(&mut page.cx(), node, InputEvent::Click);
            }
        }
        Op::Key(i, press) => {
            if let Some(node) = page.buttons.get(i).copied() {
                controller.dispatch(&mut page.cx(), node, InputEvent::KeyDown(press));
            }
        }
        Op::Advance(ms) => page.advance(controller, ms),
    }
}

fn open_count(controller: &Handorgel) -> usize {
    controller.folds().iter().filter(|fold| fold.is_open()).count()
}

// ===== Properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn at_most_one_fold_is_focused(
        folds in 0usize..6,
        options in arb_options(),
        ops in prop::collection::vec(arb_op(5), 0..40),
    ) {
        let mut page = Page::with_folds(folds);
        let mut controller = page.attach(options);

        for op in &ops {
            apply(&mut page, &mut controller, op);
            let focused = controller.folds().iter().filter(|fold| fold.is_focused()).count();
            prop_assert!(focused <= 1, "{} folds focused after {:?}", focused, op);
        }
    }

    #[test]
    fn single_open_never_shows_two_open_folds(
        folds in 1usize..6,
        options in arb_options(),
        marked in prop::collection::vec(any::<bool>(), 6),
        ops in prop::collection::vec(arb_op(5), 0..40),
    ) {
        let mut page = Page::with_folds(folds);
        for (index, mark) in marked.iter().take(folds).enumerate() {
            if *mark {
                page.mark_open(index);
            }
        }
        let mut controller = page.attach(Options { multi_selectable: false, ..options });
        prop_assert!(open_count(&controller) <= 1);

        for op in &ops {
            apply(&mut page, &mut controller, op);
            prop_assert!(open_count(&controller) <= 1, "two folds open after {:?}", op);
        }
    }

    #[test]
    fn focus_steps_follow_the_carousel_rule(
        folds in 1usize..8,
        start in 0usize..8,
        carousel_focus in any::<bool>(),
        forward in any::<bool>(),
    ) {
        let start = start % folds;
        let mut page = Page::with_folds(folds);
        let mut controller = page.attach(Options { carousel_focus, ..Options::default() });
        controller.focus_index(&mut page.cx(), start);

        let target = if forward { FocusTarget::Next } else { FocusTarget::Prev };
        controller.focus(&mut page.cx(), target);

        let expected = match (forward, carousel_focus) {
            (true, true) => (start + 1) % folds,
            (true, false) => (start + 1).min(folds - 1),
            (false, true) => (start + folds - 1) % folds,
            (false, false) => start.saturating_sub(1),
        };
        prop_assert_eq!(controller.focused_index(), Some(expected));
    }

    #[test]
    fn settled_classes_mirror_fold_state(
        folds in 1usize..5,
        options in arb_options(),
        ops in prop::collection::vec(arb_op(4), 0..30),
    ) {
        let mut page = Page::with_folds(folds);
        let mut controller = page.attach(options);

        for op in &ops {
            apply(&mut page, &mut controller, op);
        }
        page.advance(&mut controller, 10_000);

        let classes = controller.options().classes.clone();
        for fold in controller.folds() {
            for part in [Part::Header, Part::Content] {
                let surface = match part {
                    Part::Header => fold.header(),
                    Part::Content => fold.content(),
                };
                let has = |class| page.doc.has_class(surface, classes.get(part, class));
                prop_assert_eq!(has(FoldClass::Open), fold.is_open());
                prop_assert_eq!(has(FoldClass::Opened), fold.is_open());
                prop_assert_eq!(has(FoldClass::Disabled), fold.is_disabled());
                prop_assert_eq!(has(FoldClass::Focus), fold.is_focused());
            }
        }
    }

    #[test]
    fn non_collapsible_clicks_never_close_the_last_open_fold(
        folds in 1usize..6,
        multi_selectable in any::<bool>(),
        clicks in prop::collection::vec(0usize..6, 1..30),
    ) {
        let mut page = Page::with_folds(folds);
        let mut controller = page.attach(Options {
            multi_selectable,
            collapsible: false,
            ..Options::default()
        });

        let mut seen_open = false;
        for click in clicks {
            apply(&mut page, &mut controller, &Op::Click(click % folds));
            seen_open |= open_count(&controller) > 0;
            if seen_open {
                prop_assert!(open_count(&controller) >= 1);
            }
        }
    }
}
