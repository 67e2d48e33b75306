//! The controller: one container's ordered set of folds.
//!
//! [`Handorgel`] discovers header/content pairs below its container, owns the
//! resulting [`Fold`]s, enforces the single-open policy and moves keyboard
//! focus between folds. Folds publish into the controller's outbox; every
//! public operation drains it before returning, routing internal
//! coordination events to the policy and the rest to subscribers.
//!
//! Attaching controllers to containers goes through the [`Registry`], which
//! owns the identifier counter and guarantees one controller per container.

pub mod registry;

pub use registry::Registry;

use crate::config::{ElementSource, Options};
use crate::emitter::{EventEmitter, ListenerId};
use crate::fold::{Fold, FoldEnv, InputOutcome};
use crate::model::{
    ControllerId, Dispatch, Event, EventKind, FocusTarget, FoldId, InputEvent, NodeId, TimerId,
};
use crate::surface::{Context, Surface};
use std::collections::VecDeque;
use tracing::debug;

const ID_ATTRIBUTE: &str = "id";

#[derive(Debug)]
pub struct Handorgel {
    id: ControllerId,
    container: NodeId,
    options: Options,
    folds: Vec<Fold>,
    emitter: EventEmitter,
    outbox: Vec<Event>,
    fold_counter: u64,
}

/// Borrow the parts of a controller a fold may use during one call.
fn fold_env<'a>(
    cx: &'a mut Context<'_>,
    options: &'a Options,
    outbox: &'a mut Vec<Event>,
) -> FoldEnv<'a> {
    FoldEnv {
        surface: &mut *cx.surface,
        timers: &mut *cx.timers,
        options,
        outbox,
    }
}

impl Handorgel {
    /// Build a controller over `container` and scan it for folds.
    ///
    /// Writes `id` to the container's `id` attribute. Prefer
    /// [`Registry::attach`], which generates the id and refuses to attach a
    /// second controller to the same container.
    pub fn new(
        cx: &mut Context<'_>,
        container: NodeId,
        id: ControllerId,
        options: Options,
    ) -> Self {
        cx.surface.set_attribute(container, ID_ATTRIBUTE, id.as_str());

        let mut controller = Self {
            id,
            container,
            options,
            folds: Vec::new(),
            emitter: EventEmitter::new(),
            outbox: Vec::new(),
            fold_counter: 0,
        };
        debug!(controller = %controller.id, container = %container, "controller attached");

        controller.update(cx);
        controller
    }

    pub fn id(&self) -> &ControllerId {
        &self.id
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Folds in visual order.
    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn fold(&self, index: usize) -> Option<&Fold> {
        self.folds.get(index)
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn index_of(&self, fold: FoldId) -> Option<usize> {
        self.folds.iter().position(|f| f.id() == fold)
    }

    /// Index of the first focused fold.
    pub fn focused_index(&self) -> Option<usize> {
        self.folds.iter().position(Fold::is_focused)
    }

    /// Whether `node` is a surface of one of this controller's folds.
    pub fn owns(&self, node: NodeId) -> bool {
        self.folds.iter().any(|fold| fold.owns(node))
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.emitter.on(kind, listener)
    }

    pub fn on_any(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.emitter.on_any(listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    /// Rescan the container and rebuild the fold list.
    ///
    /// Folds whose header is still present are kept (same instance, same
    /// state). A new fold is built for a header without one when a content
    /// surface exists at the same index. Folds whose header vanished are
    /// destroyed.
    pub fn update(&mut self, cx: &mut Context<'_>) {
        let headers = self.resolve(cx.surface, &self.options.header_elements);
        let contents = self.resolve(cx.surface, &self.options.content_elements);

        let (kept, stale): (Vec<Fold>, Vec<Fold>) = std::mem::take(&mut self.folds)
            .into_iter()
            .partition(|fold| headers.contains(&fold.header()));
        self.folds = kept;

        for fold in stale {
            debug!(controller = %self.id, fold = %fold.id(), "pruning fold without header");
            fold.destroy(&mut fold_env(cx, &self.options, &mut self.outbox));
        }

        for (index, &header) in headers.iter().enumerate() {
            if self.folds.iter().any(|fold| fold.header() == header) {
                continue;
            }
            let Some(&content) = contents.get(index) else {
                continue;
            };
            self.fold_counter += 1;
            let id = FoldId::new(self.fold_counter);
            let fold = Fold::new(
                &mut fold_env(cx, &self.options, &mut self.outbox),
                id,
                header,
                content,
                self.id.as_str(),
            );

            // Kept folds stay owned while new ones are built, so an initially
            // open fold closes every other fold when only one may be open.
            self.folds.push(fold);
            self.flush(cx);
        }

        self.folds
            .sort_by_key(|fold| headers.iter().position(|&header| header == fold.header()));
        self.flush(cx);

        debug!(
            controller = %self.id,
            headers = headers.len(),
            folds = self.folds.len(),
            "folds updated"
        );
    }

    /// Move keyboard focus to `target`.
    ///
    /// `prev`/`next` without a focused fold start from the last/first fold.
    /// At either end they wrap around when `carousel_focus` is set and do
    /// nothing otherwise. No-op without folds.
    pub fn focus(&mut self, cx: &mut Context<'_>, target: FocusTarget) {
        let len = self.folds.len();
        if len == 0 {
            return;
        }
        let current = self.focused_index();

        let mut target = match (target, current) {
            (FocusTarget::Prev, None) => FocusTarget::Last,
            (FocusTarget::Next, None) => FocusTarget::First,
            (target, _) => target,
        };

        if target == FocusTarget::Prev && current == Some(0) {
            if !self.options.carousel_focus {
                return;
            }
            target = FocusTarget::Last;
        }
        if target == FocusTarget::Next && current == Some(len - 1) {
            if !self.options.carousel_focus {
                return;
            }
            target = FocusTarget::First;
        }

        let index = match (target, current) {
            (FocusTarget::Prev, Some(i)) => i - 1,
            (FocusTarget::Next, Some(i)) => i + 1,
            (FocusTarget::Last, _) => len - 1,
            _ => 0,
        };
        self.focus_index(cx, index);
    }

    /// Focus the fold at `index`, blurring every other fold first.
    pub fn focus_index(&mut self, cx: &mut Context<'_>, index: usize) -> bool {
        if index >= self.folds.len() {
            return false;
        }
        {
            let mut env = fold_env(cx, &self.options, &mut self.outbox);
            for (i, fold) in self.folds.iter_mut().enumerate() {
                if i != index {
                    fold.blur(&mut env);
                }
            }
            self.folds[index].focus(&mut env);
        }
        self.flush(cx);
        true
    }

    pub fn open(&mut self, cx: &mut Context<'_>, index: usize, transition: bool) -> bool {
        self.with_fold(cx, index, |fold, env| fold.open(env, transition))
            .unwrap_or(false)
    }

    pub fn close(&mut self, cx: &mut Context<'_>, index: usize, transition: bool) -> bool {
        self.with_fold(cx, index, |fold, env| fold.close(env, transition))
            .unwrap_or(false)
    }

    pub fn toggle(&mut self, cx: &mut Context<'_>, index: usize, transition: bool) -> bool {
        self.with_fold(cx, index, |fold, env| fold.toggle(env, transition))
            .unwrap_or(false)
    }

    pub fn disable(&mut self, cx: &mut Context<'_>, index: usize) -> bool {
        self.with_fold(cx, index, |fold, env| fold.disable(env))
            .unwrap_or(false)
    }

    pub fn enable(&mut self, cx: &mut Context<'_>, index: usize) -> bool {
        self.with_fold(cx, index, |fold, env| fold.enable(env))
            .unwrap_or(false)
    }

    /// Deliver a host input event targeted at `node`.
    ///
    /// Only events for which a listener is registered on `node` reach a fold.
    /// Navigation keys move focus and report [`Dispatch::DefaultPrevented`].
    pub fn dispatch(
        &mut self,
        cx: &mut Context<'_>,
        node: NodeId,
        event: InputEvent,
    ) -> Dispatch {
        if !cx.surface.is_listening(node, event.listener_kind()) {
            return Dispatch::Ignored;
        }
        let Some(index) = self.folds.iter().position(|fold| fold.owns(node)) else {
            return Dispatch::Ignored;
        };

        let outcome = {
            let mut env = fold_env(cx, &self.options, &mut self.outbox);
            if event == InputEvent::Focus {
                for (i, fold) in self.folds.iter_mut().enumerate() {
                    if i != index {
                        fold.blur(&mut env);
                    }
                }
            }
            self.folds[index].handle_input(&mut env, node, event)
        };
        self.flush(cx);

        match outcome {
            InputOutcome::Ignored => Dispatch::Ignored,
            InputOutcome::Handled => Dispatch::Handled,
            InputOutcome::Navigate(target) => {
                debug!(controller = %self.id, %target, "keyboard navigation");
                self.focus(cx, target);
                Dispatch::DefaultPrevented
            }
        }
    }

    /// Complete the transition that scheduled `timer`. Returns whether one did.
    pub fn fire_timer(&mut self, cx: &mut Context<'_>, timer: TimerId) -> bool {
        let Some(index) = self.folds.iter().position(|fold| fold.awaits(timer)) else {
            return false;
        };
        self.with_fold(cx, index, |fold, env| fold.complete_transition(env, timer))
            .unwrap_or(false)
    }

    /// Tear down every fold and detach from the container.
    ///
    /// Emits `destroy` before and `destroyed` after teardown. Pending
    /// transitions are cancelled, so no fold publishes anything afterwards.
    pub fn destroy(mut self, cx: &mut Context<'_>) {
        self.emitter.emit(Event::controller(EventKind::Destroy));
        cx.surface.remove_attribute(self.container, ID_ATTRIBUTE);

        for fold in std::mem::take(&mut self.folds) {
            fold.destroy(&mut fold_env(cx, &self.options, &mut self.outbox));
        }

        self.outbox.clear();
        debug!(controller = %self.id, "controller destroyed");
        self.emitter.emit(Event::controller(EventKind::Destroyed));
    }

    fn resolve(&self, surface: &dyn Surface, source: &ElementSource) -> Vec<NodeId> {
        match source {
            ElementSource::Selector(selector) => surface.query_all(self.container, selector),
            ElementSource::Nodes(nodes) => nodes.clone(),
        }
    }

    fn with_fold<R>(
        &mut self,
        cx: &mut Context<'_>,
        index: usize,
        f: impl FnOnce(&mut Fold, &mut FoldEnv<'_>) -> R,
    ) -> Option<R> {
        let fold = self.folds.get_mut(index)?;
        let result = f(fold, &mut fold_env(cx, &self.options, &mut self.outbox));
        self.flush(cx);
        Some(result)
    }

    /// Publish queued fold events.
    ///
    /// Events a `fold:open` causes (siblings closing) are published before
    /// the events that were already queued behind it.
    fn flush(&mut self, cx: &mut Context<'_>) {
        let mut queue: VecDeque<Event> = self.outbox.drain(..).collect();
        while let Some(event) = queue.pop_front() {
            if let (EventKind::FoldOpen, Some(fold)) = (event.kind, event.fold) {
                self.handle_fold_open(cx, fold);
            }
            self.emitter.emit(event);

            for caused in self.outbox.drain(..).rev() {
                queue.push_front(caused);
            }
        }
    }

    /// Single-open policy: close every fold but `opened`.
    fn handle_fold_open(&mut self, cx: &mut Context<'_>, opened: FoldId) {
        if self.options.multi_selectable {
            return;
        }
        let mut env = fold_env(cx, &self.options, &mut self.outbox);
        for fold in self.folds.iter_mut().filter(|fold| fold.id() != opened) {
            fold.close(&mut env, true);
        }
    }
}

#[cfg(test)]
#[path = "handorgel_tests.rs"]
mod tests;
