//! Container-to-controller attachment.
//!
//! The registry is the process-side owner of every controller: it generates
//! controller ids (`handorgel1`, `handorgel2`, ...) from a counter that only
//! ever grows, keeps at most one controller per container, and routes host
//! input and elapsed timers to the controller that owns the target.

use super::Handorgel;
use crate::config::Options;
use crate::model::{ControllerId, Dispatch, InputEvent, NodeId, TimerId};
use crate::surface::{Context, Surface};
use crate::timer::TimerQueue;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct Registry {
    counter: u64,
    controllers: BTreeMap<NodeId, Handorgel>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a controller to `container`, or return the one already attached.
    ///
    /// `options` are ignored when the container is already attached.
    pub fn attach(
        &mut self,
        cx: &mut Context<'_>,
        container: NodeId,
        options: Options,
    ) -> &mut Handorgel {
        match self.controllers.entry(container) {
            Entry::Occupied(entry) => {
                debug!(container = %container, "container already attached");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.counter += 1;
                let id = ControllerId::numbered(self.counter);
                entry.insert(Handorgel::new(cx, container, id, options))
            }
        }
    }

    pub fn get(&self, container: NodeId) -> Option<&Handorgel> {
        self.controllers.get(&container)
    }

    pub fn get_mut(&mut self, container: NodeId) -> Option<&mut Handorgel> {
        self.controllers.get_mut(&container)
    }

    pub fn is_attached(&self, container: NodeId) -> bool {
        self.controllers.contains_key(&container)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Attached controllers, ordered by container.
    pub fn controllers(&self) -> impl Iterator<Item = &Handorgel> {
        self.controllers.values()
    }

    /// Destroy the controller attached to `container`. Returns whether there was one.
    ///
    /// The container may be attached again afterwards and gets a fresh id.
    pub fn detach(&mut self, cx: &mut Context<'_>, container: NodeId) -> bool {
        match self.controllers.remove(&container) {
            Some(controller) => {
                controller.destroy(cx);
                true
            }
            None => false,
        }
    }

    /// Route a host input event to the controller owning `node`.
    pub fn dispatch(
        &mut self,
        cx: &mut Context<'_>,
        node: NodeId,
        event: InputEvent,
    ) -> Dispatch {
        self.controllers
            .values_mut()
            .find(|controller| controller.owns(node))
            .map_or(Dispatch::Ignored, |controller| {
                controller.dispatch(cx, node, event)
            })
    }

    /// Route an elapsed timer to the fold waiting for it.
    pub fn fire_timer(&mut self, cx: &mut Context<'_>, timer: TimerId) -> bool {
        let fired = self
            .controllers
            .values_mut()
            .any(|controller| controller.fire_timer(cx, timer));
        if !fired {
            warn!(timer = timer.get(), "elapsed timer has no owner");
        }
        fired
    }

    /// Advance `timers` by `by`, firing every timer that falls due in order.
    ///
    /// Each timer fires with the clock set to its own deadline, so transitions
    /// scheduled by a firing timer are timed from that instant. Returns the
    /// number of timers fired.
    pub fn advance(
        &mut self,
        surface: &mut dyn Surface,
        timers: &mut TimerQueue,
        by: Duration,
    ) -> usize {
        let until = timers.now() + by;
        let mut fired = 0;
        while let Some(timer) = timers.pop_due(until) {
            self.fire_timer(&mut Context::new(&mut *surface, &mut *timers), timer);
            fired += 1;
        }
        timers.settle(until);
        fired
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
