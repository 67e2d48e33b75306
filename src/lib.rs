//! handorgel
//!
//! Accessible accordion widget core: a [`Handorgel`](handorgel::Handorgel)
//! controller discovers header/content pairs in a container, runs one
//! [`Fold`](fold::Fold) state machine per pair and coordinates them (single
//! open, focus traversal). The core talks to its host only through the
//! [`Surface`](surface::Surface) and [`Timers`](timer::Timers) capabilities.
//!
//! [`dom::Document`] is an in-memory surface; the `view` module renders one
//! in the terminal.

pub mod config;
pub mod dom;
pub mod emitter;
pub mod fold;
pub mod handorgel;
pub mod logging;
pub mod model;
pub mod source;
pub mod surface;
pub mod timer;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
