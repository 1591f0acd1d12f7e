//! UI-facing notification context
//!
//! Every observable change leaves the perception worker as a
//! [`GestureEvent`](crate::events::GestureEvent) and is republished here,
//! on a single consumer task: into the published snapshot, onto a
//! broadcast channel, and to weakly held observers.

mod dispatcher;
mod observer;

pub use dispatcher::{Dispatcher, Snapshot};
pub use observer::GestureObserver;
