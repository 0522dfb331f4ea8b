//! Worker primitives shared by long-lived background loops.
//!
//! * [`spawn_worker_thread`] starts a named OS thread for loops that poll instead of awaiting.
//! * [`WaitStrategy`] is the idle hook such a loop calls when it has nothing to do.

mod spawn;
mod wait;

pub use spawn::spawn_worker_thread;
pub use wait::{WaitPolicy, WaitStrategy};
