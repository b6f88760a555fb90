//! Background tasks submit closures that run against app state between
//! frames, rather than mutating state from arbitrary tokio tasks directly.
//! Grounded on the teacher's `EventHandler` channel-to-main-loop shape
//! (`crates/tui/src/event.rs`), generalized from a fixed `TuiEvent` enum to
//! an arbitrary `FnOnce(&mut S)` so any app state type can use it.

use std::sync::{Arc, Mutex};

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Queue side: cheap to clone, handed to background tasks so they can
/// schedule work without touching `S` directly.
pub struct DispatchHandle<S> {
    queue: Arc<Mutex<Vec<Job<S>>>>,
}

impl<S> Clone for DispatchHandle<S> {
    fn clone(&self) -> Self {
        Self { queue: self.queue.clone() }
    }
}

impl<S> DispatchHandle<S> {
    pub fn submit(&self, job: impl FnOnce(&mut S) + Send + 'static) {
        self.queue.lock().unwrap().push(Box::new(job));
    }
}

/// Drain side: owned by the main loop, drained once per `Tick`/`Dispatch`
/// event.
pub struct Dispatcher<S> {
    queue: Arc<Mutex<Vec<Job<S>>>>,
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self { queue: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn handle(&self) -> DispatchHandle<S> {
        DispatchHandle { queue: self.queue.clone() }
    }

    /// Runs every queued job in submission order against `state`. Jobs
    /// submitted by a job run during this same drain are not picked up
    /// until the next drain.
    pub fn drain(&self, state: &mut S) {
        let jobs = std::mem::take(&mut *self.queue.lock().unwrap());
        for job in jobs {
            job(state);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}
