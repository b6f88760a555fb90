//! Dagger-log coalescing writer (spec.md §4.6/§5): the background eval
//! task writes stdout/stderr lines here instead of dispatching one UI
//! closure per line. A dedicated flush task drains the buffer on a
//! non-blocking dirty signal and submits a single `Dispatch` closure per
//! wakeup, so a chatty Dagger progress stream can't flood the UI thread's
//! dispatch queue with one job per line.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use dang_tui::dispatch::DispatchHandle;

use crate::state::ReplState;

struct Inner {
    target: Option<usize>,
    pending: Vec<String>,
}

/// Cheap to clone: the writer side (eval task) and the drain side (flush
/// task) share the same buffer and mutex.
#[derive(Clone)]
pub struct DaggerLogWriter {
    inner: Arc<Mutex<Inner>>,
    dirty: Arc<Notify>,
}

impl DaggerLogWriter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { target: None, pending: Vec::new() })),
            dirty: Arc::new(Notify::new()),
        }
    }

    /// Called at eval start with the entry to route writes to, and again
    /// with `None` at eval end. Clears any buffered lines so writes from a
    /// just-finished or cancelled task never land on the next entry.
    pub fn set_target(&self, target: Option<usize>) {
        let mut inner = self.inner.lock().unwrap();
        inner.target = target;
        inner.pending.clear();
    }

    /// Safe to call from any task. Buffers the line and signals the flush
    /// task without blocking the caller; a line written with no target set
    /// (eval already finished/cancelled) is dropped.
    pub fn write(&self, line: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.target.is_none() {
            return;
        }
        inner.pending.push(line.into());
        drop(inner);
        self.dirty.notify_one();
    }

    /// Dedicated flush loop: drains the dirty signal and `stop`, submitting
    /// one `Dispatch` closure per wakeup with every line buffered since
    /// the last flush. Returns once `stop` fires.
    pub async fn run(self, handle: DispatchHandle<ReplState>, stop: CancellationToken) {
        loop {
            tokio::select! {
                _ = self.dirty.notified() => {}
                _ = stop.cancelled() => return,
            }
            let (target, lines) = {
                let mut inner = self.inner.lock().unwrap();
                (inner.target, std::mem::take(&mut inner.pending))
            };
            let Some(index) = target else { continue };
            if lines.is_empty() {
                continue;
            }
            handle.submit(move |state: &mut ReplState| {
                if let Some(entry) = state.entries.get_mut(index) {
                    for line in lines {
                        entry.logs.push(line);
                    }
                }
            });
        }
    }
}

impl Default for DaggerLogWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use dang_tui::dispatch::Dispatcher;

    #[test]
    fn write_without_target_is_dropped() {
        let writer = DaggerLogWriter::new();
        writer.write("lost");
        let inner = writer.inner.lock().unwrap();
        assert!(inner.pending.is_empty());
    }

    #[test]
    fn set_target_clears_stale_pending_lines() {
        let writer = DaggerLogWriter::new();
        writer.set_target(Some(0));
        writer.write("line one");
        writer.set_target(Some(1));
        let inner = writer.inner.lock().unwrap();
        assert!(inner.pending.is_empty());
    }

    #[tokio::test]
    async fn flush_loop_coalesces_pending_writes_into_one_dispatch() {
        let writer = DaggerLogWriter::new();
        let dispatcher: Dispatcher<ReplState> = Dispatcher::new();
        let handle = dispatcher.handle();
        let stop = CancellationToken::new();

        writer.set_target(Some(0));
        writer.write("a");
        writer.write("b");

        let flush = tokio::spawn(writer.clone().run(handle, stop.clone()));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        stop.cancel();
        flush.await.unwrap();

        let mut state = ReplState::new(crate::history::HistoryStore::in_memory(), std::sync::Arc::new(crate::evaluator::MockEvaluator));
        state.entries.push(Entry::new("probe"));
        dispatcher.drain(&mut state);
        assert_eq!(state.entries[0].logs.lines(), &["a".to_string(), "b".to_string()]);
    }
}
