//! Background teardown of finished search trees.
//!
//! A tree from a large search holds millions of nodes; dropping it on the
//! caller's thread would stall the next move. `TreeReaper` hands such values
//! to a named worker thread that drops them in arrival order.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::warn;

type Garbage = Box<dyn Send>;

/// Fire-and-forget drop queue served by one lazily spawned thread.
#[derive(Debug, Default)]
pub struct TreeReaper {
    enabled: bool,
    tx: Option<mpsc::Sender<Garbage>>,
    handle: Option<JoinHandle<()>>,
    failed: bool,
}

impl TreeReaper {
    /// Create a reaper. With `enabled == false` every value is dropped
    /// inline.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            tx: None,
            handle: None,
            failed: false,
        }
    }

    /// Is the worker thread running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    /// Drop `value`, on the worker thread when possible.
    pub fn dispose<T: Send + 'static>(&mut self, value: T) {
        if !self.enabled {
            drop(value);
            return;
        }

        let sent = match self.sender() {
            Some(tx) => tx.send(Box::new(value)),
            None => return,
        };
        if let Err(mpsc::SendError(garbage)) = sent {
            warn!("reaper thread has exited, dropping inline");
            self.tx = None;
            self.failed = true;
            drop(garbage);
        }
    }

    fn sender(&mut self) -> Option<&mpsc::Sender<Garbage>> {
        if self.tx.is_none() && !self.failed {
            let (tx, rx) = mpsc::channel::<Garbage>();
            let spawned = thread::Builder::new()
                .name("gomoku-mcts-reaper".to_string())
                .spawn(move || {
                    for garbage in rx {
                        drop(garbage);
                    }
                });
            match spawned {
                Ok(handle) => {
                    self.tx = Some(tx);
                    self.handle = Some(handle);
                }
                Err(err) => {
                    warn!(error = %err, "cannot spawn reaper thread, dropping inline");
                    self.failed = true;
                }
            }
        }
        self.tx.as_ref()
    }

    /// Wait until everything queued so far has been dropped.
    ///
    /// The worker is restarted on the next `dispose`.
    pub fn flush(&mut self) {
        self.tx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("reaper thread panicked");
                self.failed = true;
            }
        }
    }
}

impl Drop for TreeReaper {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_background_drop() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut reaper = TreeReaper::new(true);
        assert!(!reaper.is_running());

        for _ in 0..5 {
            reaper.dispose(Tracked(Arc::clone(&dropped)));
        }
        assert!(reaper.is_running());

        reaper.flush();
        assert_eq!(dropped.load(Ordering::SeqCst), 5);
        assert!(!reaper.is_running());

        // Restarts on demand.
        reaper.dispose(Tracked(Arc::clone(&dropped)));
        drop(reaper);
        assert_eq!(dropped.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_inline_drop_when_disabled() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut reaper = TreeReaper::new(false);

        reaper.dispose(Tracked(Arc::clone(&dropped)));

        assert_eq!(dropped.load(Ordering::SeqCst), 1);
        assert!(!reaper.is_running());
    }

    #[test]
    fn test_new_starts_idle() {
        let enabled = TreeReaper::new(true);
        assert!(enabled.enabled);
        assert!(!enabled.is_running());
        assert!(!enabled.failed);

        let default = TreeReaper::default();
        assert!(!default.enabled);
        assert!(default.handle.is_none());
    }
}
