//! One-shot and stream notification signals
//!
//! Subscribers are held as weak references so that dropping a widget
//! implicitly unsubscribes it; a producer firing after that is a no-op
//! rather than an error.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Terminal outcome of a one-shot signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The awaited condition completed successfully
    Resolved,
    /// The awaited condition can never complete
    Failed(String),
}

/// Trait for components observing a one-shot signal
pub trait OnceObserver: Send + Sync {
    /// Called at most once with the terminal outcome
    fn on_outcome(&self, outcome: &Outcome);
}

/// Trait for components observing path changes
pub trait PathObserver: Send + Sync {
    /// Called with the new path on every change
    fn on_path_changed(&self, path: &str);
}

/// A one-shot notification channel with replay-on-subscribe
///
/// Late subscribers, including ones added after the producer finished,
/// observe the terminal outcome immediately instead of hanging. The
/// producer side cannot be cancelled; consumers cancel by dropping
/// their subscription.
pub struct OnceSignal {
    state: Mutex<Option<Outcome>>,
    observers: Mutex<Vec<Weak<dyn OnceObserver>>>,
}

impl OnceSignal {
    /// Create a new pending signal
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe an observer, replaying the outcome if already terminal
    pub fn subscribe(&self, observer: Arc<dyn OnceObserver>) {
        let terminal = self.state.lock().clone();
        match terminal {
            Some(outcome) => observer.on_outcome(&outcome),
            None => self.observers.lock().push(Arc::downgrade(&observer)),
        }
    }

    /// Mark the signal resolved and notify live observers
    pub fn resolve(&self) {
        self.complete(Outcome::Resolved);
    }

    /// Mark the signal failed and notify live observers
    pub fn fail(&self, reason: impl Into<String>) {
        self.complete(Outcome::Failed(reason.into()));
    }

    /// Get the terminal outcome, if any
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.lock().clone()
    }

    /// Whether the signal resolved successfully
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Resolved))
    }

    fn complete(&self, outcome: Outcome) {
        {
            let mut state = self.state.lock();
            if state.is_some() {
                // One-shot: later completions are absorbed
                tracing::debug!(?outcome, "signal already terminal, completion ignored");
                return;
            }
            *state = Some(outcome.clone());
        }

        // Deliver once; the observer list is consumed with the signal
        let observers = std::mem::take(&mut *self.observers.lock());
        for weak in observers {
            if let Some(observer) = weak.upgrade() {
                observer.on_outcome(&outcome);
            }
        }
    }
}

impl Default for OnceSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A multi-shot stream of path-changed notifications
pub struct PathSignal {
    observers: Mutex<Vec<Weak<dyn PathObserver>>>,
}

impl PathSignal {
    /// Create a new signal with no observers
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe an observer to future path changes
    pub fn subscribe(&self, observer: Arc<dyn PathObserver>) {
        self.observers.lock().push(Arc::downgrade(&observer));
    }

    /// Notify all live observers of a new path
    pub fn emit(&self, path: &str) {
        let observers = {
            let mut observers = self.observers.lock();

            // Remove any dead weak references
            observers.retain(|weak| weak.strong_count() > 0);
            observers.clone()
        };

        for weak in observers {
            if let Some(observer) = weak.upgrade() {
                observer.on_path_changed(path);
            }
        }
    }
}

impl Default for PathSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingOnce {
        outcomes: Mutex<Vec<Outcome>>,
    }

    impl RecordingOnce {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(Vec::new()),
            })
        }
    }

    impl OnceObserver for RecordingOnce {
        fn on_outcome(&self, outcome: &Outcome) {
            self.outcomes.lock().push(outcome.clone());
        }
    }

    struct RecordingPaths {
        paths: Mutex<Vec<String>>,
    }

    impl RecordingPaths {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                paths: Mutex::new(Vec::new()),
            })
        }
    }

    impl PathObserver for RecordingPaths {
        fn on_path_changed(&self, path: &str) {
            self.paths.lock().push(path.to_string());
        }
    }

    #[test]
    fn test_subscribe_then_resolve() {
        let signal = OnceSignal::new();
        let observer = RecordingOnce::new();

        signal.subscribe(observer.clone());
        assert!(observer.outcomes.lock().is_empty());

        signal.resolve();
        assert_eq!(*observer.outcomes.lock(), vec![Outcome::Resolved]);
    }

    #[test]
    fn test_resolve_then_subscribe_replays() {
        let signal = OnceSignal::new();
        signal.resolve();

        let observer = RecordingOnce::new();
        signal.subscribe(observer.clone());
        assert_eq!(*observer.outcomes.lock(), vec![Outcome::Resolved]);
    }

    #[test]
    fn test_second_completion_absorbed() {
        let signal = OnceSignal::new();
        let observer = RecordingOnce::new();
        signal.subscribe(observer.clone());

        signal.resolve();
        signal.fail("too late");

        assert_eq!(*observer.outcomes.lock(), vec![Outcome::Resolved]);
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_failure_outcome() {
        let signal = OnceSignal::new();
        let observer = RecordingOnce::new();
        signal.subscribe(observer.clone());

        signal.fail("file disappeared");
        assert_eq!(
            *observer.outcomes.lock(),
            vec![Outcome::Failed("file disappeared".to_string())]
        );
        assert!(!signal.is_resolved());
    }

    #[test]
    fn test_dropped_observer_is_skipped() {
        let signal = OnceSignal::new();
        let observer = RecordingOnce::new();
        signal.subscribe(observer.clone());
        drop(observer);

        // Must not panic or error with no live observers left
        signal.resolve();
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_path_signal_notifies_all_live_observers() {
        let signal = PathSignal::new();
        let first = RecordingPaths::new();
        let second = RecordingPaths::new();
        signal.subscribe(first.clone());
        signal.subscribe(second.clone());

        signal.emit("data/a.csv");
        drop(second);
        signal.emit("data/b.csv");

        assert_eq!(
            *first.paths.lock(),
            vec!["data/a.csv".to_string(), "data/b.csv".to_string()]
        );
    }
}
