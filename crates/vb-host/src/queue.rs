//! Single-threaded host event queue
//!
//! The host enqueues every asynchronous occurrence here and drains the
//! queue from its one cooperative loop; ordering discipline is event
//! sequencing, not synchronization.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::trace;
use vb_core::WidgetId;

use crate::registry::DocumentRegistry;

/// An event the host delivers into the binding core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The document at `path` finished loading
    DocumentReady { path: String },
    /// The document at `path` can never load
    DocumentReadyFailed { path: String, reason: String },
    /// A widget surface was rendered for the first time (or again)
    WidgetShown { widget_id: WidgetId },
    /// The document at `path` moved to `new_path`
    DocumentRenamed { path: String, new_path: String },
    /// The document at `path` has a new content snapshot
    ContentChanged { path: String, content: String },
}

/// FIFO queue of host events
pub struct EventQueue {
    events: Mutex<VecDeque<HostEvent>>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueue an event for the next pump
    pub fn post(&self, event: HostEvent) {
        trace!(?event, "host event posted");
        self.events.lock().push_back(event);
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the queue is drained
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drain the queue in FIFO order, dispatching each event
    ///
    /// Events posted during dispatch are processed in the same pump.
    /// Returns the number of events delivered.
    pub fn pump(&self, registry: &DocumentRegistry) -> usize {
        let mut delivered = 0;
        loop {
            let event = self.events.lock().pop_front();
            let Some(event) = event else {
                break;
            };
            registry.dispatch(event);
            delivered += 1;
        }
        delivered
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
