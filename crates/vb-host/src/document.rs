//! Host-owned document contexts

use std::path::Path;

use anyhow::Context as _;
use parking_lot::Mutex;
use tracing::{debug, warn};
use vb_core::{DocumentContext, OnceSignal, PathSignal};

/// A host-owned document: path, content snapshot, and the readiness
/// and path-change notifications the binding core subscribes to
pub struct HostDocumentContext {
    path: Mutex<String>,
    content: Mutex<String>,
    ready: OnceSignal,
    path_changes: PathSignal,
}

impl HostDocumentContext {
    /// Create a context with no content yet
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            content: Mutex::new(String::new()),
            ready: OnceSignal::new(),
            path_changes: PathSignal::new(),
        }
    }

    /// Create a context with an initial content snapshot
    pub fn with_content(path: impl Into<String>, content: impl Into<String>) -> Self {
        let context = Self::new(path);
        *context.content.lock() = content.into();
        context
    }

    /// Replace the content snapshot
    pub fn set_content(&self, content: impl Into<String>) {
        *self.content.lock() = content.into();
    }

    /// Resolve the readiness signal
    pub fn mark_ready(&self) {
        self.ready.resolve();
    }

    /// Fail the readiness signal; the document can never load
    pub fn fail_ready(&self, reason: impl Into<String>) {
        self.ready.fail(reason);
    }

    /// Change the document path and notify observers
    pub fn rename(&self, new_path: &str) {
        {
            let mut path = self.path.lock();
            if *path == new_path {
                return;
            }
            debug!(from = %path, to = %new_path, "document renamed");
            *path = new_path.to_string();
        }
        self.path_changes.emit(new_path);
    }

    /// Read the file into the content snapshot and resolve readiness
    ///
    /// A read failure fails the readiness signal instead of resolving
    /// it, so widgets over this context never bind.
    pub fn load_from_disk(&self, fs_path: &Path) -> anyhow::Result<()> {
        match std::fs::read_to_string(fs_path) {
            Ok(content) => {
                self.set_content(content);
                self.mark_ready();
                Ok(())
            }
            Err(err) => {
                warn!(path = %fs_path.display(), error = %err, "document load failed");
                self.fail_ready(err.to_string());
                Err(err).with_context(|| format!("failed to read {}", fs_path.display()))
            }
        }
    }
}

impl DocumentContext for HostDocumentContext {
    fn path(&self) -> String {
        self.path.lock().clone()
    }

    fn content(&self) -> String {
        self.content.lock().clone()
    }

    fn ready(&self) -> &OnceSignal {
        &self.ready
    }

    fn path_changes(&self) -> &PathSignal {
        &self.path_changes
    }
}
