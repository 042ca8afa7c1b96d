//! Session restoration bridge
//!
//! Records open widgets by document path so a host session restore can
//! reopen them. Actual persistence is delegated to an external store;
//! the bridge only produces and replays entries.

use std::sync::{Arc, Weak};

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::signal::PathObserver;
use crate::widget::ContentBindingWidget;

/// A persisted value letting the host reopen a widget after a restart
///
/// Pure data; it carries no behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorationEntry {
    pub namespace: String,
    pub path: String,
    pub factory_name: String,
}

/// Host surface that replays an "open document" request
pub trait DocumentOpener {
    /// Open the document at `path` with the named factory
    ///
    /// Returns `None` when the request cannot be satisfied (unknown
    /// factory, document gone); restoration treats that as a silent
    /// drop, never an error.
    fn open_document(&self, path: &str, factory_name: &str) -> Option<Arc<ContentBindingWidget>>;
}

struct TrackedWidget {
    widget: Weak<ContentBindingWidget>,
    factory_name: String,
    /// Keeps the rename subscription alive as long as the entry exists
    _rename: Arc<RenameTracker>,
}

/// Re-registers a tracked widget under its new path on rename
struct RenameTracker {
    bridge: Weak<RestorationBridge>,
    widget: Weak<ContentBindingWidget>,
    last_path: Mutex<String>,
}

impl PathObserver for RenameTracker {
    fn on_path_changed(&self, path: &str) {
        let Some(bridge) = self.bridge.upgrade() else {
            return;
        };
        let old_path = {
            let mut last = self.last_path.lock();
            std::mem::replace(&mut *last, path.to_string())
        };
        bridge.re_register(&old_path, path, &self.widget);
    }
}

/// Records open widgets by document path under one namespace
pub struct RestorationBridge {
    namespace: String,
    tracked: Mutex<AHashMap<String, TrackedWidget>>,
}

impl RestorationBridge {
    /// Create a bridge for the given restoration namespace
    pub fn new(namespace: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            namespace: namespace.into(),
            tracked: Mutex::new(AHashMap::new()),
        })
    }

    /// The namespace entries are keyed under
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Track a widget under its current document path
    ///
    /// Installs a rename tracker so the widget is re-registered under
    /// its new path on every path change.
    pub fn track(self: &Arc<Self>, widget: &Arc<ContentBindingWidget>, factory_name: &str) {
        let path = widget.context().path();

        let tracker = Arc::new(RenameTracker {
            bridge: Arc::downgrade(self),
            widget: Arc::downgrade(widget),
            last_path: Mutex::new(path.clone()),
        });
        widget
            .context()
            .path_changes()
            .subscribe(tracker.clone() as Arc<dyn PathObserver>);

        self.tracked.lock().insert(
            path.clone(),
            TrackedWidget {
                widget: Arc::downgrade(widget),
                factory_name: factory_name.to_string(),
                _rename: tracker,
            },
        );
        debug!(namespace = %self.namespace, path = %path, "widget tracked");
    }

    /// Number of live tracked widgets
    pub fn len(&self) -> usize {
        let mut tracked = self.tracked.lock();
        tracked.retain(|_, entry| entry.widget.strong_count() > 0);
        tracked.len()
    }

    /// Whether no live widget is tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot entries for all live tracked widgets
    ///
    /// Widgets that have been dropped are pruned silently.
    pub fn entries(&self) -> Vec<RestorationEntry> {
        let mut tracked = self.tracked.lock();
        tracked.retain(|_, entry| entry.widget.strong_count() > 0);
        tracked
            .iter()
            .map(|(path, entry)| RestorationEntry {
                namespace: self.namespace.clone(),
                path: path.clone(),
                factory_name: entry.factory_name.clone(),
            })
            .collect()
    }

    /// Replay persisted entries through the host's open surface
    ///
    /// Entries of other namespaces and entries the opener cannot
    /// satisfy are dropped without error. Tracking of reopened widgets
    /// happens on the opener's creation path, not here.
    pub fn restore(&self, entries: &[RestorationEntry], opener: &dyn DocumentOpener) {
        for entry in entries {
            if entry.namespace != self.namespace {
                continue;
            }
            match opener.open_document(&entry.path, &entry.factory_name) {
                Some(widget) => {
                    debug!(namespace = %self.namespace, path = %entry.path, widget = %widget.id(), "session entry restored");
                }
                None => {
                    debug!(namespace = %self.namespace, path = %entry.path, factory = %entry.factory_name, "session entry dropped");
                }
            }
        }
    }

    /// Move a tracked widget to its new path
    ///
    /// Dropped silently when the widget is no longer tracked or alive.
    fn re_register(&self, old_path: &str, new_path: &str, widget: &Weak<ContentBindingWidget>) {
        let mut tracked = self.tracked.lock();
        let Some(entry) = tracked.remove(old_path) else {
            debug!(namespace = %self.namespace, path = %old_path, "rename for untracked widget dropped");
            return;
        };
        if widget.strong_count() == 0 {
            return;
        }
        tracked.insert(new_path.to_string(), entry);
        debug!(namespace = %self.namespace, from = %old_path, to = %new_path, "widget re-registered after rename");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentContext;
    use crate::embed::{FnEmbedFactory, RenderConfig, VisualizationEmbed};
    use crate::factory::BindingWidgetFactory;
    use crate::signal::{OnceSignal, PathSignal};
    use crate::widget::{FormatSelection, RenderTriggerPolicy};
    use vb_data::{DataFormat, Dataset};

    struct StubContext {
        path: Mutex<String>,
        ready: OnceSignal,
        path_changes: PathSignal,
    }

    impl StubContext {
        fn new(path: &str) -> Arc<Self> {
            Arc::new(Self {
                path: Mutex::new(path.to_string()),
                ready: OnceSignal::new(),
                path_changes: PathSignal::new(),
            })
        }

        fn rename(&self, path: &str) {
            *self.path.lock() = path.to_string();
            self.path_changes.emit(path);
        }
    }

    impl DocumentContext for StubContext {
        fn path(&self) -> String {
            self.path.lock().clone()
        }

        fn content(&self) -> String {
            "x\n1".to_string()
        }

        fn ready(&self) -> &OnceSignal {
            &self.ready
        }

        fn path_changes(&self) -> &PathSignal {
            &self.path_changes
        }
    }

    struct NullEmbed;

    impl VisualizationEmbed for NullEmbed {
        fn update_data(&self, _dataset: &Dataset) {}
    }

    fn test_factory() -> BindingWidgetFactory {
        BindingWidgetFactory::new(
            "Voyager",
            vec!["csv".to_string()],
            RenderConfig::default(),
            RenderTriggerPolicy::OnFirstVisible,
            FormatSelection::Fixed(DataFormat::Csv),
            Arc::new(FnEmbedFactory(|_config: &RenderConfig| {
                Box::new(NullEmbed) as Box<dyn VisualizationEmbed>
            })),
        )
    }

    #[test]
    fn test_track_and_snapshot() {
        let bridge = RestorationBridge::new("voyager");
        let factory = test_factory();
        let context = StubContext::new("data/a.csv");
        let widget = factory.create(context.clone());

        bridge.track(&widget, factory.name());

        let entries = bridge.entries();
        assert_eq!(
            entries,
            vec![RestorationEntry {
                namespace: "voyager".to_string(),
                path: "data/a.csv".to_string(),
                factory_name: "Voyager".to_string(),
            }]
        );
    }

    #[test]
    fn test_rename_re_registers_under_new_path() {
        let bridge = RestorationBridge::new("voyager");
        let factory = test_factory();
        let context = StubContext::new("data/a.csv");
        let widget = factory.create(context.clone());
        bridge.track(&widget, factory.name());

        context.rename("data/b.csv");

        let entries = bridge.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "data/b.csv");
    }

    #[test]
    fn test_dropped_widget_is_pruned_silently() {
        let bridge = RestorationBridge::new("voyager");
        let factory = test_factory();
        let context = StubContext::new("data/a.csv");
        let widget = factory.create(context.clone());
        bridge.track(&widget, factory.name());

        drop(widget);
        assert!(bridge.entries().is_empty());
        assert!(bridge.is_empty());
    }

    struct NoneOpener;

    impl DocumentOpener for NoneOpener {
        fn open_document(&self, _path: &str, _factory_name: &str) -> Option<Arc<ContentBindingWidget>> {
            None
        }
    }

    struct CountingOpener {
        factory: BindingWidgetFactory,
        opened: Mutex<Vec<String>>,
    }

    impl DocumentOpener for CountingOpener {
        fn open_document(&self, path: &str, factory_name: &str) -> Option<Arc<ContentBindingWidget>> {
            if factory_name != self.factory.name() {
                return None;
            }
            self.opened.lock().push(path.to_string());
            Some(self.factory.create(StubContext::new(path)))
        }
    }

    #[test]
    fn test_restore_with_no_live_widget_is_silent_noop() {
        let bridge = RestorationBridge::new("voyager");
        let entry = RestorationEntry {
            namespace: "voyager".to_string(),
            path: "a.csv".to_string(),
            factory_name: "Voyager".to_string(),
        };

        // Opener that can never satisfy the request: no action, no error
        bridge.restore(&[entry], &NoneOpener);
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_restore_replays_open_requests() {
        let bridge = RestorationBridge::new("voyager");
        let opener = CountingOpener {
            factory: test_factory(),
            opened: Mutex::new(Vec::new()),
        };

        let entries = vec![
            RestorationEntry {
                namespace: "voyager".to_string(),
                path: "a.csv".to_string(),
                factory_name: "Voyager".to_string(),
            },
            RestorationEntry {
                namespace: "other".to_string(),
                path: "b.csv".to_string(),
                factory_name: "Voyager".to_string(),
            },
            RestorationEntry {
                namespace: "voyager".to_string(),
                path: "c.csv".to_string(),
                factory_name: "Unknown".to_string(),
            },
        ];

        bridge.restore(&entries, &opener);

        // Only the matching-namespace entry with a known factory opens
        assert_eq!(*opener.opened.lock(), vec!["a.csv".to_string()]);
    }
}
