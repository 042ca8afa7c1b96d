//! Document type registry and open surface
//!
//! The host-side analog of a document manager: factories are registered
//! by name, documents are opened into contexts, and every created
//! widget is tracked with the restoration bridge.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use vb_core::{
    BindingWidgetFactory, ContentBindingWidget, DocumentContext, DocumentOpener,
    FactoryRegistration, RestorationBridge, WidgetId,
};

use crate::document::HostDocumentContext;
use crate::queue::HostEvent;

/// Registry of widget factories, open documents, and live widgets
pub struct DocumentRegistry {
    factories: Mutex<AHashMap<String, Arc<BindingWidgetFactory>>>,
    documents: Mutex<AHashMap<String, Arc<HostDocumentContext>>>,
    widgets: Mutex<AHashMap<WidgetId, Arc<ContentBindingWidget>>>,
    bridge: Arc<RestorationBridge>,
}

impl DocumentRegistry {
    /// Create a registry restoring under the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            factories: Mutex::new(AHashMap::new()),
            documents: Mutex::new(AHashMap::new()),
            widgets: Mutex::new(AHashMap::new()),
            bridge: RestorationBridge::new(namespace),
        }
    }

    /// The restoration bridge tracking this registry's widgets
    pub fn bridge(&self) -> &Arc<RestorationBridge> {
        &self.bridge
    }

    /// Register a widget factory under its name
    pub fn add_widget_factory(&self, factory: BindingWidgetFactory) {
        let registration = factory.registration();
        info!(
            factory = %registration.display_name,
            file_types = ?registration.supported_file_types,
            "widget factory registered"
        );
        self.factories
            .lock()
            .insert(factory.name().to_string(), Arc::new(factory));
    }

    /// Registration surfaces of all known factories
    pub fn registrations(&self) -> Vec<FactoryRegistration> {
        self.factories
            .lock()
            .values()
            .map(|factory| factory.registration())
            .collect()
    }

    /// The open document context at `path`, if any
    pub fn document(&self, path: &str) -> Option<Arc<HostDocumentContext>> {
        self.documents.lock().get(path).cloned()
    }

    /// A live widget by id
    pub fn widget(&self, id: WidgetId) -> Option<Arc<ContentBindingWidget>> {
        self.widgets.lock().get(&id).cloned()
    }

    /// All live widgets
    pub fn widgets(&self) -> Vec<Arc<ContentBindingWidget>> {
        self.widgets.lock().values().cloned().collect()
    }

    /// Open the document at `path` with the named factory
    ///
    /// Reuses the existing context when the document is already open;
    /// the new widget is tracked for session restoration.
    pub fn open(&self, path: &str, factory_name: &str) -> Option<Arc<ContentBindingWidget>> {
        let factory = self.factories.lock().get(factory_name).cloned();
        let Some(factory) = factory else {
            warn!(factory = %factory_name, "unknown widget factory");
            return None;
        };

        let context = self
            .documents
            .lock()
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(HostDocumentContext::new(path)))
            .clone();

        let widget = factory.create(context as Arc<dyn DocumentContext>);
        self.bridge.track(&widget, factory.name());
        self.widgets.lock().insert(widget.id(), widget.clone());
        Some(widget)
    }

    /// Dispose a widget and drop the registry's ownership of it
    pub fn close(&self, id: WidgetId) -> bool {
        let Some(widget) = self.widgets.lock().remove(&id) else {
            return false;
        };
        widget.dispose();
        true
    }

    /// Rename an open document, re-keying it and notifying observers
    pub fn rename_document(&self, path: &str, new_path: &str) {
        let context = {
            let mut documents = self.documents.lock();
            let Some(context) = documents.remove(path) else {
                debug!(path = %path, "rename for unopened document dropped");
                return;
            };
            documents.insert(new_path.to_string(), context.clone());
            context
        };
        context.rename(new_path);
    }

    /// Dispatch one host event into the contexts and widgets it targets
    pub fn dispatch(&self, event: HostEvent) {
        match event {
            HostEvent::DocumentReady { path } => {
                match self.document(&path) {
                    Some(context) => context.mark_ready(),
                    None => debug!(path = %path, "readiness for unopened document dropped"),
                }
            }
            HostEvent::DocumentReadyFailed { path, reason } => {
                match self.document(&path) {
                    Some(context) => context.fail_ready(reason),
                    None => debug!(path = %path, "readiness failure for unopened document dropped"),
                }
            }
            HostEvent::WidgetShown { widget_id } => {
                match self.widget(widget_id) {
                    Some(widget) => widget.notify_first_visible(),
                    None => debug!(widget = %widget_id, "visibility for unknown widget dropped"),
                }
            }
            HostEvent::DocumentRenamed { path, new_path } => {
                self.rename_document(&path, &new_path);
            }
            HostEvent::ContentChanged { path, content } => {
                let Some(context) = self.document(&path) else {
                    debug!(path = %path, "content change for unopened document dropped");
                    return;
                };
                context.set_content(content);
                for widget in self.widgets() {
                    if widget.context().path() == path {
                        widget.notify_content_changed();
                    }
                }
            }
        }
    }
}

impl DocumentOpener for DocumentRegistry {
    fn open_document(&self, path: &str, factory_name: &str) -> Option<Arc<ContentBindingWidget>> {
        self.open(path, factory_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::testing::recording_embed_factory;
    use vb_core::LifecycleState;

    fn registry_with_presets() -> DocumentRegistry {
        let (embed_factory, _pushes) = recording_embed_factory();
        let registry = DocumentRegistry::new("voyager");
        registry.add_widget_factory(presets::voyager_csv(embed_factory.clone()));
        registry.add_widget_factory(presets::voyager_explorer(embed_factory));
        registry
    }

    #[test]
    fn test_open_unknown_factory_is_none() {
        let registry = registry_with_presets();
        assert!(registry.open("data/a.csv", "Nope").is_none());
    }

    #[test]
    fn test_open_tracks_widget_and_reuses_context() {
        let registry = registry_with_presets();
        let first = registry.open("data/a.csv", "Voyager").unwrap();
        let second = registry.open("data/a.csv", "Voyager").unwrap();

        assert_ne!(first.id(), second.id());
        // Both widgets read the same host context
        assert!(Arc::ptr_eq(first.context(), second.context()));
        // Same path, so the second track overwrites the first entry
        assert_eq!(registry.bridge().len(), 1);
    }

    #[test]
    fn test_close_disposes_and_releases() {
        let registry = registry_with_presets();
        let widget = registry.open("data/a.csv", "Voyager").unwrap();
        let id = widget.id();
        drop(widget);

        assert!(registry.close(id));
        assert!(!registry.close(id));
        assert!(registry.widget(id).is_none());
        assert!(registry.bridge().is_empty());
    }

    #[test]
    fn test_rename_rekeys_document_and_updates_title() {
        let registry = registry_with_presets();
        let widget = registry.open("data/a.csv", "Voyager").unwrap();

        registry.rename_document("data/a.csv", "data/b.csv");

        assert!(registry.document("data/a.csv").is_none());
        assert!(registry.document("data/b.csv").is_some());
        assert_eq!(widget.title(), "b.csv");

        let entries = registry.bridge().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "data/b.csv");
    }

    #[test]
    fn test_dispatch_full_open_flow() {
        let registry = registry_with_presets();
        let widget = registry.open("data/a.csv", "Voyager").unwrap();

        registry.dispatch(HostEvent::ContentChanged {
            path: "data/a.csv".to_string(),
            content: "x,y\n1,2".to_string(),
        });
        registry.dispatch(HostEvent::DocumentReady {
            path: "data/a.csv".to_string(),
        });
        registry.dispatch(HostEvent::WidgetShown {
            widget_id: widget.id(),
        });

        assert_eq!(widget.lifecycle_state(), LifecycleState::Bound);
    }

    #[test]
    fn test_dispatch_for_unknown_targets_is_silent() {
        let registry = registry_with_presets();
        registry.dispatch(HostEvent::DocumentReady {
            path: "ghost.csv".to_string(),
        });
        registry.dispatch(HostEvent::WidgetShown {
            widget_id: uuid::Uuid::new_v4(),
        });
    }
}
