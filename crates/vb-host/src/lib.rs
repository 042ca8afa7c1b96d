//! Thin host adapter for the visualization binding core
//!
//! Forwards host callbacks into the core's named events and wires up
//! factory registration, session persistence, and restoration.

pub mod document;
pub mod presets;
pub mod queue;
pub mod registry;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use document::HostDocumentContext;
pub use queue::{EventQueue, HostEvent};
pub use registry::DocumentRegistry;
pub use store::{InMemorySessionStore, JsonFileSessionStore, SessionSnapshot, SessionStore};

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use vb_core::EmbedFactory;

/// Install the default fmt diagnostics subscriber
pub fn init_diagnostics() {
    tracing_subscriber::fmt::init();
}

/// Register the standard factories and replay the persisted session
pub fn activate(
    registry: &DocumentRegistry,
    store: &dyn SessionStore,
    embed_factory: Arc<dyn EmbedFactory>,
) -> Result<()> {
    registry.add_widget_factory(presets::voyager_csv(embed_factory.clone()));
    registry.add_widget_factory(presets::voyager_explorer(embed_factory));

    if let Some(snapshot) = store.load()? {
        info!(
            entries = snapshot.entries.len(),
            saved_at = %snapshot.saved_at,
            "restoring session"
        );
        registry.bridge().restore(&snapshot.entries, registry);
    }

    Ok(())
}

/// Persist the current open-widget session through the store
pub fn save_session(registry: &DocumentRegistry, store: &dyn SessionStore) -> Result<()> {
    let snapshot = SessionSnapshot::new(registry.bridge().entries());
    store.save(&snapshot)
}
