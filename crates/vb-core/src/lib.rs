//! Core widget lifecycle for binding documents to visualization embeds
//!
//! This crate provides the state machine that keeps a document's raw
//! content synchronized with an embedded interactive visualization as
//! the document loads, changes path, or is shown inside a host.

pub mod document;
pub mod embed;
pub mod factory;
pub mod restore;
pub mod signal;
pub mod widget;

// Re-export commonly used types
pub use document::{basename, DocumentContext};
pub use embed::{
    EmbedFactory, FnEmbedFactory, RelatedViewsPolicy, RenderConfig, VisualizationEmbed,
};
pub use factory::{BindingWidgetFactory, FactoryRegistration};
pub use restore::{DocumentOpener, RestorationBridge, RestorationEntry};
pub use signal::{OnceObserver, OnceSignal, Outcome, PathObserver, PathSignal};
pub use widget::{
    BindError, ContentBindingWidget, FormatSelection, LifecycleState, RenderTriggerPolicy,
    WidgetId,
};
