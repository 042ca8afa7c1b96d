//! Widget factories
//!
//! One factory per supported file-type + visualization-mode
//! combination; each call yields an independent widget.

use std::sync::Arc;

use tracing::debug;

use crate::document::DocumentContext;
use crate::embed::{EmbedFactory, RenderConfig};
use crate::signal::{OnceObserver, PathObserver};
use crate::widget::{ContentBindingWidget, FormatSelection, RenderTriggerPolicy};

/// Registration surface consumed by a document-type registry
#[derive(Debug, Clone)]
pub struct FactoryRegistration {
    pub display_name: String,
    pub supported_file_types: Vec<String>,
}

/// Factory producing binding widgets over document contexts
///
/// Pure construction: no I/O and no parsing happens here; all of that
/// is deferred to the widget's own lifecycle.
pub struct BindingWidgetFactory {
    name: String,
    file_types: Vec<String>,
    render_config: RenderConfig,
    trigger_policy: RenderTriggerPolicy,
    format_selection: FormatSelection,
    embed_factory: Arc<dyn EmbedFactory>,
}

impl BindingWidgetFactory {
    pub fn new(
        name: impl Into<String>,
        file_types: Vec<String>,
        render_config: RenderConfig,
        trigger_policy: RenderTriggerPolicy,
        format_selection: FormatSelection,
        embed_factory: Arc<dyn EmbedFactory>,
    ) -> Self {
        Self {
            name: name.into(),
            file_types,
            render_config,
            trigger_policy,
            format_selection,
            embed_factory,
        }
    }

    /// Factory name, used as the restoration entry's factory token
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File-type tokens this factory is registered against
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    /// The registration surface for a document-type registry
    pub fn registration(&self) -> FactoryRegistration {
        FactoryRegistration {
            display_name: self.name.clone(),
            supported_file_types: self.file_types.clone(),
        }
    }

    /// Create an independent widget bound to the given context
    pub fn create(&self, context: Arc<dyn DocumentContext>) -> Arc<ContentBindingWidget> {
        debug!(factory = %self.name, path = %context.path(), "creating widget");

        let widget = Arc::new(ContentBindingWidget::new(
            context.clone(),
            self.render_config.clone(),
            self.format_selection,
            self.embed_factory.clone(),
        ));

        context.ready().subscribe(widget.clone() as Arc<dyn OnceObserver>);
        context
            .path_changes()
            .subscribe(widget.clone() as Arc<dyn PathObserver>);

        if self.trigger_policy == RenderTriggerPolicy::Eager {
            widget.fire_render_trigger();
        }

        widget
    }
}
