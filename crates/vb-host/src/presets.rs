//! Factory presets the extension registers at activation
//!
//! One configurable widget covers every deployment; presets differ only
//! in trigger policy, format selection, and render configuration.

use std::sync::Arc;

use vb_core::{
    BindingWidgetFactory, EmbedFactory, FormatSelection, RelatedViewsPolicy, RenderConfig,
    RenderTriggerPolicy,
};
use vb_data::DataFormat;

/// CSV viewer: embed created on first visibility, related views
/// collapsed
pub fn voyager_csv(embed_factory: Arc<dyn EmbedFactory>) -> BindingWidgetFactory {
    BindingWidgetFactory::new(
        "Voyager",
        vec!["csv".to_string()],
        RenderConfig {
            related_views: RelatedViewsPolicy::InitiallyCollapsed,
            ..RenderConfig::default()
        },
        RenderTriggerPolicy::OnFirstVisible,
        FormatSelection::Fixed(DataFormat::Csv),
        embed_factory,
    )
}

/// Multi-format explorer: embed created eagerly at construction,
/// related views shown, format chosen by file extension
pub fn voyager_explorer(embed_factory: Arc<dyn EmbedFactory>) -> BindingWidgetFactory {
    BindingWidgetFactory::new(
        "Voyager Explorer",
        vec!["csv".to_string(), "json".to_string()],
        RenderConfig {
            related_views: RelatedViewsPolicy::InitiallyShown,
            ..RenderConfig::default()
        },
        RenderTriggerPolicy::Eager,
        FormatSelection::ByExtension,
        embed_factory,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recording_embed_factory;

    #[test]
    fn test_preset_registrations() {
        let (embed_factory, _pushes) = recording_embed_factory();

        let csv = voyager_csv(embed_factory.clone());
        assert_eq!(csv.name(), "Voyager");
        assert_eq!(csv.file_types(), ["csv".to_string()]);

        let explorer = voyager_explorer(embed_factory);
        assert_eq!(explorer.name(), "Voyager Explorer");
        assert_eq!(
            explorer.file_types(),
            ["csv".to_string(), "json".to_string()]
        );
    }
}
