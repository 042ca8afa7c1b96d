//! Visualization embed contract and construction options

use serde::{Deserialize, Serialize};
use vb_data::Dataset;

/// Whether the embed's related-views panel starts expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedViewsPolicy {
    InitiallyShown,
    InitiallyCollapsed,
}

/// Immutable construction options for a visualization embed
///
/// Fixed at widget construction and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Whether the embed offers its own data source selector
    pub show_data_source_selector: bool,

    /// Optional backing server URL
    pub server_url: Option<String>,

    /// Hide the embed's header chrome
    pub hide_header: bool,

    /// Hide the embed's footer chrome
    pub hide_footer: bool,

    /// Initial state of the related-views panel
    pub related_views: RelatedViewsPolicy,

    /// Whether wildcard field selection is enabled
    pub wildcards_enabled: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_data_source_selector: false,
            server_url: None,
            hide_header: true,
            hide_footer: true,
            related_views: RelatedViewsPolicy::InitiallyCollapsed,
            wildcards_enabled: true,
        }
    }
}

/// A stateful rendering component attached to the host surface
///
/// The embed is initialized exactly once per widget and fed parsed
/// data thereafter; each update replaces the previous dataset
/// wholesale, never incrementally.
pub trait VisualizationEmbed: Send + Sync {
    /// Replace the embed's dataset wholesale (idempotent)
    fn update_data(&self, dataset: &Dataset);
}

/// Constructor for visualization embeds
pub trait EmbedFactory: Send + Sync {
    /// Create a new embed with a fixed configuration
    fn create_embed(&self, config: &RenderConfig) -> Box<dyn VisualizationEmbed>;
}

/// Embed factory backed by a closure
pub struct FnEmbedFactory<F>(pub F);

impl<F> EmbedFactory for FnEmbedFactory<F>
where
    F: Fn(&RenderConfig) -> Box<dyn VisualizationEmbed> + Send + Sync,
{
    fn create_embed(&self, config: &RenderConfig) -> Box<dyn VisualizationEmbed> {
        (self.0)(config)
    }
}
