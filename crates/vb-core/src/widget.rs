//! Content binding widget lifecycle
//!
//! Coordinates three asynchronous events - document readiness, first
//! visibility, and content change - with a rendering embed that must be
//! initialized exactly once and fed parsed data thereafter.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use vb_data::{DataError, DataFormat};

use crate::document::{basename, extension, DocumentContext};
use crate::embed::{EmbedFactory, RenderConfig, VisualizationEmbed};
use crate::signal::{OnceObserver, OnceSignal, Outcome, PathObserver};

/// Unique identifier for a binding widget
pub type WidgetId = Uuid;

/// Lifecycle states of a binding widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Widget exists and subscriptions are installed; no embed yet
    Constructed,
    /// Render trigger fired and the embed exists; waiting for readiness
    AwaitingFirstRender,
    /// First dataset pushed; content changes re-bind from here
    Bound,
    /// Terminal: embed released, all further events are absorbed
    Disposed,
}

/// When the embed is first created
///
/// A single configurable strategy instead of one widget class per
/// deployment timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTriggerPolicy {
    /// Create the embed immediately at construction
    Eager,
    /// Create the embed when the widget first becomes visible
    OnFirstVisible,
}

/// How the parser's format hint is chosen, fixed per factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelection {
    /// The factory supports a single declared format
    Fixed(DataFormat),
    /// Derive the format from the document's file extension
    ByExtension,
}

/// Errors recorded while binding content to the embed
///
/// None of these tear the widget down; the panel degrades to a title
/// with no visualization.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("unparsable content: {0}")]
    Parse(#[from] DataError),

    #[error("no parser for document '{0}'")]
    UnsupportedFormat(String),

    #[error("document never became ready: {0}")]
    DocumentUnavailable(String),
}

/// Mutable widget state behind a single lock
struct WidgetState {
    state: LifecycleState,
    title: String,
    render_triggered: bool,
    ready_resolved: bool,
    embed: Option<Box<dyn VisualizationEmbed>>,
    last_error: Option<BindError>,
}

/// A widget binding one document to one visualization embed
///
/// Owns exactly one embed instance, created at most once and never
/// replaced. Driven by named events forwarded by the host adapter:
/// readiness and path changes arrive through the context subscriptions,
/// visibility and content changes through `notify_*` calls.
pub struct ContentBindingWidget {
    id: WidgetId,
    context: Arc<dyn DocumentContext>,
    render_config: RenderConfig,
    format: Option<DataFormat>,
    embed_factory: Arc<dyn EmbedFactory>,
    ready: OnceSignal,
    inner: Mutex<WidgetState>,
}

impl ContentBindingWidget {
    pub(crate) fn new(
        context: Arc<dyn DocumentContext>,
        render_config: RenderConfig,
        format_selection: FormatSelection,
        embed_factory: Arc<dyn EmbedFactory>,
    ) -> Self {
        let path = context.path();

        // The format hint is a construction-time policy, not a
        // per-event decision
        let format = match format_selection {
            FormatSelection::Fixed(format) => Some(format),
            FormatSelection::ByExtension => {
                extension(&path).and_then(DataFormat::from_extension)
            }
        };

        let id = Uuid::new_v4();
        info!(widget = %id, path = %path, ?format, "widget constructed");

        Self {
            id,
            render_config,
            format,
            embed_factory,
            ready: OnceSignal::new(),
            inner: Mutex::new(WidgetState {
                state: LifecycleState::Constructed,
                title: basename(&path).to_string(),
                render_triggered: false,
                ready_resolved: false,
                embed: None,
                last_error: None,
            }),
            context,
        }
    }

    /// Unique id of this widget
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The document context this widget reads from
    pub fn context(&self) -> &Arc<dyn DocumentContext> {
        &self.context
    }

    /// The embed construction options fixed for this widget
    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Current widget title (final path segment)
    pub fn title(&self) -> String {
        self.inner.lock().title.clone()
    }

    /// Current lifecycle state
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.inner.lock().state
    }

    /// One-shot signal resolved when the widget becomes bound, failed
    /// when the document can never become ready
    pub fn ready(&self) -> &OnceSignal {
        &self.ready
    }

    /// Message of the most recent recoverable binding error, if any
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.as_ref().map(|e| e.to_string())
    }

    /// Host notification: the widget surface became visible
    ///
    /// Only the first notification can have an effect; later ones are
    /// absorbed.
    pub fn notify_first_visible(&self) {
        self.fire_render_trigger();
    }

    /// Host notification: the document content changed
    ///
    /// Re-parses and re-pushes while bound. Before the first bind this
    /// is a benign no-op - the bind transition pushes the first dataset
    /// anyway.
    pub fn notify_content_changed(&self) {
        {
            let inner = self.inner.lock();
            match inner.state {
                LifecycleState::Disposed => return,
                LifecycleState::Constructed | LifecycleState::AwaitingFirstRender => {
                    debug!(widget = %self.id, "content change before bind, nothing to update");
                    return;
                }
                LifecycleState::Bound => {}
            }
        }
        self.push_dataset();
    }

    /// Release the embed and absorb all further event deliveries
    ///
    /// Safe to call while readiness is still pending; a late resolution
    /// is a no-op afterwards.
    pub fn dispose(&self) {
        let embed = {
            let mut inner = self.inner.lock();
            if inner.state == LifecycleState::Disposed {
                return;
            }
            inner.state = LifecycleState::Disposed;
            inner.embed.take()
        };
        drop(embed);
        info!(widget = %self.id, "widget disposed");
    }

    /// Fire the render trigger, creating the embed exactly once
    pub(crate) fn fire_render_trigger(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state == LifecycleState::Disposed || inner.render_triggered {
                return;
            }
            inner.render_triggered = true;
        }

        let embed = self.embed_factory.create_embed(&self.render_config);

        {
            let mut inner = self.inner.lock();
            if inner.state == LifecycleState::Disposed {
                // Disposed while the embed was being constructed;
                // release it without ever attaching
                return;
            }
            inner.embed = Some(embed);
            if inner.state == LifecycleState::Constructed {
                inner.state = LifecycleState::AwaitingFirstRender;
            }
        }

        debug!(widget = %self.id, "render trigger fired, embed created");
        self.maybe_bind();
    }

    /// Transition to bound once the render trigger has fired and the
    /// document is ready, in either order
    fn maybe_bind(&self) {
        {
            let mut inner = self.inner.lock();
            let armed = inner.state == LifecycleState::AwaitingFirstRender
                && inner.ready_resolved
                && inner.embed.is_some();
            if !armed {
                return;
            }
            // Claiming the transition here keeps racing re-entries from
            // pushing the first dataset twice
            inner.state = LifecycleState::Bound;
        }

        info!(widget = %self.id, "widget bound");
        self.push_dataset();
        self.ready.resolve();
    }

    /// Parse the current content and replace the embed dataset wholesale
    fn push_dataset(&self) {
        let Some(format) = self.format else {
            let path = self.context.path();
            warn!(widget = %self.id, path = %path, "no parser for document");
            self.inner.lock().last_error = Some(BindError::UnsupportedFormat(path));
            return;
        };

        let content = self.context.content();
        match vb_data::parse(&content, format) {
            Ok(dataset) => {
                let mut inner = self.inner.lock();
                if inner.state == LifecycleState::Disposed {
                    return;
                }
                if let Some(embed) = inner.embed.as_ref() {
                    embed.update_data(&dataset);
                    debug!(widget = %self.id, rows = dataset.len(), "dataset pushed");
                }
                inner.last_error = None;
            }
            Err(err) => {
                warn!(widget = %self.id, error = %err, "unparsable content, widget kept alive");
                self.inner.lock().last_error = Some(BindError::Parse(err));
            }
        }
    }
}

impl OnceObserver for ContentBindingWidget {
    fn on_outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Resolved => {
                {
                    let mut inner = self.inner.lock();
                    if inner.state == LifecycleState::Disposed {
                        debug!(widget = %self.id, "readiness after disposal absorbed");
                        return;
                    }
                    inner.ready_resolved = true;
                }
                self.maybe_bind();
            }
            Outcome::Failed(reason) => {
                {
                    let mut inner = self.inner.lock();
                    if inner.state == LifecycleState::Disposed {
                        return;
                    }
                    inner.last_error = Some(BindError::DocumentUnavailable(reason.clone()));
                }
                error!(widget = %self.id, reason = %reason, "document never became ready");
                self.ready.fail(reason.clone());
            }
        }
    }
}

impl PathObserver for ContentBindingWidget {
    fn on_path_changed(&self, path: &str) {
        let mut inner = self.inner.lock();
        if inner.state == LifecycleState::Disposed {
            return;
        }
        inner.title = basename(path).to_string();
        debug!(widget = %self.id, title = %inner.title, "title updated");
    }
}
